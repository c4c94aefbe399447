//! Read-only in-memory portfolio file tree behind `ls`, `cd` and `cat`.
//!
//! Keys are normalized absolute paths; a `BTreeMap` keeps children of a
//! directory contiguous and sorted, so listing is a range scan.

use std::collections::BTreeMap;

use quantum_types::{QuantumError, Result};

#[derive(Debug, Clone)]
enum Node {
    File(String),
    Dir,
}

/// One child of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// The portfolio file tree.
#[derive(Debug)]
pub struct PortfolioFs {
    nodes: BTreeMap<String, Node>,
}

impl PortfolioFs {
    /// An empty tree containing only the root directory.
    fn empty() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Dir);
        Self { nodes }
    }

    /// The stock portfolio tree rooted at `home`.
    pub fn new(home: &str) -> Self {
        let mut fs = Self::empty();
        let home = normalize(home);
        fs.add_file(&format!("{home}/projects.txt"), "List of all my amazing projects...");
        fs.add_file(&format!("{home}/resume.pdf"), "My professional resume (PDF format)");
        fs.add_file(&format!("{home}/portfolio/index.html"), "Portfolio website source");
        fs.add_file(&format!("{home}/portfolio/styles.css"), "Beautiful glassmorphism styles");
        fs.add_file(&format!("{home}/portfolio/app.js"), "React application logic");
        fs.add_file(&format!("{home}/secret/matrix.exe"), "Execute the matrix...");
        fs.add_file(&format!("{home}/secret/hack.sh"), "Initiate hacking sequence...");
        fs.add_file(&format!("{home}/secret/quantum.dat"), "Quantum state data...");
        fs
    }

    /// Create a directory and any missing parents.
    pub fn add_dir(&mut self, path: &str) {
        let path = normalize(path);
        let mut current = String::new();
        self.nodes.entry("/".to_string()).or_insert(Node::Dir);
        for part in path.split('/').filter(|p| !p.is_empty()) {
            current.push('/');
            current.push_str(part);
            self.nodes.entry(current.clone()).or_insert(Node::Dir);
        }
    }

    /// Add a file, creating its parent directories.
    pub fn add_file(&mut self, path: &str, contents: impl Into<String>) {
        let path = normalize(path);
        self.add_dir(parent(&path));
        self.nodes.insert(path, Node::File(contents.into()));
    }

    pub fn exists(&self, path: &str) -> bool {
        self.nodes.contains_key(&normalize(path))
    }

    pub fn is_dir(&self, path: &str) -> bool {
        matches!(self.nodes.get(&normalize(path)), Some(Node::Dir))
    }

    /// Contents of a file.
    pub fn read(&self, path: &str) -> Result<&str> {
        let path = normalize(path);
        match self.nodes.get(&path) {
            Some(Node::File(text)) => Ok(text),
            Some(Node::Dir) => Err(QuantumError::Fs(format!("is a directory: {path}"))),
            None => Err(QuantumError::Fs(format!("no such file: {path}"))),
        }
    }

    /// Direct children of a directory, sorted by name.
    pub fn readdir(&self, path: &str) -> Result<Vec<DirEntry>> {
        let path = normalize(path);
        match self.nodes.get(&path) {
            Some(Node::Dir) => {},
            Some(Node::File(_)) => {
                return Err(QuantumError::Fs(format!("not a directory: {path}")));
            },
            None => return Err(QuantumError::Fs(format!("no such directory: {path}"))),
        }

        let prefix = if path == "/" {
            "/".to_string()
        } else {
            format!("{path}/")
        };
        let mut entries = Vec::new();
        for (key, node) in self.nodes.range(prefix.clone()..) {
            if !key.starts_with(&prefix) {
                break;
            }
            let rest = &key[prefix.len()..];
            if !rest.is_empty() && !rest.contains('/') {
                entries.push(DirEntry {
                    name: rest.to_string(),
                    is_dir: matches!(node, Node::Dir),
                });
            }
        }
        Ok(entries)
    }
}

/// Ensure a leading `/`, collapse `//` and strip a trailing `/` (except root).
fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for part in path.split('/').filter(|p| !p.is_empty()) {
        out.push('/');
        out.push_str(part);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &path[..i],
    }
}
