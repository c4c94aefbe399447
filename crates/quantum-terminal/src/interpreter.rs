//! Command trait, registry, and lookup.
//!
//! Command names are case-insensitive exact tokens. The registry keeps
//! registration order, which drives tab completion, `help` layout and the
//! "did you mean" suggestions for unknown commands.

use std::time::Instant;

use indexmap::IndexMap;
use quantum_types::Result;

use crate::fs::PortfolioFs;

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Plain text, appended as an `output` entry.
    Text(String),
    /// Command produced no visible output.
    None,
    /// Signal to clear the whole transcript.
    Clear,
    /// Signal to send a prompt to the remote assistant.
    Ask {
        /// Prompt text with the leading `-` separator removed.
        prompt: String,
    },
    /// Text output that also starts the cosmetic matrix effect.
    Matrix(String),
    /// Text output that also asks the front end to close the terminal.
    Exit(String),
}

/// Environment passed to every command invocation.
pub struct Environment<'a> {
    /// Current working directory. Commands may change it (`cd`).
    pub cwd: String,
    /// Home directory (`cd` with no arguments).
    pub home: &'a str,
    /// Login name (`whoami`).
    pub user: &'a str,
    /// Host name (`whoami`).
    pub host: &'a str,
    /// Read-only portfolio file tree.
    pub fs: &'a PortfolioFs,
    /// Previously submitted lines, oldest first.
    pub history: &'a [String],
    /// The registry the command was resolved from (for `help`).
    pub registry: &'a CommandRegistry,
    /// When the terminal session started (for `uptime`).
    pub started: Instant,
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "cat \<file\>").
    fn usage(&self) -> &str;

    /// Command category for grouping in `help` output.
    fn category(&self) -> &str {
        "system"
    }

    /// Extra names that resolve to this command.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Execute the command with the given arguments and environment.
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput>;
}

/// Maximum number of "did you mean" suggestions.
const MAX_SUGGESTIONS: usize = 3;

enum Slot {
    Command(Box<dyn Command>),
    Alias(String),
}

/// Registry of available commands, in registration order.
///
/// Aliases occupy their own slot so they appear in completion and
/// suggestion lists at the position they were registered.
pub struct CommandRegistry {
    slots: IndexMap<String, Slot>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            slots: IndexMap::new(),
        }
    }

    /// Register a command and its aliases.
    ///
    /// Replaces any existing command with the same name, keeping its
    /// original position.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        let name = cmd.name().to_ascii_lowercase();
        let aliases: Vec<String> = cmd.aliases().iter().map(|a| a.to_ascii_lowercase()).collect();
        self.slots.insert(name.clone(), Slot::Command(cmd));
        for alias in aliases {
            self.slots.insert(alias, Slot::Alias(name.clone()));
        }
    }

    /// Resolve a command by name (case-insensitive, exact token).
    pub fn lookup(&self, name: &str) -> Option<&dyn Command> {
        let key = name.to_ascii_lowercase();
        match self.slots.get(&key)? {
            Slot::Command(cmd) => Some(cmd.as_ref()),
            Slot::Alias(target) => match self.slots.get(target)? {
                Slot::Command(cmd) => Some(cmd.as_ref()),
                Slot::Alias(_) => None,
            },
        }
    }

    /// All resolvable names (commands and aliases) in registration order.
    pub fn list_names(&self) -> Vec<&str> {
        self.slots.keys().map(String::as_str).collect()
    }

    /// Names starting with `prefix` (case-insensitive), in registration order.
    pub fn completions(&self, prefix: &str) -> Vec<String> {
        let lower = prefix.to_ascii_lowercase();
        self.slots
            .keys()
            .filter(|name| name.starts_with(&lower))
            .cloned()
            .collect()
    }

    /// Up to three names sharing the first character of `name`, in
    /// registration order.
    pub fn suggestions(&self, name: &str) -> Vec<String> {
        let Some(first) = name.chars().next().map(|c| c.to_ascii_lowercase()) else {
            return Vec::new();
        };
        self.slots
            .keys()
            .filter(|candidate| candidate.starts_with(first))
            .take(MAX_SUGGESTIONS)
            .cloned()
            .collect()
    }

    /// Registered commands (aliases excluded), in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &dyn Command> {
        self.slots.values().filter_map(|slot| match slot {
            Slot::Command(cmd) => Some(cmd.as_ref()),
            Slot::Alias(_) => None,
        })
    }

    /// Commands grouped by category. Categories and the commands inside them
    /// both keep registration order.
    pub fn catalog(&self) -> Vec<(&str, Vec<&dyn Command>)> {
        let mut groups: IndexMap<&str, Vec<&dyn Command>> = IndexMap::new();
        for cmd in self.commands() {
            groups.entry(cmd.category()).or_default().push(cmd);
        }
        groups.into_iter().collect()
    }

    /// Number of resolvable names.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a submitted line into a lower-cased command name and its
/// arguments. `None` for a blank line.
pub fn tokenize(line: &str) -> Option<(String, Vec<&str>)> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?.to_lowercase();
    Some((name, tokens.collect()))
}

// ---------------------------------------------------------------------------
// Path resolution helper
// ---------------------------------------------------------------------------

/// Resolve `input` against `cwd` into an absolute path with `.` and `..`
/// folded away. `..` at the root stays at the root.
pub fn resolve_path(cwd: &str, input: &str) -> String {
    let base = if input.starts_with('/') { "" } else { cwd };
    let mut stack: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(input.split('/')) {
        match segment {
            "" | "." => {},
            ".." => {
                stack.pop();
            },
            name => stack.push(name),
        }
    }
    format!("/{}", stack.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoCmd;
    impl Command for EchoCmd {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Print arguments"
        }
        fn usage(&self) -> &str {
            "echo [text...]"
        }
        fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
            Ok(CommandOutput::Text(args.join(" ")))
        }
    }

    struct Named(&'static str, &'static [&'static str]);
    impl Command for Named {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            ""
        }
        fn usage(&self) -> &str {
            self.0
        }
        fn aliases(&self) -> &[&str] {
            self.1
        }
        fn execute(&self, _: &[&str], _: &mut Environment<'_>) -> Result<CommandOutput> {
            Ok(CommandOutput::Text(self.0.to_string()))
        }
    }

    fn registry(names: &[&'static str]) -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        for &name in names {
            reg.register(Box::new(Named(name, &[])));
        }
        reg
    }

    #[test]
    fn register_and_lookup() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(EchoCmd));
        let cmd = reg.lookup("echo").expect("registered");
        assert_eq!(cmd.name(), "echo");
        assert_eq!(cmd.category(), "system");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let reg = registry(&["help"]);
        assert!(reg.lookup("HELP").is_some());
        assert!(reg.lookup("HeLp").is_some());
    }

    #[test]
    fn lookup_is_exact_not_prefix() {
        let reg = registry(&["history"]);
        assert!(reg.lookup("hist").is_none());
        assert!(reg.lookup("history2").is_none());
    }

    #[test]
    fn unknown_name_is_not_found() {
        let reg = registry(&["help"]);
        assert!(reg.lookup("nonexistent").is_none());
        assert!(reg.lookup("").is_none());
    }

    #[test]
    fn list_names_keeps_registration_order() {
        let reg = registry(&["help", "clear", "about", "calc"]);
        assert_eq!(reg.list_names(), vec!["help", "clear", "about", "calc"]);
    }

    #[test]
    fn alias_resolves_to_target() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(Named("ai", &["ask"])));
        reg.register(Box::new(Named("matrix", &[])));
        assert_eq!(reg.lookup("ask").map(|c| c.name()), Some("ai"));
        assert_eq!(reg.list_names(), vec!["ai", "ask", "matrix"]);
        assert_eq!(reg.commands().count(), 2);
    }

    #[test]
    fn register_replaces_existing_command_in_place() {
        let mut reg = registry(&["help", "clear"]);
        reg.register(Box::new(EchoCmd));
        reg.register(Box::new(Named("help", &[])));
        assert_eq!(reg.list_names(), vec!["help", "clear", "echo"]);
    }

    #[test]
    fn completions_prefix() {
        let reg = registry(&["help", "clear", "cat", "cd", "history", "hack"]);
        assert_eq!(reg.completions("c"), vec!["clear", "cat", "cd"]);
        assert_eq!(reg.completions("HIS"), vec!["history"]);
        assert!(reg.completions("zz").is_empty());
    }

    #[test]
    fn completions_empty_prefix_lists_everything() {
        let reg = registry(&["help", "clear"]);
        assert_eq!(reg.completions("").len(), 2);
    }

    #[test]
    fn suggestions_share_first_char_and_cap_at_three() {
        let reg = registry(&["clear", "cd", "cat", "contact", "cowsay", "help"]);
        assert_eq!(reg.suggestions("cta"), vec!["clear", "cd", "cat"]);
        assert_eq!(reg.suggestions("hepl"), vec!["help"]);
        assert!(reg.suggestions("zzz").is_empty());
        assert!(reg.suggestions("").is_empty());
    }

    #[test]
    fn suggestions_use_first_character_case_insensitively() {
        let reg = registry(&["help", "hack"]);
        assert_eq!(reg.suggestions("Hx"), vec!["help", "hack"]);
    }

    struct Categorized(&'static str, &'static str);
    impl Command for Categorized {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            ""
        }
        fn usage(&self) -> &str {
            self.0
        }
        fn category(&self) -> &str {
            self.1
        }
        fn execute(&self, _: &[&str], _: &mut Environment<'_>) -> Result<CommandOutput> {
            Ok(CommandOutput::None)
        }
    }

    #[test]
    fn catalog_groups_by_category_in_order() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(Categorized("help", "system")));
        reg.register(Box::new(Categorized("about", "portfolio")));
        reg.register(Box::new(Categorized("clear", "system")));
        reg.register(Box::new(Categorized("matrix", "fun")));
        let catalog = reg.catalog();
        let layout: Vec<(&str, Vec<&str>)> = catalog
            .iter()
            .map(|(cat, cmds)| (*cat, cmds.iter().map(|c| c.name()).collect()))
            .collect();
        assert_eq!(
            layout,
            vec![
                ("system", vec!["help", "clear"]),
                ("portfolio", vec!["about"]),
                ("fun", vec!["matrix"]),
            ]
        );
    }

    #[test]
    fn default_creates_empty_registry() {
        let reg = CommandRegistry::default();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn tokenize_lowercases_only_the_name() {
        let (name, args) = tokenize("  CowSay Hello   World ").unwrap();
        assert_eq!(name, "cowsay");
        assert_eq!(args, vec!["Hello", "World"]);
        assert!(tokenize(" \t ").is_none());
    }

    #[test]
    fn home_children_resolve() {
        assert_eq!(resolve_path("/home/ahraz", "secret"), "/home/ahraz/secret");
        assert_eq!(resolve_path("/home/ahraz", "portfolio/"), "/home/ahraz/portfolio");
    }

    #[test]
    fn parent_and_sibling_hops() {
        assert_eq!(resolve_path("/home/ahraz", ".."), "/home");
        assert_eq!(resolve_path("/home/ahraz/secret", "../portfolio"), "/home/ahraz/portfolio");
        assert_eq!(resolve_path("/home/ahraz", "./secret/../portfolio"), "/home/ahraz/portfolio");
    }

    #[test]
    fn absolute_input_ignores_cwd() {
        assert_eq!(resolve_path("/home/ahraz/secret", "/home/ahraz//portfolio/"), "/home/ahraz/portfolio");
        assert_eq!(resolve_path("/home/ahraz", "/"), "/");
    }

    #[test]
    fn climbing_past_root_stops_there() {
        assert_eq!(resolve_path("/", ".."), "/");
        assert_eq!(resolve_path("/home/ahraz", "../../../.."), "/");
        assert_eq!(resolve_path("/", "home/ahraz"), "/home/ahraz");
    }
}
