//! System and navigation commands: exit, logout, pwd, ls, cd, cat, whoami,
//! date, uptime.

use quantum_types::{QuantumError, Result};

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment, resolve_path};

/// Register the system and navigation commands.
pub fn register_system_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(ExitCmd {
        name: "exit",
        description: "Return to 3D desktop view",
    }));
    reg.register(Box::new(ExitCmd {
        name: "logout",
        description: "Exit terminal mode",
    }));
    reg.register(Box::new(PwdCmd));
    reg.register(Box::new(LsCmd));
    reg.register(Box::new(CdCmd));
    reg.register(Box::new(CatCmd));
    reg.register(Box::new(WhoamiCmd));
    reg.register(Box::new(DateCmd));
    reg.register(Box::new(UptimeCmd));
}

// ---------------------------------------------------------------------------
// exit / logout
// ---------------------------------------------------------------------------

struct ExitCmd {
    name: &'static str,
    description: &'static str,
}

impl Command for ExitCmd {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        self.description
    }
    fn usage(&self) -> &str {
        self.name
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Exit(format!(
            "👋 Logging out {}@{}...\nReturning to the 3D workspace. Thanks for visiting!",
            env.user, env.host
        )))
    }
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn description(&self) -> &str {
        "Show current directory"
    }
    fn usage(&self) -> &str {
        "pwd"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(env.cwd.clone()))
    }
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "List directory contents"
    }
    fn usage(&self) -> &str {
        "ls [path]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (shown, path) = match args.first() {
            Some(arg) => (*arg, resolve_path(&env.cwd, arg)),
            None => (env.cwd.as_str(), env.cwd.clone()),
        };
        let entries = env.fs.readdir(&path).map_err(|_| {
            QuantumError::Command(format!(
                "ls: cannot access '{shown}': No such file or directory"
            ))
        })?;
        let mut out = format!("Contents of {path}:");
        for e in &entries {
            let marker = if e.is_dir { "📁" } else { "📄" };
            out.push_str(&format!("\n{marker} {}", e.name));
        }
        Ok(CommandOutput::Text(out))
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn description(&self) -> &str {
        "Change directory"
    }
    fn usage(&self) -> &str {
        "cd [path]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let Some(arg) = args.first() else {
            env.cwd = env.home.to_string();
            return Ok(CommandOutput::Text("Changed to home directory".to_string()));
        };
        let target = resolve_path(&env.cwd, arg);
        if !env.fs.exists(&target) {
            return Err(QuantumError::Command(format!(
                "cd: {arg}: No such file or directory"
            )));
        }
        if !env.fs.is_dir(&target) {
            return Err(QuantumError::Command(format!("cd: {arg}: Not a directory")));
        }
        let out = format!("Changed directory to {target}");
        env.cwd = target;
        Ok(CommandOutput::Text(out))
    }
}

// ---------------------------------------------------------------------------
// cat
// ---------------------------------------------------------------------------

struct CatCmd;
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn description(&self) -> &str {
        "Display file contents"
    }
    fn usage(&self) -> &str {
        "cat <file>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let Some(arg) = args.first() else {
            return Err(QuantumError::Command("cat: missing file operand".to_string()));
        };
        let path = resolve_path(&env.cwd, arg);
        if env.fs.is_dir(&path) {
            return Err(QuantumError::Command(format!("cat: {arg}: Is a directory")));
        }
        let text = env.fs.read(&path).map_err(|_| {
            QuantumError::Command(format!("cat: {arg}: No such file or directory"))
        })?;
        Ok(CommandOutput::Text(text.to_string()))
    }
}

// ---------------------------------------------------------------------------
// whoami
// ---------------------------------------------------------------------------

struct WhoamiCmd;
impl Command for WhoamiCmd {
    fn name(&self) -> &str {
        "whoami"
    }
    fn description(&self) -> &str {
        "Display user info"
    }
    fn usage(&self) -> &str {
        "whoami"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(format!(
            "{}@{}\n{}",
            env.user,
            env.host,
            include_str!("../content/whoami.txt").trim_end()
        )))
    }
}

// ---------------------------------------------------------------------------
// date
// ---------------------------------------------------------------------------

struct DateCmd;
impl Command for DateCmd {
    fn name(&self) -> &str {
        "date"
    }
    fn description(&self) -> &str {
        "Show current date/time"
    }
    fn usage(&self) -> &str {
        "date"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let now = chrono::Local::now();
        Ok(CommandOutput::Text(
            now.format("%a %b %d %Y %H:%M:%S GMT%z").to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// uptime
// ---------------------------------------------------------------------------

struct UptimeCmd;
impl Command for UptimeCmd {
    fn name(&self) -> &str {
        "uptime"
    }
    fn description(&self) -> &str {
        "Show system uptime"
    }
    fn usage(&self) -> &str {
        "uptime"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let secs = env.started.elapsed().as_secs();
        Ok(CommandOutput::Text(format!(
            "System uptime: {secs} seconds\n\
             3D Engine: Active\n\
             Terminal sessions: 1 active\n\
             Portfolio status: Deployed"
        )))
    }
}
