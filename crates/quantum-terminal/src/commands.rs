//! Built-in commands for the quantum terminal.

use quantum_types::Result;

use crate::fun_commands::register_fun_commands;
use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment};
use crate::portfolio_commands::register_portfolio_commands;
use crate::system_commands::register_system_commands;

/// Register every built-in command, in the order completion and "did you
/// mean" suggestions list them.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(HelpCmd));
    reg.register(Box::new(ClearCmd));
    register_system_commands(reg);
    register_portfolio_commands(reg);
    reg.register(Box::new(AiCmd));
    register_fun_commands(reg);
    reg.register(Box::new(HistoryCmd));
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

/// Minimum inner width of the help box.
const HELP_WIDTH: usize = 40;

fn category_title(category: &str) -> String {
    match category {
        "system" => "SYSTEM & NAVIGATION".to_string(),
        "portfolio" => "PORTFOLIO".to_string(),
        "assistant" => "AI ASSISTANT".to_string(),
        "fun" => "FUN STUFF".to_string(),
        other => other.to_uppercase(),
    }
}

struct HelpCmd;
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn description(&self) -> &str {
        "Show this help menu"
    }
    fn usage(&self) -> &str {
        "help"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut sections: Vec<(String, Vec<String>)> = Vec::new();
        for (category, cmds) in env.registry.catalog() {
            let mut rows = Vec::new();
            for cmd in cmds {
                rows.push(format!("{:<8} - {}", cmd.name(), cmd.description()));
                for alias in cmd.aliases() {
                    rows.push(format!("{alias:<8} - Alias for {} command", cmd.name()));
                }
            }
            sections.push((category_title(category), rows));
        }

        let width = sections
            .iter()
            .flat_map(|(title, rows)| std::iter::once(title).chain(rows))
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(HELP_WIDTH);
        let pad = |line: &str| {
            let fill = width - line.chars().count();
            format!("│ {line}{} │", " ".repeat(fill))
        };
        let rule = "─".repeat(width + 2);

        let mut out = vec!["🖥️ 3D TERMINAL COMMANDS:".to_string(), format!("╭{rule}╮")];
        for (i, (title, rows)) in sections.iter().enumerate() {
            if i > 0 {
                out.push(format!("├{rule}┤"));
            }
            out.push(pad(title.as_str()));
            out.push(format!("├{rule}┤"));
            out.extend(rows.iter().map(|row| pad(row.as_str())));
        }
        out.push(format!("╰{rule}╯"));
        out.push(String::new());
        out.push("💡 Tip: Use ↑↓ arrows for command history".to_string());
        out.push("🤖 NEW: Ask the assistant anything with 'ai - your question'".to_string());
        Ok(CommandOutput::Text(out.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn description(&self) -> &str {
        "Clear terminal screen"
    }
    fn usage(&self) -> &str {
        "clear"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Clear)
    }
}

// ---------------------------------------------------------------------------
// ai / ask
// ---------------------------------------------------------------------------

struct AiCmd;
impl Command for AiCmd {
    fn name(&self) -> &str {
        "ai"
    }
    fn description(&self) -> &str {
        "Ask the assistant (ai - question)"
    }
    fn usage(&self) -> &str {
        "ai - <question>"
    }
    fn category(&self) -> &str {
        "assistant"
    }
    fn aliases(&self) -> &[&str] {
        &["ask"]
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let joined = args.join(" ");
        let prompt = joined.strip_prefix('-').unwrap_or(&joined).trim_start();
        Ok(CommandOutput::Ask {
            prompt: prompt.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

struct HistoryCmd;
impl Command for HistoryCmd {
    fn name(&self) -> &str {
        "history"
    }
    fn description(&self) -> &str {
        "Command history"
    }
    fn usage(&self) -> &str {
        "history"
    }
    fn category(&self) -> &str {
        "fun"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        if env.history.is_empty() {
            return Ok(CommandOutput::Text("No commands in history".to_string()));
        }
        let mut out = String::from("📜 COMMAND HISTORY:\n");
        out.push_str(&"═".repeat(40));
        out.push('\n');
        for (i, line) in env.history.iter().enumerate() {
            out.push_str(&format!("{:>3}: {line}\n", i + 1));
        }
        out.push_str("\n💡 Use ↑↓ arrows to navigate history");
        Ok(CommandOutput::Text(out))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Instant;

    use quantum_types::Result;

    use super::register_builtins;
    use crate::fs::PortfolioFs;
    use crate::interpreter::{CommandOutput, CommandRegistry, Environment, tokenize};

    /// Runs single command lines against the stock registry and file tree.
    pub(crate) struct Harness {
        pub reg: CommandRegistry,
        pub fs: PortfolioFs,
        pub history: Vec<String>,
        pub cwd: String,
        started: Instant,
    }

    impl Harness {
        pub fn new() -> Self {
            let mut reg = CommandRegistry::new();
            register_builtins(&mut reg);
            Self {
                reg,
                fs: PortfolioFs::new("/home/ahraz"),
                history: Vec::new(),
                cwd: "/home/ahraz".to_string(),
                started: Instant::now(),
            }
        }

        pub fn run(&mut self, line: &str) -> Result<CommandOutput> {
            let (name, args) = tokenize(line).expect("non-blank line");
            let cmd = self.reg.lookup(&name).expect("known command");
            let mut env = Environment {
                cwd: self.cwd.clone(),
                home: "/home/ahraz",
                user: "ahraz",
                host: "3d-terminal",
                fs: &self.fs,
                history: &self.history,
                registry: &self.reg,
                started: self.started,
            };
            let out = cmd.execute(&args, &mut env);
            self.cwd = env.cwd;
            out
        }

        /// Run and unwrap the visible text of a successful command.
        pub fn text(&mut self, line: &str) -> String {
            match self.run(line).expect("command succeeds") {
                CommandOutput::Text(s) | CommandOutput::Matrix(s) | CommandOutput::Exit(s) => s,
                other => panic!("expected text from {line:?}, got {other:?}"),
            }
        }
    }
}
