//! Portfolio content commands. Each one prints a fixed page of text.

use quantum_types::Result;

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment};

/// A command that prints a fixed page.
struct PageCmd {
    name: &'static str,
    description: &'static str,
    page: &'static str,
}

impl Command for PageCmd {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        self.description
    }
    fn usage(&self) -> &str {
        self.name
    }
    fn category(&self) -> &str {
        "portfolio"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(self.page.trim_end().to_string()))
    }
}

const PAGES: &[(&str, &str, &str)] = &[
    ("about", "About Ahraz Kibria", include_str!("../content/about.txt")),
    ("projects", "Featured projects", include_str!("../content/projects.txt")),
    ("skills", "Technical skills", include_str!("../content/skills.txt")),
    ("contact", "Contact information", include_str!("../content/contact.txt")),
    ("education", "Educational background", include_str!("../content/education.txt")),
    ("achievements", "Awards & achievements", include_str!("../content/achievements.txt")),
    ("experience", "Work experience", include_str!("../content/experience.txt")),
];

/// Register the portfolio content commands.
pub fn register_portfolio_commands(reg: &mut CommandRegistry) {
    for &(name, description, page) in PAGES {
        reg.register(Box::new(PageCmd {
            name,
            description,
            page,
        }));
    }
}
