//! Fun and utility commands: matrix, hack, cowsay, fortune, weather, music,
//! snake, calc.

use rand::Rng;
use rand::seq::IndexedRandom;

use quantum_types::{QuantumError, Result};

use crate::calc::{evaluate, format_decimal, format_radix};
use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment};

/// Register the fun and utility commands.
pub fn register_fun_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(MatrixCmd));
    reg.register(Box::new(ShowCmd {
        name: "hack",
        description: "Hacking simulation",
        page: include_str!("../content/hack.txt"),
    }));
    reg.register(Box::new(CowsayCmd));
    reg.register(Box::new(FortuneCmd));
    reg.register(Box::new(WeatherCmd));
    reg.register(Box::new(ShowCmd {
        name: "music",
        description: "Terminal music player",
        page: include_str!("../content/music.txt"),
    }));
    reg.register(Box::new(ShowCmd {
        name: "snake",
        description: "Snake game (ASCII)",
        page: include_str!("../content/snake.txt"),
    }));
    reg.register(Box::new(CalcCmd));
}

/// A fun command that prints a fixed page.
struct ShowCmd {
    name: &'static str,
    description: &'static str,
    page: &'static str,
}

impl Command for ShowCmd {
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
        "fun"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(self.page.trim_end().to_string()))
    }
}

// ---------------------------------------------------------------------------
// matrix
// ---------------------------------------------------------------------------

struct MatrixCmd;
impl Command for MatrixCmd {
    fn name(&self) -> &str {
        "matrix"
    }
    fn description(&self) -> &str {
        "Enter the Matrix"
    }
    fn usage(&self) -> &str {
        "matrix"
    }
    fn category(&self) -> &str {
        "fun"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Matrix(
            include_str!("../content/matrix.txt").trim_end().to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// cowsay
// ---------------------------------------------------------------------------

const COW_DEFAULT: &str = "Welcome to my 3D portfolio!";

struct CowsayCmd;
impl Command for CowsayCmd {
    fn name(&self) -> &str {
        "cowsay"
    }
    fn description(&self) -> &str {
        "Make a cow talk"
    }
    fn usage(&self) -> &str {
        "cowsay [text...]"
    }
    fn category(&self) -> &str {
        "fun"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let message = if args.is_empty() {
            COW_DEFAULT.to_string()
        } else {
            args.join(" ")
        };
        Ok(CommandOutput::Text(cowsay(&message)))
    }
}

fn cowsay(message: &str) -> String {
    let len = message.chars().count();
    let top = format!(" {}", "_".repeat(len + 2));
    let bottom = format!(" {}", "-".repeat(len + 2));
    format!(
        "{top}\n< {message} >\n{bottom}\n\
         \x20       \\   ^__^\n\
         \x20        \\  (oo)\\_______\n\
         \x20           (__)\\       )\\/\\\n\
         \x20               ||----w |\n\
         \x20               ||     ||\n\
         \n\
         🐄 Moo! Thanks for visiting my 3D space!\n\
         \x20  This cow is rendered in pure ASCII,\n\
         \x20  unlike the fancy 3D graphics behind me! 😂"
    )
}

// ---------------------------------------------------------------------------
// fortune
// ---------------------------------------------------------------------------

const FORTUNES: &[&str] = &[
    "The future belongs to those who code in 3D! 🚀",
    "Innovation is seeing what everybody has seen and thinking what nobody has thought. 💡",
    "Code is poetry written in logic and rendered in 3D. 📝",
    "The best way to predict the future is to create it. ⚛️",
    "Debugging is like being a detective in a crime movie where you're also the murderer. 🔍",
    "There are only 10 types of people: those who understand binary and those who need 3D visualizations. 🤓",
    "In 3D space, no one can hear you console.log(). 🌌",
    "May your framerate be high and your render times be low. 🎮",
];

struct FortuneCmd;
impl Command for FortuneCmd {
    fn name(&self) -> &str {
        "fortune"
    }
    fn description(&self) -> &str {
        "Random quote"
    }
    fn usage(&self) -> &str {
        "fortune"
    }
    fn category(&self) -> &str {
        "fun"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let pick = FORTUNES.choose(&mut rand::rng()).copied().unwrap_or(FORTUNES[0]);
        Ok(CommandOutput::Text(format!("🔮 {pick}")))
    }
}

// ---------------------------------------------------------------------------
// weather
// ---------------------------------------------------------------------------

const CONDITIONS: &[&str] = &["Sunny", "Cloudy", "Rainy", "Snowy", "Partly Cloudy"];

struct WeatherCmd;
impl Command for WeatherCmd {
    fn name(&self) -> &str {
        "weather"
    }
    fn description(&self) -> &str {
        "Check weather"
    }
    fn usage(&self) -> &str {
        "weather"
    }
    fn category(&self) -> &str {
        "fun"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut rng = rand::rng();
        let temp: i32 = rng.random_range(-10..20);
        let condition = CONDITIONS.choose(&mut rng).copied().unwrap_or("Sunny");
        let humidity: u32 = rng.random_range(0..100);
        let wind: u32 = rng.random_range(0..20);
        Ok(CommandOutput::Text(format!(
            "🌤️  WEATHER REPORT - Toronto, ON\n\
             {}\n\
             Temperature: {temp}°C\n\
             Condition: {condition}\n\
             Humidity: {humidity}%\n\
             Wind: {wind} km/h\n\
             \n\
             🖥️  3D Environment Status:\n\
             Lighting: Optimal for 3D rendering ✨\n\
             Framerate Weather: Smooth 60 FPS 🎮\n\
             \n\
             Perfect weather for 3D development! 🌟",
            "═".repeat(40)
        )))
    }
}

// ---------------------------------------------------------------------------
// calc
// ---------------------------------------------------------------------------

struct CalcCmd;
impl Command for CalcCmd {
    fn name(&self) -> &str {
        "calc"
    }
    fn description(&self) -> &str {
        "Calculator"
    }
    fn usage(&self) -> &str {
        "calc <expression>"
    }
    fn category(&self) -> &str {
        "fun"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.is_empty() {
            return Ok(CommandOutput::Text(
                "Usage: calc <expression> (e.g., calc 2+2)".to_string(),
            ));
        }
        let expression = args.join(" ");
        let rule = "═".repeat(38);
        let value = evaluate(&expression).map_err(|e| {
            log::debug!("calc rejected {expression:?}: {e}");
            QuantumError::Command(format!(
                "❌ CALCULATION ERROR:\n{rule}\n\
                 Invalid expression: {expression}\n\
                 \n\
                 💡 Tip: Use basic operators (+, -, *, /, %)\n\
                 📝 Example: calc 1337 * 42 / 7"
            ))
        })?;
        Ok(CommandOutput::Text(format!(
            "🧮 QUANTUM CALCULATOR:\n{rule}\n\
             Input:  {expression}\n\
             Output: {}\n\
             Binary: {}\n\
             Hex:    0x{}",
            format_decimal(value),
            format_radix(value, 2),
            format_radix(value, 16).to_uppercase(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::Harness;

    #[test]
    fn cowsay_border_matches_message() {
        let mut h = Harness::new();
        let text = h.text("cowsay hello");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], format!(" {}", "_".repeat(7)));
        assert_eq!(lines[1], "< hello >");
        assert_eq!(lines[2], format!(" {}", "-".repeat(7)));
        assert_eq!(lines[3], "        \\   ^__^");
    }

    #[test]
    fn cowsay_default_message() {
        let mut h = Harness::new();
        let text = h.text("cowsay");
        assert!(text.contains(&format!("< {COW_DEFAULT} >")));
        let top = text.lines().next().unwrap();
        assert_eq!(top.chars().count(), 1 + COW_DEFAULT.chars().count() + 2);
    }

    #[test]
    fn cowsay_counts_characters_not_bytes() {
        let text = cowsay("héllo");
        assert_eq!(text.lines().next().unwrap(), format!(" {}", "_".repeat(7)));
    }

    #[test]
    fn calc_two_plus_two() {
        let mut h = Harness::new();
        let text = h.text("calc 2+2");
        assert!(text.contains("Output: 4\n"));
        assert!(text.contains("Binary: 100\n"));
        assert!(text.ends_with("Hex:    0x4"));
    }

    #[test]
    fn calc_hex_is_uppercase() {
        let mut h = Harness::new();
        assert!(h.text("calc 255").ends_with("0xFF"));
    }

    #[test]
    fn calc_usage_and_error() {
        let mut h = Harness::new();
        assert!(h.text("calc").starts_with("Usage: calc"));
        let err = h.run("calc 2+").unwrap_err().to_string();
        assert!(err.starts_with("❌ CALCULATION ERROR:"));
        assert!(err.contains("Invalid expression: 2+"));
    }

    #[test]
    fn calc_division_by_zero() {
        let mut h = Harness::new();
        let text = h.text("calc 1/0");
        assert!(text.contains("Output: Infinity"));
    }

    #[test]
    fn matrix_signals_effect() {
        let mut h = Harness::new();
        assert!(matches!(h.run("matrix").unwrap(), CommandOutput::Matrix(_)));
    }

    #[test]
    fn fortune_and_weather_vary_within_bounds() {
        let mut h = Harness::new();
        for _ in 0..20 {
            let fortune = h.text("fortune");
            assert!(FORTUNES.iter().any(|f| fortune == format!("🔮 {f}")));
            let weather = h.text("weather");
            assert!(CONDITIONS.iter().any(|c| weather.contains(&format!("Condition: {c}\n"))));
        }
    }

    #[test]
    fn static_pages_render() {
        let mut h = Harness::new();
        assert!(h.text("hack").contains("HACKING SEQUENCE"));
        assert!(!h.text("music").is_empty());
        assert!(!h.text("snake").is_empty());
    }
}
