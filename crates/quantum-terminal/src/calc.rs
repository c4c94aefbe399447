//! Restricted arithmetic evaluator behind the `calc` command.
//!
//! Input is first reduced to digits, `+ - * / . ( ) %` and whitespace, then
//! parsed by a small recursive-descent parser:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | '(' expr ')'
//! ```
//!
//! Arithmetic is IEEE-754 `f64`, so `1/0` is `Infinity` and `0/0` is `NaN`.

use quantum_types::{QuantumError, Result};

/// Maximum fractional digits emitted by [`format_radix`].
const MAX_FRACTION_DIGITS: usize = 16;

/// Nesting limit for parentheses and unary operators.
const MAX_DEPTH: usize = 64;

/// Drop every character the evaluator does not understand.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || "+-*/.()%".contains(*c) || c.is_whitespace())
        .collect()
}

/// Sanitize and evaluate an expression.
pub fn evaluate(input: &str) -> Result<f64> {
    let cleaned = sanitize(input);
    let mut parser = Parser {
        chars: cleaned.chars().filter(|c| !c.is_whitespace()).collect(),
        pos: 0,
        depth: 0,
    };
    if parser.chars.is_empty() {
        return Err(QuantumError::Command("empty expression".into()));
    }
    let value = parser.expr()?;
    match parser.peek() {
        None => Ok(value),
        Some(c) => Err(parser.error(&format!("unexpected '{c}'"))),
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn error(&self, msg: &str) -> QuantumError {
        QuantumError::Command(format!("{msg} at position {}", self.pos))
    }

    fn expr(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64> {
        let mut value = self.unary()?;
        while let Some(op @ ('*' | '/' | '%')) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                '*' => value * rhs,
                '/' => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64> {
        match self.peek() {
            Some(op @ ('+' | '-')) => {
                self.pos += 1;
                self.descend()?;
                let value = self.unary();
                self.depth -= 1;
                let value = value?;
                Ok(if op == '-' { -value } else { value })
            },
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                self.descend()?;
                let value = self.expr();
                self.depth -= 1;
                let value = value?;
                match self.bump() {
                    Some(')') => Ok(value),
                    _ => Err(self.error("expected ')'")),
                }
            },
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(self.error(&format!("unexpected '{c}'"))),
            None => Err(self.error("unexpected end of expression")),
        }
    }

    fn number(&mut self) -> Result<f64> {
        let start = self.pos;
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.pos += 1;
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if text == "." {
            return Err(self.error("malformed number"));
        }
        text.parse::<f64>()
            .map_err(|_| self.error(&format!("malformed number '{text}'")))
    }

    fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("expression nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }
}

/// Decimal rendering: integers without a fraction, `Infinity`, `-Infinity`
/// and `NaN` for the IEEE specials. Magnitudes from 1e21 up and below 1e-6
/// switch to exponent form with an explicit sign (`1e+21`, `1.5e-7`).
pub fn format_decimal(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        (if value > 0.0 { "Infinity" } else { "-Infinity" }).to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        let sci = format!("{value:e}");
        match sci.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => sci,
        }
    } else {
        format!("{value}")
    }
}

/// Render `value` in `radix` (2..=36, lowercase digits). The fractional part,
/// if any, follows a `.` and is cut at sixteen digits.
pub fn format_radix(value: f64, radix: u32) -> String {
    debug_assert!((2..=36).contains(&radix));
    if value.is_nan() || value.is_infinite() {
        return format_decimal(value);
    }
    let negative = value < 0.0;
    let value = value.abs();
    let base = f64::from(radix);

    let mut int_part = value.trunc();
    let mut frac = value - int_part;

    let mut digits = Vec::new();
    if int_part == 0.0 {
        digits.push('0');
    }
    while int_part >= 1.0 {
        let rem = int_part % base;
        digits.push(digit(rem, radix));
        int_part = ((int_part - rem) / base).trunc();
    }
    if negative {
        digits.push('-');
    }
    let mut out: String = digits.into_iter().rev().collect();

    if frac > 0.0 {
        out.push('.');
        for _ in 0..MAX_FRACTION_DIGITS {
            if frac <= 0.0 {
                break;
            }
            frac *= base;
            let d = frac.trunc();
            out.push(digit(d, radix));
            frac -= d;
        }
    }
    out
}

fn digit(value: f64, radix: u32) -> char {
    // `value` is an integral f64 in 0..radix.
    let d = value as u32;
    char::from_digit(d, radix).unwrap_or('?')
}
