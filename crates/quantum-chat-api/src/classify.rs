//! Mapping of upstream failures onto client-facing responses.

/// Coarse kind of upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    RateLimited,
    QuotaExhausted,
    Unavailable,
}

impl FailureClass {
    /// Classify by the upstream's error message, ignoring case.
    pub fn of(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("rate limit") {
            Self::RateLimited
        } else if lower.contains("quota") {
            Self::QuotaExhausted
        } else {
            Self::Unavailable
        }
    }

    pub fn status(self) -> u16 {
        match self {
            Self::RateLimited | Self::QuotaExhausted => 429,
            Self::Unavailable => 500,
        }
    }

    pub fn message(self, persona: &str) -> String {
        match self {
            Self::RateLimited => format!(
                "🤖 {persona}: Whoa! Too many questions! Give me a second to catch up... ⚡"
            ),
            Self::QuotaExhausted => format!(
                "💸 {persona}: Oops! Ahraz ran out of AI budget this month. Try again next month!"
            ),
            Self::Unavailable => {
                format!("☕ {persona}: is taking a coffee break! Try again in a moment...")
            },
        }
    }
}
