//! The direction and size of a price adjustment.

use std::fmt;

use serde::{Deserialize, Serialize};

static LABEL_UP: &str = "increase";
static LABEL_DOWN: &str = "decrease";
static LABEL_STRANDED: &str = "held/no change";
static LABEL_UNKNOWN: &str = "to be predicted";

/// The direction of an adjustment.
///
/// Any value other than `up`, `down` and `stranded` reads as [`Trend::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Trend {
    Up,
    Down,
    Stranded,
    Unknown,
}

impl Trend {
    /// The human readable label used in calendar events.
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Up => LABEL_UP,
            Trend::Down => LABEL_DOWN,
            Trend::Stranded => LABEL_STRANDED,
            Trend::Unknown => LABEL_UNKNOWN,
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Trend::Unknown
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stranded => "stranded",
            Trend::Unknown => "unknown",
        }
    }
}

impl From<&str> for Trend {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Trend::Up,
            "down" => Trend::Down,
            "stranded" => Trend::Stranded,
            _ => Trend::Unknown,
        }
    }
}

impl From<String> for Trend {
    fn from(value: String) -> Self {
        Trend::from(value.as_str())
    }
}

impl From<Trend> for String {
    fn from(value: Trend) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The magnitude of an adjustment, as text or as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// The amount as displayed in events, `None` for blank text.
    pub fn display(&self) -> Option<String> {
        match self {
            Amount::Number(number) => Some(number.to_string()),
            Amount::Text(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
        }
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

/// The latest known or predicted adjustment outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendInfo {
    pub last_trend: Option<Trend>,
    pub last_amount: Option<Amount>,
    pub last_news_url: Option<String>,
    pub manual_trend: Option<Trend>,
    pub manual_amount: Option<Amount>,
    /// The adjustment date the manual values apply to.
    pub manual_update: Option<String>,
}
