//! Display theme preference.
//!
//! [`ThemeMode`] is the persisted tri-state preference; resolving it to a
//! concrete light/dark decision consults the platform scheme only when the
//! mode is `System`.

use serde::{Deserialize, Serialize};

/// Concrete scheme reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Platform prefers a light appearance.
    Light,
    /// Platform prefers a dark appearance.
    Dark,
}

/// Persisted theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    /// Always light.
    Light,
    /// Always dark. The app ships dark-first.
    #[default]
    Dark,
    /// Follow the platform scheme.
    System,
}

impl ThemeMode {
    /// Stable string form used in persistence payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Resolve to a concrete dark/light decision given the platform scheme.
    pub fn is_dark(&self, system: ColorScheme) -> bool {
        match self {
            Self::Light => false,
            Self::Dark => true,
            Self::System => system == ColorScheme::Dark,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown theme mode string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeModeError {
    /// The unrecognised input value.
    pub input: String,
}

impl std::fmt::Display for ParseThemeModeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown theme mode: {}", self.input)
    }
}

impl std::error::Error for ParseThemeModeError {}

impl std::str::FromStr for ThemeMode {
    type Err = ParseThemeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            _ => Err(ParseThemeModeError {
                input: s.to_owned(),
            }),
        }
    }
}
