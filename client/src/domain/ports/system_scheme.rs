//! Port reporting the platform's colour scheme.
//!
//! The preference store consults this only when the persisted mode is
//! `System`. The UI shell provides the platform-backed implementation;
//! [`FixedScheme`] serves tests and headless use.

use crate::domain::ColorScheme;

/// Port exposing the platform's reported light/dark preference.
pub trait SystemScheme: Send + Sync {
    /// The scheme the platform currently reports.
    fn current(&self) -> ColorScheme;
}

/// Fixture implementation returning a constant scheme.
#[derive(Debug, Clone, Copy)]
pub struct FixedScheme(pub ColorScheme);

impl SystemScheme for FixedScheme {
    fn current(&self) -> ColorScheme {
        self.0
    }
}
