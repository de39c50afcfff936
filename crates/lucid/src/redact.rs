//! Confidentiality filter applied to object values before display.

use regex::{RegexSet, RegexSetBuilder};

/// Turns the printable form of a live value into what may be shown.
pub trait Redactor {
    /// `name` is the variable or expression bound to the value and `value`
    /// its printable form.
    fn redact(&self, name: &str, value: &str) -> String;
}

/// Shows every value as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRedaction;

impl Redactor for NoRedaction {
    fn redact(&self, _name: &str, value: &str) -> String {
        value.to_owned()
    }
}

/// Placeholder shown instead of a hidden value.
pub const HIDDEN: &str = "'••••••'";

/// Hides values whose variable name matches any of a set of patterns.
///
/// Patterns are case-insensitive regular expressions searched anywhere in
/// the name, so `passw` hides both `password` and `db_passwd`.
#[derive(Debug, Clone)]
pub struct PatternRedactor {
    patterns: RegexSet,
}

impl PatternRedactor {
    /// Patterns hiding the usual credential names.
    pub const SECRET_NAMES: &[&str] = &["passw", "pwd", "secret", "token", "api_?key", "credential"];

    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = RegexSetBuilder::new(patterns).case_insensitive(true).build()?;
        Ok(Self { patterns })
    }

    /// Redactor for [`Self::SECRET_NAMES`].
    #[must_use]
    pub fn secrets() -> Self {
        Self::new(Self::SECRET_NAMES).expect("static pattern")
    }

    #[must_use]
    pub fn hides(&self, name: &str) -> bool {
        self.patterns.is_match(name)
    }
}

impl Redactor for PatternRedactor {
    fn redact(&self, name: &str, value: &str) -> String {
        if self.hides(name) {
            HIDDEN.to_owned()
        } else {
            value.to_owned()
        }
    }
}
