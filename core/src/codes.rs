//! Closed code lists accepted by the registered notices API.
//!
//! Each `Enumeration` maps a symbolic name to the short code sent on the
//! wire. The tables are `const` and cannot be extended at runtime.

/// A fixed mapping from symbolic name to wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enumeration {
    name: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl Enumeration {
    pub const fn new(name: &'static str, entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, entries }
    }

    /// Human-readable name used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Look up the code for a symbolic name such as `"FINNISH"`.
    pub fn code(&self, symbol: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == symbol)
            .map(|(_, code)| *code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(_, code)| *code)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// True if `code` is one of the mapped codes. Symbolic names do not match.
    pub fn contains(&self, code: &str) -> bool {
        self.codes().any(|c| c == code)
    }
}

/// Code lists whose descriptions can be fetched.
pub const CODE_LIST: Enumeration = Enumeration::new(
    "code list",
    &[
        ("COMPANY_FORM", "CF"),
        ("ENTRY_CODE", "EC"),
        ("NOTICE_REGISTRATION_TYPE", "NRT"),
    ],
);

/// Languages the API can describe codes in.
pub const LANGUAGE: Enumeration = Enumeration::new(
    "language",
    &[("ENGLISH", "EN"), ("FINNISH", "FI"), ("SWEDISH", "SV")],
);
