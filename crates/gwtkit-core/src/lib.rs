//! Core shared types for gwtkit.
//!
//! This crate is intentionally small and dependency-light: qualified names,
//! the GWT version/capability table, compiler output styles, diagnostics,
//! and the well-known class-name table everything else keys off.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod well_known;

/// A dot-separated fully-qualified Java name (class, interface, or GWT module).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifiedName(String);

impl QualifiedName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last dot-separated segment.
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Everything before the last segment, or `None` for an unqualified name.
    pub fn package(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(pkg, _)| pkg)
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Append a segment, yielding `self.segment`.
    pub fn join(&self, segment: &str) -> QualifiedName {
        if self.0.is_empty() {
            QualifiedName::new(segment)
        } else {
            QualifiedName::new(format!("{}.{segment}", self.0))
        }
    }

    /// Append a suffix to the last segment (e.g. the `Async` interface name).
    pub fn with_suffix(&self, suffix: &str) -> QualifiedName {
        QualifiedName::new(format!("{}{suffix}", self.0))
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for QualifiedName {
    fn from(value: &str) -> Self {
        QualifiedName::new(value)
    }
}

/// Whether `text` is usable as a single Java identifier.
pub fn is_java_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// A GWT SDK feature level.
///
/// Ordering matters: capabilities only ever relax in later versions, which is
/// what keeps serializability checks monotone across upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GwtVersion {
    V1_0,
    V1_4,
    V1_5,
    V1_6,
}

impl GwtVersion {
    /// The newest feature level this crate knows about.
    ///
    /// Version detection falls back to this on any classification failure.
    pub fn latest() -> Self {
        GwtVersion::V1_6
    }

    /// Java generics in client code (and parameterized `AsyncCallback`).
    pub fn supports_generics(self) -> bool {
        self >= GwtVersion::V1_5
    }

    /// Whether `java.io.Serializable` works as an RPC marker in addition to
    /// `IsSerializable`.
    pub fn supports_java_io_serializable(self) -> bool {
        self >= GwtVersion::V1_4
    }

    /// Output-directory flag spelling changed with the 1.6 war layout.
    pub fn war_output_flag(self) -> &'static str {
        if self >= GwtVersion::V1_6 {
            "-war"
        } else {
            "-out"
        }
    }
}

impl fmt::Display for GwtVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GwtVersion::V1_0 => "1.0",
            GwtVersion::V1_4 => "1.4",
            GwtVersion::V1_5 => "1.5",
            GwtVersion::V1_6 => "1.6",
        };
        f.write_str(text)
    }
}

/// JavaScript output style passed to the external compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutputStyle {
    Obfuscated,
    Pretty,
    Detailed,
}

impl OutputStyle {
    pub fn as_flag(self) -> &'static str {
        match self {
            OutputStyle::Obfuscated => "OBF",
            OutputStyle::Pretty => "PRETTY",
            OutputStyle::Detailed => "DETAILED",
        }
    }

    /// Stable numeric id used by the persisted validity record.
    pub fn numeric_id(self) -> u8 {
        match self {
            OutputStyle::Obfuscated => 0,
            OutputStyle::Pretty => 1,
            OutputStyle::Detailed => 2,
        }
    }

    pub fn from_numeric_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(OutputStyle::Obfuscated),
            1 => Some(OutputStyle::Pretty),
            2 => Some(OutputStyle::Detailed),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A user-facing finding produced by one of the checkers.
///
/// Structural mismatches are reported this way rather than as hard errors:
/// interfaces are routinely out of sync while being edited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }
}
