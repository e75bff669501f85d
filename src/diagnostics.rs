//! Advisory diagnostics.
//!
//! Warnings never stop a parse. They describe legacy or suspicious syntax
//! and are handed to a [`DiagnosticSink`] supplied by the caller; by default
//! they go to the `log` facade.

use std::{fmt, sync::Arc};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// `mixin name` without a body, the pre-`+name` call syntax.
    LegacyMixinCall { name: String },
    /// More than one `(...)` attribute group on a single tag.
    MultipleAttributeGroups,
    /// An include path using a deprecated template extension.
    LegacyTemplateExtension { path: String, preferred: String },
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyMixinCall { name } => write!(
                f,
                "deprecated method of calling mixin `{name}`, use `+{name}` instead"
            ),
            Self::MultipleAttributeGroups => {
                write!(f, "you should not have tags with multiple attribute groups")
            }
            Self::LegacyTemplateExtension { path, preferred } => write!(
                f,
                "the extension of \"{path}\" is deprecated, use {preferred} instead"
            ),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Warning {
    pub line: usize,
    pub column: usize,
    pub filename: Option<Arc<str>>,
    pub kind: WarningKind,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(filename) => write!(f, "{filename}, line {}: {}", self.line, self.kind),
            None => write!(f, "line {}: {}", self.line, self.kind),
        }
    }
}

/// Receives advisory warnings raised while parsing.
pub trait DiagnosticSink {
    fn warn(&mut self, warning: Warning);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &mut T {
    fn warn(&mut self, warning: Warning) {
        (**self).warn(warning);
    }
}

/// Forwards warnings to `log::warn!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn warn(&mut self, warning: Warning) {
        log::warn!(
            filename = warning.filename.as_deref().unwrap_or("<anonymous>"),
            line = warning.line;
            "{}",
            warning.kind
        );
    }
}

/// Keeps every warning in memory, in the order they were raised.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    warnings: Vec<Warning>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

impl DiagnosticSink for CollectingSink {
    fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}
