//! User-facing messages produced while generating a rig.

use std::fmt;

use serde::Serialize;

use super::error::RigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub level: ReportLevel,
    pub message: String,
}

impl From<&RigError> for ReportEntry {
    fn from(error: &RigError) -> Self {
        Self {
            level: error.report_level(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Ordered collection of report entries for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RigReport {
    pub entries: Vec<ReportEntry>,
}

impl RigReport {
    pub fn push(&mut self, level: ReportLevel, message: impl Into<String>) {
        self.entries.push(ReportEntry {
            level,
            message: message.into(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ReportLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(ReportLevel::Warning, message);
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.level == ReportLevel::Warning)
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
