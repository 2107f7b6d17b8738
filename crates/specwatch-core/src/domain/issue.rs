//! Canonical issue model shared by the normalizer, diff engine and compositor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue severity.
///
/// Variant order is the sort order: `Error < Warning < Information < Hint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 4] = [
        Severity::Error,
        Severity::Warning,
        Severity::Information,
        Severity::Hint,
    ];

    /// Stable sort ordinal (Error = 0).
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Error => 0,
            Self::Warning => 1,
            Self::Information => 2,
            Self::Hint => 3,
        }
    }

    /// Score deduction for one issue of this severity.
    pub fn penalty(self) -> i32 {
        match self {
            Self::Error => 10,
            Self::Warning => 3,
            Self::Information => 1,
            Self::Hint => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Information => "Info",
            Self::Hint => "Hint",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Issue category, derived from the rule identifier.
///
/// Declaration order matches classification priority, with `General` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Spec Compliance")]
    SpecCompliance,
    #[serde(rename = "Documentation")]
    Documentation,
    #[serde(rename = "Structure")]
    Structure,
    #[serde(rename = "Security")]
    Security,
    #[serde(rename = "Naming Conventions")]
    NamingConventions,
    #[serde(rename = "Response Design")]
    ResponseDesign,
    #[serde(rename = "Server Configuration")]
    ServerConfiguration,
    #[serde(rename = "Best Practice")]
    BestPractice,
    #[serde(rename = "General")]
    General,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::SpecCompliance,
        Category::Documentation,
        Category::Structure,
        Category::Security,
        Category::NamingConventions,
        Category::ResponseDesign,
        Category::ServerConfiguration,
        Category::BestPractice,
        Category::General,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::SpecCompliance => "Spec Compliance",
            Self::Documentation => "Documentation",
            Self::Structure => "Structure",
            Self::Security => "Security",
            Self::NamingConventions => "Naming Conventions",
            Self::ResponseDesign => "Response Design",
            Self::ServerConfiguration => "Server Configuration",
            Self::BestPractice => "Best Practice",
            Self::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where in the linted document an issue was reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path or JSON pointer into the document. May be empty for document-level issues.
    pub path: String,
    /// 1-based line, when the upstream report carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-based column, when the upstream report carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line: None,
            column: None,
        }
    }

    pub fn with_position(mut self, line: Option<u32>, column: Option<u32>) -> Self {
        self.line = line;
        self.column = column;
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str("(document root)")?;
        } else {
            f.write_str(&self.path)?;
        }
        match (self.line, self.column) {
            (Some(line), Some(col)) => write!(f, " (line {line}, col {col})"),
            (Some(line), None) => write!(f, " (line {line})"),
            _ => Ok(()),
        }
    }
}

/// Identity used to match issues across scans: `code::path`.
///
/// Line and column are deliberately excluded so positional drift between
/// scans does not break identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One normalized violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub code: String,
    pub message: String,
    pub severity: Severity,
    pub category: Category,
    pub location: Location,
}

impl Issue {
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint(format!("{}::{}", self.code, self.location.path))
    }
}
