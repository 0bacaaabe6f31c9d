//! Data models for cursus entities.
//!
//! This module defines the core data structures:
//! - `Term` / `Season` - the term ordering algebra
//! - `Course` - catalog entries with credits, categories, and relationships
//! - `Requirement` - category requirement kinds and thresholds
//! - `DependencyIssues` - output of the dependency-violation detector
//! - `Note` - timestamped free text attached to a student plan

pub mod term;

pub use term::{Season, Term, ALL_SEASONS, SKIP_SUMMER, WITH_SUMMER};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A catalog course. Identity is the (unique) name.
///
/// This is catalog-side data only: per-plan state (assigned term, completed
/// flag) lives in plan overlays so that independent plans over the same
/// curriculum cannot interfere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique short name (e.g., "ME 308")
    pub name: String,

    /// Credit hours (non-negative)
    pub credits: f64,

    /// Category codes; at least one, validated against the curriculum vocabulary
    pub categories: Vec<String>,

    /// Names of courses that must be completed in a strictly earlier term
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prereqs: Vec<String>,

    /// Names of courses that must be taken in exactly the same term
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coreqs: Vec<String>,

    /// Names of courses that must be taken in the same term or earlier
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coprereqs: Vec<String>,

    /// Catalog-relative placement (e.g., "2S") before a calendar is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_term: Option<Term>,

    /// Human-readable title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// Free-form note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Season this course is typically offered in, if it matters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typical_season: Option<Season>,

    /// Counts toward writing-intensive requirements
    #[serde(default)]
    pub writing_intensive: bool,

    /// Schedule-sensitive course (informational)
    #[serde(default)]
    pub critical_path: bool,
}

impl Course {
    /// Create a new course with the given name, credits, and categories.
    pub fn new(name: impl Into<String>, credits: f64, categories: Vec<String>) -> Self {
        Self {
            name: name.into(),
            credits,
            categories,
            prereqs: Vec::new(),
            coreqs: Vec::new(),
            coprereqs: Vec::new(),
            generic_term: None,
            full_name: None,
            note: None,
            typical_season: None,
            writing_intensive: false,
            critical_path: false,
        }
    }

    pub fn add_prereq(&mut self, name: impl Into<String>) -> &mut Self {
        self.prereqs.push(name.into());
        self
    }

    pub fn add_coreq(&mut self, name: impl Into<String>) -> &mut Self {
        self.coreqs.push(name.into());
        self
    }

    pub fn add_coprereq(&mut self, name: impl Into<String>) -> &mut Self {
        self.coprereqs.push(name.into());
        self
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_generic_term(mut self, term: Term) -> Self {
        self.generic_term = Some(term);
        self
    }

    /// Whether this course has any dependency relationship at all.
    pub fn has_dependencies(&self) -> bool {
        !self.prereqs.is_empty() || !self.coreqs.is_empty() || !self.coprereqs.is_empty()
    }

    /// Display note: the explicit note, else the full name, else
    /// "<name> (<credits> cr)".
    pub fn display_note(&self) -> String {
        if let Some(note) = &self.note {
            note.clone()
        } else if let Some(full_name) = &self.full_name {
            full_name.clone()
        } else {
            format!("{} ({} cr)", self.name, self.credits)
        }
    }
}

/// A category definition: code, display name, sort order, and aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDef {
    pub code: String,
    pub name: String,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl CategoryDef {
    pub fn new(code: impl Into<String>, name: impl Into<String>, order: u32) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            order,
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

/// The kinds a category requirement can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    Credits,
    Courses,
    WritingIntensive,
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementKind::Credits => write!(f, "Number of Credits"),
            RequirementKind::Courses => write!(f, "Number of Courses"),
            RequirementKind::WritingIntensive => write!(f, "Writing Intensive"),
        }
    }
}

/// A category requirement with its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    /// Sum of tagged course credits must reach `min`
    Credits { min: f64 },
    /// Count of tagged courses must reach `min`
    Courses { min: usize },
    /// Count of tagged writing-intensive courses must reach `min`
    WritingIntensive { min: usize },
}

impl Requirement {
    pub fn kind(&self) -> RequirementKind {
        match self {
            Requirement::Credits { .. } => RequirementKind::Credits,
            Requirement::Courses { .. } => RequirementKind::Courses,
            Requirement::WritingIntensive { .. } => RequirementKind::WritingIntensive,
        }
    }

    /// The threshold as a number, for progress fractions.
    pub fn threshold(&self) -> f64 {
        match self {
            Requirement::Credits { min } => *min,
            Requirement::Courses { min } => *min as f64,
            Requirement::WritingIntensive { min } => *min as f64,
        }
    }
}

/// A requirement attached to a category, with an optional authoring note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequirement {
    pub category: String,
    #[serde(flatten)]
    pub requirement: Requirement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Transfer-degree exemption bundles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum DtaKind {
    Aa,
    As,
}

impl fmt::Display for DtaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DtaKind::Aa => write!(f, "AA"),
            DtaKind::As => write!(f, "AS"),
        }
    }
}

impl FromStr for DtaKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "AA" | "aa" => Ok(DtaKind::Aa),
            "AS" | "as" => Ok(DtaKind::As),
            _ => Err(crate::Error::InvalidFormat(format!(
                "unrecognized DTA kind: {s} (expected AA or AS)"
            ))),
        }
    }
}

/// Unmet dependencies for one course, as reported by the detector.
///
/// A course absent from the report map is fully satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyIssues {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmet_prereqs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmet_coreqs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmet_coprereqs: Vec<String>,
}

impl DependencyIssues {
    pub fn is_empty(&self) -> bool {
        self.unmet_prereqs.is_empty()
            && self.unmet_coreqs.is_empty()
            && self.unmet_coprereqs.is_empty()
    }
}

/// An unsatisfied category requirement, with progress numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnmetRequirement {
    pub category: String,
    pub requirement: Requirement,
    /// Current credit sum or course count
    pub have: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl fmt::Display for UnmetRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {}/{}",
            self.category,
            self.requirement.kind(),
            self.have,
            self.requirement.threshold()
        )
    }
}

/// A timestamped free-text note on a student plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            text: text.into(),
        }
    }
}
