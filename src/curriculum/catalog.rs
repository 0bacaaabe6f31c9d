//! Declarative catalog files.
//!
//! A catalog is a TOML document consumed once at startup: category
//! definitions, course records, category requirements, the generic
//! term mapping that seeds initial placement, and DTA exemption lists.

use crate::curriculum::Curriculum;
use crate::models::{CategoryDef, Course, DtaKind, Requirement, Season, Term};
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawCatalog {
    name: String,
    #[serde(default)]
    categories: Vec<CategoryDef>,
    #[serde(default)]
    courses: Vec<RawCourse>,
    #[serde(default)]
    requirements: Vec<RawRequirement>,
    /// Generic term label -> course names placed in that term
    #[serde(default)]
    terms: BTreeMap<String, Vec<String>>,
    /// DTA kind ("AA"/"AS") -> exempted course names
    #[serde(default)]
    dta: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawCourse {
    name: String,
    credits: f64,
    categories: Vec<String>,
    #[serde(default)]
    prereqs: Vec<String>,
    #[serde(default)]
    coreqs: Vec<String>,
    #[serde(default)]
    coprereqs: Vec<String>,
    full_name: Option<String>,
    note: Option<String>,
    typical_semester: Option<String>,
    #[serde(default)]
    writing_intensive: bool,
    #[serde(default)]
    critical_path: bool,
}

#[derive(Debug, Deserialize)]
struct RawRequirement {
    category: String,
    kind: String,
    number: Option<f64>,
    note: Option<String>,
}

impl RawRequirement {
    fn parse(&self) -> Result<Requirement> {
        match self.kind.as_str() {
            "number_of_credits" | "Number of Credits" => {
                let min = self.number.ok_or_else(|| {
                    Error::InvalidFormat(format!(
                        "credit requirement on {} needs a number",
                        self.category
                    ))
                })?;
                Ok(Requirement::Credits { min })
            }
            "number_of_courses" | "Number of Courses" => {
                let min = self.number.ok_or_else(|| {
                    Error::InvalidFormat(format!(
                        "course-count requirement on {} needs a number",
                        self.category
                    ))
                })?;
                Ok(Requirement::Courses { min: min as usize })
            }
            // Writing-intensive defaults to one course.
            "writing_intensive" | "Writing Intensive" => Ok(Requirement::WritingIntensive {
                min: self.number.unwrap_or(1.0) as usize,
            }),
            other => Err(Error::InvalidFormat(format!(
                "unrecognized requirement kind: {other}"
            ))),
        }
    }
}

/// Load a curriculum from a TOML catalog file.
pub fn load(path: &Path) -> Result<Curriculum> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Parse a TOML catalog document into a curriculum.
pub fn parse(text: &str) -> Result<Curriculum> {
    let raw: RawCatalog = toml::from_str(text)?;
    let mut curriculum = Curriculum::new(raw.name.clone());
    curriculum.define_categories(raw.categories);

    for rc in &raw.courses {
        let mut course = Course::new(&rc.name, rc.credits, rc.categories.clone());
        course.prereqs = rc.prereqs.clone();
        course.coreqs = rc.coreqs.clone();
        course.coprereqs = rc.coprereqs.clone();
        course.full_name = rc.full_name.clone();
        course.note = rc.note.clone();
        course.typical_season = match &rc.typical_semester {
            Some(s) => Some(Season::parse(s)?),
            None => None,
        };
        course.writing_intensive = rc.writing_intensive;
        course.critical_path = rc.critical_path;
        curriculum.add_course(course)?;
    }

    for rr in &raw.requirements {
        let requirement = rr.parse()?;
        curriculum.add_requirement(&rr.category, requirement, rr.note.clone())?;
    }

    for (label, names) in &raw.terms {
        let term: Term = label.parse()?;
        for name in names {
            let course = curriculum
                .course_mut(name)
                .ok_or_else(|| Error::NotFound(name.clone()))?;
            course.generic_term = Some(term);
        }
    }

    for (kind, names) in &raw.dta {
        let kind: DtaKind = kind.parse()?;
        curriculum.set_dta_exemptions(kind, names.clone());
    }

    Ok(curriculum)
}
