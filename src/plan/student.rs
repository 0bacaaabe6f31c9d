//! Student plans: a generic plan anchored to a concrete student timeline.
//!
//! Construction translates every generic term label into an absolute term
//! once. This is one-time and irreversible; re-running it after individual
//! term edits would not reproduce the same layout, so it only happens in
//! the constructor.

use crate::curriculum::Curriculum;
use crate::models::{
    Course, DependencyIssues, DtaKind, Note, RequirementKind, Season, Term, UnmetRequirement,
    SKIP_SUMMER,
};
use crate::plan::GenericPlan;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A per-student course plan over an owned curriculum.
#[derive(Debug, Clone)]
pub struct StudentPlan {
    generic: GenericPlan,
    start: Term,
    current_term: Term,
    notes: Vec<Note>,
    dta: Option<DtaKind>,
}

impl StudentPlan {
    /// Create a plan anchored at the student's first term and materialize
    /// the catalog's generic layout onto their calendar.
    ///
    /// The anchor season must be Spring or Fall; school years alternate
    /// between those two seasons only.
    pub fn new(curriculum: Curriculum, start_year: u16, start_season: Season) -> Result<Self> {
        if !matches!(start_season, Season::Spring | Season::Fall) {
            return Err(Error::InvalidFormat(format!(
                "start season must be Spring or Fall, got {start_season}"
            )));
        }
        let start = Term::at(start_year, start_season);
        let mut plan = Self {
            generic: GenericPlan::new(curriculum),
            start,
            current_term: start,
            notes: Vec::new(),
            dta: None,
        };
        plan.materialize_terms()?;
        Ok(plan)
    }

    /// Rebuild a plan from persisted parts. Skips materialization.
    pub fn from_parts(
        curriculum: Curriculum,
        start: Term,
        current_term: Term,
        terms: BTreeMap<String, Term>,
        completed: Vec<String>,
        notes: Vec<Note>,
        dta: Option<DtaKind>,
    ) -> Self {
        let mut generic = GenericPlan::new(curriculum);
        generic.terms = terms;
        generic.completed = completed.into_iter().collect();
        Self {
            generic,
            start,
            current_term,
            notes,
            dta,
        }
    }

    /// Convert generic labels ("1F", "2S", ...) into absolute terms.
    ///
    /// The distinct generic terms, in their school-year order, map onto
    /// consecutive Spring/Fall terms walking forward from the anchor.
    fn materialize_terms(&mut self) -> Result<()> {
        let mut generic_terms: Vec<Term> = self
            .generic
            .terms
            .values()
            .filter(|t| t.is_generic())
            .copied()
            .collect();
        generic_terms.sort();
        generic_terms.dedup();
        for t in &generic_terms {
            if !matches!(t.season(), Some(Season::Spring) | Some(Season::Fall)) {
                return Err(Error::InvalidFormat(format!(
                    "generic terms only use Spring and Fall: {t}"
                )));
            }
        }

        let mut absolute = self.start;
        let mut mapping: BTreeMap<Term, Term> = BTreeMap::new();
        for generic in generic_terms {
            mapping.insert(generic, absolute);
            absolute = absolute.successor(SKIP_SUMMER);
        }
        for term in self.generic.terms.values_mut() {
            if let Some(abs) = mapping.get(term) {
                *term = *abs;
            }
        }
        Ok(())
    }

    pub fn start(&self) -> Term {
        self.start
    }

    pub fn current_term(&self) -> Term {
        self.current_term
    }

    /// Move the "now" marker used by the repair procedures.
    pub fn set_current_term(&mut self, term: Term) {
        self.current_term = term;
    }

    pub fn dta(&self) -> Option<DtaKind> {
        self.dta
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn as_generic(&self) -> &GenericPlan {
        &self.generic
    }

    pub(crate) fn generic_mut(&mut self) -> &mut GenericPlan {
        &mut self.generic
    }

    // Delegated queries and overlay mutations.

    pub fn curriculum(&self) -> &Curriculum {
        self.generic.curriculum()
    }

    pub fn term_of(&self, name: &str) -> Option<Term> {
        self.generic.term_of(name)
    }

    pub fn is_completed(&self, name: &str) -> bool {
        self.generic.is_completed(name)
    }

    pub fn set_term(&mut self, name: &str, term: Term) -> Result<()> {
        self.generic.set_term(name, term)
    }

    pub fn mark_completed(&mut self, name: &str) -> Result<()> {
        self.generic.mark_completed(name)
    }

    pub fn set_completed(&mut self, name: &str, completed: bool) -> Result<()> {
        self.generic.set_completed(name, completed)
    }

    pub fn remove_term(&mut self, name: &str) -> Result<()> {
        self.generic.clear_term(name)
    }

    pub fn courses_by_term(&self) -> BTreeMap<Term, Vec<&Course>> {
        self.generic.courses_by_term()
    }

    pub fn check_dependencies(&self) -> BTreeMap<String, DependencyIssues> {
        self.generic.check_dependencies()
    }

    pub fn check_category_requirements(
        &self,
        completed_only: bool,
    ) -> BTreeMap<String, UnmetRequirement> {
        self.generic.check_category_requirements(completed_only)
    }

    pub fn fraction_satisfied(
        &self,
        category: &str,
        kind: RequirementKind,
        completed_only: bool,
    ) -> Option<f64> {
        self.generic.fraction_satisfied(category, kind, completed_only)
    }

    /// Assign a course to a normalized (year, season) term.
    pub fn set_course_term(&mut self, name: &str, year: &str, season: &str) -> Result<()> {
        let term = Term::normalize(year, season)?;
        self.set_term(name, term)
    }

    /// Replace `old` with `new` in the schedule.
    ///
    /// Copies term, completion, and the critical-path flag from `old` to
    /// `new`, then unassigns `old`'s term. `old` stays in the catalog and
    /// keeps its completion flag.
    pub fn substitute(&mut self, old: &str, new: &str) -> Result<()> {
        if !self.curriculum().contains(old) {
            return Err(Error::NotFound(old.to_string()));
        }
        if !self.curriculum().contains(new) {
            return Err(Error::NotFound(new.to_string()));
        }

        let old_term = self.term_of(old);
        let old_completed = self.is_completed(old);
        let old_critical = self.curriculum().course(old).map(|c| c.critical_path).unwrap_or(false);

        match old_term {
            Some(t) => self.set_term(new, t)?,
            None => self.generic.clear_term(new)?,
        }
        self.set_completed(new, old_completed)?;
        if let Some(course) = self.generic.curriculum_mut().course_mut(new) {
            course.critical_path = old_critical;
        }
        self.generic.clear_term(old)
    }

    /// Move the writing-intensive slot from `old` to `new`.
    ///
    /// Both must be writing-intensive W courses. The non-W twin of `old`
    /// (name minus the trailing "W") is re-added at `old`'s former term,
    /// the non-W twin of `new` is dropped from the schedule if placed,
    /// and then `old` is substituted by `new`.
    pub fn switch_writing_intensive(&mut self, old: &str, new: &str) -> Result<()> {
        for name in [old, new] {
            let course = self
                .curriculum()
                .course(name)
                .ok_or_else(|| Error::NotFound(name.to_string()))?;
            if !course.writing_intensive {
                return Err(Error::NotWritingIntensive(name.to_string()));
            }
        }

        let old_twin = old
            .strip_suffix('W')
            .map(str::trim_end)
            .filter(|t| self.curriculum().contains(t))
            .map(str::to_string)
            .ok_or_else(|| Error::TwinNotFound(old.to_string()))?;
        let new_twin = new.strip_suffix('W').map(str::trim_end).map(str::to_string);

        let old_term = self.term_of(old);
        if let Some(t) = old_term {
            self.set_term(&old_twin, t)?;
        } else {
            self.generic.clear_term(&old_twin)?;
        }
        if let Some(twin) = new_twin {
            if self.curriculum().contains(&twin) {
                self.generic.clear_term(&twin)?;
            }
        }
        self.substitute(old, new)
    }

    /// Apply a transfer-degree exemption bundle.
    ///
    /// Every course on the kind's exemption list, along with its "W" twin
    /// when one exists, is marked completed and moved to the Transfer
    /// bucket.
    pub fn set_dta(&mut self, kind: DtaKind) -> Result<()> {
        self.dta = Some(kind);
        let names: Vec<String> = self
            .curriculum()
            .dta_exemptions(kind)
            .iter()
            .flat_map(|name| [name.clone(), format!("{name}W")])
            .filter(|name| self.curriculum().contains(name))
            .collect();
        for name in names {
            self.mark_completed(&name)?;
            self.set_term(&name, Term::Transfer)?;
        }
        Ok(())
    }

    pub fn add_note(&mut self, text: impl Into<String>) {
        self.notes.push(Note::new(text));
    }

    pub fn add_note_at(&mut self, text: impl Into<String>, timestamp: DateTime<Utc>) {
        self.notes.push(Note {
            timestamp,
            text: text.into(),
        });
    }

    /// Register a course discovered outside the catalog (e.g., an
    /// unrecognized transcript row) under the "Other" category.
    ///
    /// Idempotent: an already-known name is left untouched.
    pub fn register_external_course(
        &mut self,
        name: &str,
        credits: f64,
        title: Option<&str>,
    ) -> Result<()> {
        if self.curriculum().contains(name) {
            return Ok(());
        }
        let mut course = Course::new(name, credits, vec!["O".to_string()]);
        course.full_name = title.map(str::to_string);
        self.generic.curriculum_mut().add_course(course)
    }
}
