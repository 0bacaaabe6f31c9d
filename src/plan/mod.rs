//! Plans: term assignments layered over a curriculum.
//!
//! `GenericPlan` is the catalog-wide default layout plus the two pure
//! queries shared with student plans: the dependency-violation detector and
//! the category-requirement checker. A plan owns its curriculum; callers
//! clone the catalog when they need independent plans.

pub mod repair;
pub mod student;

pub use student::StudentPlan;

use crate::curriculum::Curriculum;
use crate::models::{
    Course, DependencyIssues, Requirement, RequirementKind, Term, UnmetRequirement,
};
use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};

/// A curriculum plus per-plan overlays: term assignments and completion.
#[derive(Debug, Clone)]
pub struct GenericPlan {
    pub(crate) curriculum: Curriculum,
    pub(crate) terms: BTreeMap<String, Term>,
    pub(crate) completed: BTreeSet<String>,
}

impl GenericPlan {
    /// Wrap a curriculum, seeding term assignments from each course's
    /// generic term.
    pub fn new(curriculum: Curriculum) -> Self {
        let terms = curriculum
            .courses()
            .filter_map(|c| c.generic_term.map(|t| (c.name.clone(), t)))
            .collect();
        Self {
            curriculum,
            terms,
            completed: BTreeSet::new(),
        }
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    pub(crate) fn curriculum_mut(&mut self) -> &mut Curriculum {
        &mut self.curriculum
    }

    pub fn term_of(&self, name: &str) -> Option<Term> {
        self.terms.get(name).copied()
    }

    pub fn is_completed(&self, name: &str) -> bool {
        self.completed.contains(name)
    }

    /// Assign a term directly. No dependency validation; checking is a
    /// separate, explicit step.
    pub fn set_term(&mut self, name: &str, term: Term) -> Result<()> {
        if !self.curriculum.contains(name) {
            return Err(Error::NotFound(name.to_string()));
        }
        self.terms.insert(name.to_string(), term);
        Ok(())
    }

    /// Drop the course from all term-grouped views. It stays in the catalog.
    pub fn clear_term(&mut self, name: &str) -> Result<()> {
        if !self.curriculum.contains(name) {
            return Err(Error::NotFound(name.to_string()));
        }
        self.terms.remove(name);
        Ok(())
    }

    pub fn mark_completed(&mut self, name: &str) -> Result<()> {
        self.set_completed(name, true)
    }

    pub fn set_completed(&mut self, name: &str, completed: bool) -> Result<()> {
        if !self.curriculum.contains(name) {
            return Err(Error::NotFound(name.to_string()));
        }
        if completed {
            self.completed.insert(name.to_string());
        } else {
            self.completed.remove(name);
        }
        Ok(())
    }

    /// Seed placement from a generic term mapping (term label -> courses).
    pub fn apply_term_mapping(&mut self, mapping: &BTreeMap<Term, Vec<String>>) -> Result<()> {
        for (term, names) in mapping {
            for name in names {
                self.set_term(name, *term)?;
            }
        }
        Ok(())
    }

    /// Courses with an assigned term, in catalog iteration order.
    pub fn courses_with_term(&self) -> impl Iterator<Item = &Course> {
        self.curriculum
            .courses()
            .filter(|c| self.terms.contains_key(&c.name))
    }

    /// Placed courses grouped by term. Order within a group is catalog
    /// iteration order.
    pub fn courses_by_term(&self) -> BTreeMap<Term, Vec<&Course>> {
        let mut grouped: BTreeMap<Term, Vec<&Course>> = BTreeMap::new();
        for course in self.courses_with_term() {
            let term = self.terms[&course.name];
            grouped.entry(term).or_default().push(course);
        }
        grouped
    }

    /// Courses grouped by category tag. A course with N categories appears
    /// in N groups.
    pub fn courses_by_category(&self) -> BTreeMap<String, Vec<&Course>> {
        let mut grouped: BTreeMap<String, Vec<&Course>> = BTreeMap::new();
        for course in self.curriculum.courses() {
            for cat in &course.categories {
                grouped.entry(cat.clone()).or_default().push(course);
            }
        }
        grouped
    }

    /// Total credits placed in the given term.
    pub fn term_credits(&self, term: Term) -> f64 {
        self.courses_with_term()
            .filter(|c| self.terms[&c.name] == term)
            .map(|c| c.credits)
            .sum()
    }

    /// The dependency-violation detector.
    ///
    /// Ranks the distinct assigned terms, then checks every course against
    /// its relationship lists: prerequisites must rank strictly earlier,
    /// corequisites exactly equal, co-prerequisites no later. Unassigned
    /// dependencies (including names absent from the catalog) count as
    /// unmet. Courses missing from the result are fully satisfied.
    ///
    /// Pure query; re-run on demand.
    pub fn check_dependencies(&self) -> BTreeMap<String, DependencyIssues> {
        let distinct: BTreeSet<Term> = self.terms.values().copied().collect();
        let rank: BTreeMap<Term, i64> = distinct
            .iter()
            .enumerate()
            .map(|(i, t)| (*t, i as i64))
            .collect();
        let rank_of = |name: &str| -> i64 {
            self.terms.get(name).map(|t| rank[t]).unwrap_or(-1)
        };

        let mut report = BTreeMap::new();
        for course in self.curriculum.courses() {
            let i = rank_of(&course.name);
            let mut issues = DependencyIssues::default();
            for p in &course.prereqs {
                if !self.terms.contains_key(p) || rank_of(p) >= i {
                    issues.unmet_prereqs.push(p.clone());
                }
            }
            for c in &course.coreqs {
                if !self.terms.contains_key(c) || rank_of(c) != i {
                    issues.unmet_coreqs.push(c.clone());
                }
            }
            for c in &course.coprereqs {
                if !self.terms.contains_key(c) || rank_of(c) > i {
                    issues.unmet_coprereqs.push(c.clone());
                }
            }
            if !issues.is_empty() {
                report.insert(course.name.clone(), issues);
            }
        }
        report
    }

    /// How much of a requirement the plan currently has.
    ///
    /// "Planned" counts tagged courses with an assigned term;
    /// `completed_only` counts only completed ones.
    fn requirement_progress(
        &self,
        category: &str,
        requirement: &Requirement,
        completed_only: bool,
    ) -> f64 {
        let counted = self.curriculum.tagged_courses(category).filter(|c| {
            if completed_only {
                self.completed.contains(&c.name)
            } else {
                self.terms.contains_key(&c.name) || self.completed.contains(&c.name)
            }
        });
        match requirement {
            Requirement::Credits { .. } => counted.map(|c| c.credits).sum(),
            Requirement::Courses { .. } => counted.count() as f64,
            Requirement::WritingIntensive { .. } => {
                counted.filter(|c| c.writing_intensive).count() as f64
            }
        }
    }

    /// Check every category requirement (explicit and implicit).
    ///
    /// A category with multiple requirements must satisfy all; the first
    /// unmet one is reported per category.
    pub fn check_category_requirements(
        &self,
        completed_only: bool,
    ) -> BTreeMap<String, UnmetRequirement> {
        let mut report = BTreeMap::new();
        for category in self.curriculum.active_categories() {
            for req in self.curriculum.effective_requirements(&category) {
                let have = self.requirement_progress(&category, &req.requirement, completed_only);
                if have < req.requirement.threshold() {
                    report.insert(
                        category.clone(),
                        UnmetRequirement {
                            category: category.clone(),
                            requirement: req.requirement,
                            have,
                            note: req.note.clone(),
                        },
                    );
                    break;
                }
            }
        }
        report
    }

    /// Fraction of the category's requirement of the given kind satisfied,
    /// or `None` ("unknown") when no requirement of that kind exists.
    pub fn fraction_satisfied(
        &self,
        category: &str,
        kind: RequirementKind,
        completed_only: bool,
    ) -> Option<f64> {
        let req = self
            .curriculum
            .effective_requirements(category)
            .into_iter()
            .find(|r| r.requirement.kind() == kind)?;
        let threshold = req.requirement.threshold();
        if threshold <= 0.0 {
            return Some(1.0);
        }
        let have = self.requirement_progress(category, &req.requirement, completed_only);
        Some((have / threshold).min(1.0))
    }
}
