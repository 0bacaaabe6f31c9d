//! The curriculum: an immutable catalog of courses plus category metadata
//! and category requirement rules.
//!
//! Courses are keyed by name in a `BTreeMap`, so "catalog iteration order"
//! (used by grouping views and repair passes) is lexicographic by name and
//! deterministic.

pub mod catalog;

use crate::models::{
    CategoryDef, CategoryRequirement, Course, DtaKind, Requirement, RequirementKind,
};
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Container for a curriculum's courses, category vocabulary, requirements,
/// and DTA exemption lists.
#[derive(Debug, Clone, Default)]
pub struct Curriculum {
    pub name: String,
    courses: BTreeMap<String, Course>,
    categories: Vec<CategoryDef>,
    requirements: Vec<CategoryRequirement>,
    dta_exemptions: BTreeMap<DtaKind, Vec<String>>,
}

impl Curriculum {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Register the category vocabulary. Must be called before courses are
    /// added, since `add_course` validates against it.
    pub fn define_categories(&mut self, defs: Vec<CategoryDef>) {
        self.categories = defs;
    }

    /// Resolve a category code or alias to its canonical code.
    pub fn resolve_category(&self, category: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|def| def.code == category || def.aliases.iter().any(|a| a == category))
            .map(|def| def.code.as_str())
    }

    pub fn categories(&self) -> &[CategoryDef] {
        &self.categories
    }

    /// Sort order for a category code; unknown codes sort last.
    pub fn category_order(&self, code: &str) -> u32 {
        self.categories
            .iter()
            .find(|def| def.code == code)
            .map(|def| def.order)
            .unwrap_or(u32::MAX)
    }

    pub fn category_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.categories
            .iter()
            .find(|def| def.code == code)
            .map(|def| def.name.as_str())
            .unwrap_or(code)
    }

    /// Register a course.
    ///
    /// Categories are normalized to canonical codes. Duplicate names are
    /// rejected rather than silently overwritten.
    pub fn add_course(&mut self, mut course: Course) -> Result<()> {
        if course.categories.is_empty() {
            return Err(Error::InvalidCategory(format!(
                "{} has no categories",
                course.name
            )));
        }
        let mut normalized = Vec::with_capacity(course.categories.len());
        for cat in &course.categories {
            match self.resolve_category(cat) {
                Some(code) => normalized.push(code.to_string()),
                None => {
                    return Err(Error::InvalidCategory(format!(
                        "{} (on course {})",
                        cat, course.name
                    )))
                }
            }
        }
        course.categories = normalized;
        if self.courses.contains_key(&course.name) {
            return Err(Error::DuplicateCourse(course.name));
        }
        self.courses.insert(course.name.clone(), course);
        Ok(())
    }

    pub fn course(&self, name: &str) -> Option<&Course> {
        self.courses.get(name)
    }

    pub fn course_mut(&mut self, name: &str) -> Option<&mut Course> {
        self.courses.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.courses.contains_key(name)
    }

    /// Courses in catalog iteration order.
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Courses tagged with the given category code.
    pub fn tagged_courses<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Course> {
        self.courses
            .values()
            .filter(move |c| c.categories.iter().any(|cat| cat == category))
    }

    /// Attach a requirement to a category.
    pub fn add_requirement(
        &mut self,
        category: &str,
        requirement: Requirement,
        note: Option<String>,
    ) -> Result<()> {
        let code = self
            .resolve_category(category)
            .ok_or_else(|| Error::InvalidCategory(category.to_string()))?
            .to_string();
        self.requirements.push(CategoryRequirement {
            category: code,
            requirement,
            note,
        });
        Ok(())
    }

    pub fn requirements(&self) -> &[CategoryRequirement] {
        &self.requirements
    }

    /// The requirements in force for a category, including the implicit
    /// "complete everything tagged" credit threshold when no explicit
    /// credit requirement was declared.
    ///
    /// Computed on demand, so it is always current with the course list.
    pub fn effective_requirements(&self, category: &str) -> Vec<CategoryRequirement> {
        let mut reqs: Vec<CategoryRequirement> = self
            .requirements
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect();
        let has_credits = reqs
            .iter()
            .any(|r| r.requirement.kind() == RequirementKind::Credits);
        if !has_credits {
            let total: f64 = self.tagged_courses(category).map(|c| c.credits).sum();
            reqs.insert(
                0,
                CategoryRequirement {
                    category: category.to_string(),
                    requirement: Requirement::Credits { min: total },
                    note: Some("all tagged courses".to_string()),
                },
            );
        }
        reqs
    }

    /// Category codes that have tagged courses or declared requirements,
    /// sorted by the vocabulary's sort order.
    pub fn active_categories(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .courses
            .values()
            .flat_map(|c| c.categories.iter().cloned())
            .chain(self.requirements.iter().map(|r| r.category.clone()))
            .collect();
        codes.sort_by_key(|code| (self.category_order(code), code.clone()));
        codes.dedup();
        codes
    }

    pub fn set_dta_exemptions(&mut self, kind: DtaKind, courses: Vec<String>) {
        self.dta_exemptions.insert(kind, courses);
    }

    pub fn dta_exemptions(&self, kind: DtaKind) -> &[String] {
        self.dta_exemptions
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::small_curriculum;

    #[test]
    fn test_category_alias_resolution() {
        let cur = small_curriculum();
        assert_eq!(cur.resolve_category("MS"), Some("MS"));
        assert_eq!(cur.resolve_category("Math and Science"), Some("MS"));
        assert_eq!(cur.resolve_category("Basket Weaving"), None);
    }

    #[test]
    fn test_add_course_normalizes_aliases() {
        let mut cur = small_curriculum();
        cur.add_course(Course::new("MTH 171", 4.0, vec!["Math and Science".into()]))
            .unwrap();
        assert_eq!(cur.course("MTH 171").unwrap().categories, vec!["MS"]);
    }

    #[test]
    fn test_add_course_rejects_unknown_category() {
        let mut cur = small_curriculum();
        let err = cur
            .add_course(Course::new("XX 101", 3.0, vec!["XX".into()]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCategory(_)));
    }

    #[test]
    fn test_add_course_rejects_empty_categories() {
        let mut cur = small_curriculum();
        let err = cur
            .add_course(Course::new("XX 101", 3.0, vec![]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCategory(_)));
    }

    #[test]
    fn test_duplicate_course_rejected() {
        let mut cur = small_curriculum();
        cur.add_course(Course::new("ME 100", 1.0, vec!["ME".into()]))
            .unwrap();
        let err = cur
            .add_course(Course::new("ME 100", 1.0, vec!["ME".into()]))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateCourse(name) if name == "ME 100"));
    }

    #[test]
    fn test_implicit_credit_requirement_tracks_courses() {
        let mut cur = small_curriculum();
        cur.add_course(Course::new("ME 100", 1.0, vec!["ME".into()]))
            .unwrap();
        cur.add_course(Course::new("ME 201", 2.0, vec!["ME".into()]))
            .unwrap();

        let reqs = cur.effective_requirements("ME");
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].requirement, Requirement::Credits { min: 3.0 });

        // Registering another tagged course re-derives the threshold.
        cur.add_course(Course::new("ME 300", 3.0, vec!["ME".into()]))
            .unwrap();
        let reqs = cur.effective_requirements("ME");
        assert_eq!(reqs[0].requirement, Requirement::Credits { min: 6.0 });
    }

    #[test]
    fn test_explicit_credit_requirement_suppresses_implicit() {
        let mut cur = small_curriculum();
        cur.add_course(Course::new("ME 100", 1.0, vec!["ME".into()]))
            .unwrap();
        cur.add_requirement("ME", Requirement::Credits { min: 10.0 }, None)
            .unwrap();

        let reqs = cur.effective_requirements("ME");
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].requirement, Requirement::Credits { min: 10.0 });
    }

    #[test]
    fn test_requirement_on_unknown_category() {
        let mut cur = small_curriculum();
        let err = cur
            .add_requirement("XX", Requirement::Courses { min: 2 }, None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCategory(_)));
    }
}
