//! Command implementations for the cursus CLI.
//!
//! This module contains the business logic for each CLI command. Commands
//! load state through `Storage`, apply library operations, save, and return
//! a result struct that renders as JSON (default) or human-readable text.

use crate::curriculum::{catalog, Curriculum};
use crate::models::{Course, DependencyIssues, DtaKind, Season, Term};
use crate::plan::{GenericPlan, StudentPlan};
use crate::report::Report;
use crate::storage::Storage;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

fn open_storage(data_dir: Option<&PathBuf>) -> Result<Storage> {
    match data_dir {
        Some(dir) => Storage::open_at(dir.clone()),
        None => Storage::open(),
    }
}

/// Result of commands that only need to confirm what happened.
#[derive(Debug, Serialize)]
pub struct MessageResult {
    pub message: String,
}

impl MessageResult {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Output for MessageResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.message.clone()
    }
}

/// One course line in catalog and plan listings.
#[derive(Debug, Serialize)]
pub struct CourseRow {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub credits: f64,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    pub completed: bool,
}

impl CourseRow {
    fn from_course(course: &Course, term: Option<Term>, completed: bool) -> Self {
        Self {
            name: course.name.clone(),
            full_name: course.full_name.clone(),
            credits: course.credits,
            categories: course.categories.clone(),
            term: term.map(|t| t.to_string()),
            completed,
        }
    }

    fn human_line(&self) -> String {
        let mark = if self.completed { "[x]" } else { "[ ]" };
        let title = match &self.full_name {
            Some(full) => format!("{}: {}", self.name, full),
            None => self.name.clone(),
        };
        format!("{mark} {title} ({})", self.credits)
    }
}

/// Catalog summary for `cur catalog show`.
#[derive(Debug, Serialize)]
pub struct CatalogResult {
    pub name: String,
    pub course_count: usize,
    pub categories: Vec<String>,
    pub courses: Vec<CourseRow>,
}

impl Output for CatalogResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("{} ({} courses)", self.name, self.course_count)];
        for row in &self.courses {
            lines.push(format!(
                "  {} [{}]",
                row.human_line(),
                row.categories.join(", ")
            ));
        }
        lines.join("\n")
    }
}

/// Violations and unmet requirements for `catalog check` / `plan check`.
#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub dependency_issues: BTreeMap<String, DependencyIssues>,
    pub unmet_requirements: BTreeMap<String, String>,
    pub ok: bool,
}

impl CheckResult {
    fn from_plan(plan: &GenericPlan) -> Self {
        let dependency_issues = plan.check_dependencies();
        let unmet_requirements: BTreeMap<String, String> = plan
            .check_category_requirements(false)
            .into_iter()
            .map(|(cat, miss)| (cat, miss.to_string()))
            .collect();
        let ok = dependency_issues.is_empty() && unmet_requirements.is_empty();
        Self {
            dependency_issues,
            unmet_requirements,
            ok,
        }
    }
}

impl Output for CheckResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.ok {
            return "No violations found.".to_string();
        }
        let mut lines = Vec::new();
        for (course, issues) in &self.dependency_issues {
            if !issues.unmet_prereqs.is_empty() {
                lines.push(format!(
                    "{course}: unmet prerequisites: {}",
                    issues.unmet_prereqs.join(", ")
                ));
            }
            if !issues.unmet_coreqs.is_empty() {
                lines.push(format!(
                    "{course}: unmet corequisites: {}",
                    issues.unmet_coreqs.join(", ")
                ));
            }
            if !issues.unmet_coprereqs.is_empty() {
                lines.push(format!(
                    "{course}: unmet co-prerequisites: {}",
                    issues.unmet_coprereqs.join(", ")
                ));
            }
        }
        for (category, miss) in &self.unmet_requirements {
            lines.push(format!("{category}: {miss}"));
        }
        lines.join("\n")
    }
}

/// One term group in `plan show`.
#[derive(Debug, Serialize)]
pub struct TermRow {
    pub term: String,
    pub credits: f64,
    pub courses: Vec<CourseRow>,
}

/// Schedule view for `plan show`.
#[derive(Debug, Serialize)]
pub struct PlanResult {
    pub student: String,
    pub start: String,
    pub current_term: String,
    pub terms: Vec<TermRow>,
    pub unscheduled: Vec<CourseRow>,
}

impl Output for PlanResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Plan for {} (start {}, now {})",
            self.student, self.start, self.current_term
        )];
        for group in &self.terms {
            lines.push(format!("{} ({} credits)", group.term, group.credits));
            for row in &group.courses {
                lines.push(format!("  {}", row.human_line()));
            }
        }
        if !self.unscheduled.is_empty() {
            lines.push("Unscheduled".to_string());
            for row in &self.unscheduled {
                lines.push(format!("  {}", row.human_line()));
            }
        }
        lines.join("\n")
    }
}

/// Saved plan names for `plan list`.
#[derive(Debug, Serialize)]
pub struct PlanListResult {
    pub plans: Vec<String>,
}

impl Output for PlanListResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.plans.is_empty() {
            "No saved plans.".to_string()
        } else {
            self.plans.join("\n")
        }
    }
}

/// Rendered advising report.
#[derive(Debug, Serialize)]
pub struct ReportResult {
    pub student: String,
    pub report: String,
}

impl Output for ReportResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.report.clone()
    }
}

/// Initialize the data directory.
pub fn system_init(data_dir: Option<&PathBuf>) -> Result<MessageResult> {
    let storage = match data_dir {
        Some(dir) => Storage::init_at(dir.clone())?,
        None => Storage::init()?,
    };
    Ok(MessageResult::new(format!(
        "Initialized cursus data directory at {}",
        storage.root.display()
    )))
}

/// Show a catalog file.
pub fn catalog_show(file: &Path) -> Result<CatalogResult> {
    let curriculum = catalog::load(file)?;
    Ok(catalog_result(&curriculum))
}

fn catalog_result(curriculum: &Curriculum) -> CatalogResult {
    let courses = curriculum
        .courses()
        .map(|c| CourseRow::from_course(c, c.generic_term, false))
        .collect();
    CatalogResult {
        name: curriculum.name.clone(),
        course_count: curriculum.len(),
        categories: curriculum.active_categories(),
        courses,
    }
}

/// Check a catalog's generic layout for dependency violations.
pub fn catalog_check(file: &Path) -> Result<CheckResult> {
    let curriculum = catalog::load(file)?;
    Ok(CheckResult::from_plan(&GenericPlan::new(curriculum)))
}

/// Create and save a new student plan.
pub fn plan_create(
    data_dir: Option<&PathBuf>,
    student: &str,
    catalog_path: &Path,
    year: u16,
    season: &str,
) -> Result<MessageResult> {
    let storage = open_storage(data_dir)?;
    if storage.list_plans()?.iter().any(|p| p == student) {
        return Err(Error::Other(format!("plan already exists: {student}")));
    }
    let curriculum = catalog::load(catalog_path)?;
    let season = Season::parse(season)?;
    let plan = StudentPlan::new(curriculum, year, season)?;
    storage.save_plan(student, &plan, catalog_path)?;
    Ok(MessageResult::new(format!(
        "Created plan for {student} starting {}",
        plan.start()
    )))
}

/// List saved plans.
pub fn plan_list(data_dir: Option<&PathBuf>) -> Result<PlanListResult> {
    let storage = open_storage(data_dir)?;
    Ok(PlanListResult {
        plans: storage.list_plans()?,
    })
}

/// Show a student's schedule grouped by term.
pub fn plan_show(data_dir: Option<&PathBuf>, student: &str) -> Result<PlanResult> {
    let storage = open_storage(data_dir)?;
    let plan = storage.load_plan(student)?;

    let terms = plan
        .courses_by_term()
        .into_iter()
        .map(|(term, courses)| TermRow {
            term: term.to_string(),
            credits: plan.as_generic().term_credits(term),
            courses: courses
                .iter()
                .map(|c| CourseRow::from_course(c, Some(term), plan.is_completed(&c.name)))
                .collect(),
        })
        .collect();
    let unscheduled = plan
        .curriculum()
        .courses()
        .filter(|c| plan.term_of(&c.name).is_none())
        .map(|c| CourseRow::from_course(c, None, plan.is_completed(&c.name)))
        .collect();

    Ok(PlanResult {
        student: student.to_string(),
        start: plan.start().to_string(),
        current_term: plan.current_term().to_string(),
        terms,
        unscheduled,
    })
}

/// Check a plan for violations and unmet requirements.
pub fn plan_check(data_dir: Option<&PathBuf>, student: &str) -> Result<CheckResult> {
    let storage = open_storage(data_dir)?;
    let plan = storage.load_plan(student)?;
    Ok(CheckResult::from_plan(plan.as_generic()))
}

/// Generate the advising text report for a plan.
pub fn plan_report(data_dir: Option<&PathBuf>, student: &str) -> Result<ReportResult> {
    let storage = open_storage(data_dir)?;
    let plan = storage.load_plan(student)?;
    let report = Report::new(&plan)
        .with_title(format!("Plan Report: {student}"))
        .generate_text();
    Ok(ReportResult {
        student: student.to_string(),
        report,
    })
}

/// Shared load-mutate-save wrapper for plan mutations.
fn with_plan<F>(data_dir: Option<&PathBuf>, student: &str, mutate: F) -> Result<StudentPlan>
where
    F: FnOnce(&mut StudentPlan) -> Result<()>,
{
    let storage = open_storage(data_dir)?;
    let (mut plan, catalog_path) = storage.load_plan_with_catalog(student)?;
    mutate(&mut plan)?;
    storage.save_plan(student, &plan, &catalog_path)?;
    Ok(plan)
}

/// Move a course to a specific term.
pub fn plan_move(
    data_dir: Option<&PathBuf>,
    student: &str,
    course: &str,
    year: &str,
    season: &str,
) -> Result<MessageResult> {
    let plan = with_plan(data_dir, student, |plan| {
        plan.set_course_term(course, year, season)
    })?;
    let term = plan.term_of(course).map(|t| t.to_string()).unwrap_or_default();
    Ok(MessageResult::new(format!("Moved {course} to {term}")))
}

/// Mark a course completed.
pub fn plan_complete(
    data_dir: Option<&PathBuf>,
    student: &str,
    course: &str,
) -> Result<MessageResult> {
    with_plan(data_dir, student, |plan| plan.mark_completed(course))?;
    Ok(MessageResult::new(format!("Marked {course} completed")))
}

/// Drop a course from the schedule.
pub fn plan_drop(
    data_dir: Option<&PathBuf>,
    student: &str,
    course: &str,
) -> Result<MessageResult> {
    with_plan(data_dir, student, |plan| plan.remove_term(course))?;
    Ok(MessageResult::new(format!(
        "Dropped {course} from the schedule"
    )))
}

/// Substitute one course for another.
pub fn plan_substitute(
    data_dir: Option<&PathBuf>,
    student: &str,
    old: &str,
    new: &str,
    writing_intensive: bool,
) -> Result<MessageResult> {
    with_plan(data_dir, student, |plan| {
        if writing_intensive {
            plan.switch_writing_intensive(old, new)
        } else {
            plan.substitute(old, new)
        }
    })?;
    Ok(MessageResult::new(format!("Substituted {new} for {old}")))
}

/// Apply a transfer-degree exemption bundle.
pub fn plan_dta(data_dir: Option<&PathBuf>, student: &str, kind: &str) -> Result<MessageResult> {
    let kind: DtaKind = kind.parse()?;
    with_plan(data_dir, student, |plan| plan.set_dta(kind))?;
    Ok(MessageResult::new(format!("Applied {kind} exemptions")))
}

/// Attach a note to the plan.
pub fn plan_note(data_dir: Option<&PathBuf>, student: &str, text: &str) -> Result<MessageResult> {
    with_plan(data_dir, student, |plan| {
        plan.add_note(text);
        Ok(())
    })?;
    Ok(MessageResult::new("Note added".to_string()))
}

/// Set the plan's current term.
pub fn plan_set_term(
    data_dir: Option<&PathBuf>,
    student: &str,
    year: &str,
    season: &str,
) -> Result<MessageResult> {
    let term = Term::normalize(year, season)?;
    with_plan(data_dir, student, |plan| {
        plan.set_current_term(term);
        Ok(())
    })?;
    Ok(MessageResult::new(format!("Current term set to {term}")))
}

/// Run the auto-repair passes and report what remains.
pub fn plan_repair(
    data_dir: Option<&PathBuf>,
    student: &str,
    compress: bool,
    only_constrained: bool,
) -> Result<CheckResult> {
    let plan = with_plan(data_dir, student, |plan| {
        plan.move_unfinished_courses_forward()?;
        if compress {
            plan.compress_schedule(only_constrained)?;
        }
        plan.bump_all_to_typical_terms()?;
        plan.enforce_prerequisites()?;
        plan.enforce_coprerequisites()?;
        plan.enforce_corequisites()
    })?;
    Ok(CheckResult::from_plan(plan.as_generic()))
}
