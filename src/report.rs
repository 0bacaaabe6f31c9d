//! Plan reports.
//!
//! A report is a read-only view over a student plan: the plan's notes
//! followed by the courses grouped into a category hierarchy. A course
//! tagged with N categories nests N levels deep, under each tag in order,
//! so broad tags act as sections and narrow tags as subsections.

use crate::models::{Course, RequirementKind};
use crate::plan::StudentPlan;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Text report generator for a student plan.
pub struct Report<'a> {
    plan: &'a StudentPlan,
    title: String,
    include_categories: Option<Vec<String>>,
}

#[derive(Default)]
struct Node<'a> {
    courses: Vec<&'a Course>,
    children: BTreeMap<String, Node<'a>>,
}

impl<'a> Node<'a> {
    fn all_completed(&self, plan: &StudentPlan) -> bool {
        self.courses.iter().all(|c| plan.is_completed(&c.name))
            && self.children.values().all(|n| n.all_completed(plan))
    }
}

impl<'a> Report<'a> {
    pub fn new(plan: &'a StudentPlan) -> Self {
        Self {
            plan,
            title: "Plan Report".to_string(),
            include_categories: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Restrict the report to courses tagged with any of these categories.
    pub fn include_categories(mut self, categories: Vec<String>) -> Self {
        self.include_categories = Some(categories);
        self
    }

    fn hierarchy(&self) -> Node<'a> {
        let mut root = Node::default();
        for course in self.plan.curriculum().courses() {
            if let Some(filter) = &self.include_categories {
                if !course.categories.iter().any(|c| filter.contains(c)) {
                    continue;
                }
            }
            let mut node = &mut root;
            for cat in &course.categories {
                node = node.children.entry(cat.clone()).or_default();
            }
            node.courses.push(course);
        }
        root
    }

    /// Status suffix for a category heading.
    ///
    /// Satisfied categories show "(Complete)" once every nested course is
    /// done, otherwise planned/completed credit percentages. Unsatisfied
    /// ones show the first unmet requirement.
    fn status_text(&self, category: &str, node: &Node<'a>) -> String {
        let unmet = self.plan.check_category_requirements(false);
        if let Some(miss) = unmet.get(category) {
            return format!(" (not satisfied: {miss})");
        }
        if node.all_completed(self.plan) {
            return " (Complete)".to_string();
        }
        let planned =
            self.plan
                .fraction_satisfied(category, RequirementKind::Credits, false);
        let completed =
            self.plan
                .fraction_satisfied(category, RequirementKind::Credits, true);
        match (planned, completed) {
            (None, None) => String::new(),
            (Some(p), None) => format!(" (Planned: {:.0}%)", p * 100.0),
            (None, Some(c)) => format!(" (Completed: {:.0}%)", c * 100.0),
            (Some(p), Some(c)) => {
                format!(" (Planned: {:.0}%, Completed: {:.0}%)", p * 100.0, c * 100.0)
            }
        }
    }

    fn render_node(&self, node: &Node<'a>, level: usize, out: &mut String) {
        let indent = "  ".repeat(level);
        for course in &node.courses {
            let title = match &course.full_name {
                Some(full) => format!("{}: {}", course.name, full),
                None => course.name.clone(),
            };
            let mark = if self.plan.is_completed(&course.name) {
                " [x]"
            } else {
                ""
            };
            let _ = writeln!(out, "{indent}-{mark} {title} ({})", course.credits);
        }

        let mut children: Vec<(&String, &Node<'a>)> = node.children.iter().collect();
        children.sort_by_key(|(code, _)| {
            (
                self.plan.curriculum().category_order(code.as_str()),
                code.to_string(),
            )
        });
        for (code, child) in children {
            let name = self.plan.curriculum().category_name(code);
            let status = self.status_text(code, child);
            let _ = writeln!(out, "{indent}{name}{status}:");
            self.render_node(child, level + 1, out);
        }
    }

    /// Render the full text report.
    pub fn generate_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", "=".repeat(self.title.len()));
        let _ = writeln!(out);
        let _ = writeln!(out, "1. Notes");
        for note in self.plan.notes() {
            let _ = writeln!(
                out,
                "- {}: {}",
                note.timestamp.format("%Y-%m-%d"),
                note.text
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "2. Courses by Category");
        self.render_node(&self.hierarchy(), 0, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Season, Term};
    use crate::test_utils::small_curriculum;
    use crate::plan::StudentPlan;

    fn sample_plan() -> StudentPlan {
        let mut cur = small_curriculum();
        let mut calc = Course::new("MTH 171", 4.0, vec!["MS".into()]);
        calc.full_name = Some("Calculus I".into());
        cur.add_course(calc).unwrap();
        cur.add_course(Course::new("ME 201", 2.0, vec!["ME".into()]))
            .unwrap();
        // Nested two deep: general engineering, then mechanical.
        cur.add_course(Course::new("ME 303", 3.0, vec!["GE".into(), "ME".into()]))
            .unwrap();
        StudentPlan::new(cur, 2024, Season::Fall).unwrap()
    }

    #[test]
    fn test_report_nests_by_category_path() {
        let plan = sample_plan();
        let text = Report::new(&plan).generate_text();

        assert!(text.starts_with("Plan Report\n==========="));
        assert!(text.contains("- MTH 171: Calculus I (4)"));
        // ME 303 sits under GE, one level deeper than the GE heading.
        let ge_pos = text.find("General Engineering").unwrap();
        let me303_pos = text.find("ME 303").unwrap();
        assert!(me303_pos > ge_pos);
        assert!(text.contains("  Mechanical Engineering"));
    }

    #[test]
    fn test_report_marks_completed_and_status() {
        let mut plan = sample_plan();
        plan.set_term("MTH 171", Term::at(2024, Season::Fall)).unwrap();
        plan.mark_completed("MTH 171").unwrap();

        let text = Report::new(&plan).generate_text();
        assert!(text.contains("- [x] MTH 171"));
        // Every MS course is done, so the category is complete.
        assert!(text.contains("Math and Science (Complete):"));
        // ME courses are neither placed nor completed.
        assert!(text.contains("not satisfied"));
    }

    #[test]
    fn test_report_partial_progress_percentages() {
        let mut plan = sample_plan();
        let fall = Term::at(2024, Season::Fall);
        for name in ["ME 201", "ME 303"] {
            plan.set_term(name, fall).unwrap();
        }
        plan.mark_completed("ME 201").unwrap();

        let text = Report::new(&plan).generate_text();
        assert!(text.contains("Planned: 100%, Completed: 40%"));
    }

    #[test]
    fn test_report_notes_and_filter() {
        let mut plan = sample_plan();
        plan.add_note("switch to spring start?");

        let text = Report::new(&plan)
            .with_title("Advising Notes")
            .include_categories(vec!["MS".into()])
            .generate_text();
        assert!(text.contains("switch to spring start?"));
        assert!(text.contains("MTH 171"));
        assert!(!text.contains("ME 201"));
    }
}
