//! Auto-repair procedures for student plans.
//!
//! Each procedure is a greedy pass over the catalog in iteration order,
//! repeated until a pass makes no move (a fixpoint). Passes are bounded by
//! the schedule's term span plus four slots per course; a plan that still
//! moves courses past that bound is cyclic and the procedure returns
//! `DidNotConverge` instead of spinning.
//!
//! Ground rules shared by every procedure:
//! - completed courses are never moved
//! - unplaced courses are never moved (placement is a user decision)
//! - a dependency without an assigned term cannot be fixed by moving the
//!   dependent course, so it is left for `check_dependencies` to report
//! - courses in the `Transfer` bucket stay there; it has no successor

use crate::models::{Season, Term, SKIP_SUMMER};
use crate::plan::StudentPlan;
use crate::{Error, Result};

/// Absolute slot index of a term, for span arithmetic.
fn term_slot(term: Term) -> Option<usize> {
    match term {
        Term::Transfer => None,
        Term::At { year, season } => {
            let rank = match season {
                Season::Spring => 0,
                Season::Summer => 1,
                Season::Summer1 => 2,
                Season::Summer2 => 3,
                Season::Fall => 4,
            };
            Some(5 * year as usize + rank)
        }
    }
}

impl StudentPlan {
    /// Pass bound for the enforcement loops.
    ///
    /// A pass moves a course at most one term, so an acyclic schedule
    /// settles within the current term span plus a few slots per course.
    /// Only a dependency cycle keeps moving courses past this bound.
    fn repair_cap(&self) -> usize {
        let slots: Vec<usize> = self
            .curriculum()
            .courses()
            .filter_map(|c| self.term_of(&c.name))
            .filter_map(term_slot)
            .collect();
        let span = match (slots.iter().min(), slots.iter().max()) {
            (Some(min), Some(max)) => max - min,
            _ => 0,
        };
        span + 4 * self.curriculum().len().max(1)
    }

    /// Courses eligible for repair moves: incomplete and placed.
    /// Returns (name, term) pairs in catalog iteration order.
    fn movable_courses(&self) -> Vec<(String, Term)> {
        self.curriculum()
            .courses()
            .filter(|c| !self.is_completed(&c.name))
            .filter_map(|c| self.term_of(&c.name).map(|t| (c.name.clone(), t)))
            .collect()
    }

    /// Push courses later until every prerequisite lands in a strictly
    /// earlier term.
    ///
    /// Moves one skip-summer step at a time so a course settles in the
    /// first term that satisfies all of its prerequisites.
    pub fn enforce_prerequisites(&mut self) -> Result<()> {
        for _ in 0..self.repair_cap() {
            let mut moved = false;
            for (name, term) in self.movable_courses() {
                let prereqs = match self.curriculum().course(&name) {
                    Some(c) => c.prereqs.clone(),
                    None => continue,
                };
                let offending = prereqs
                    .iter()
                    .filter_map(|p| self.term_of(p))
                    .any(|pt| pt >= term);
                if offending {
                    let next = term.successor(SKIP_SUMMER);
                    // Transfer is its own successor; leave it in place.
                    if next != term {
                        self.set_term(&name, next)?;
                        moved = true;
                    }
                }
            }
            if !moved {
                return Ok(());
            }
        }
        Err(Error::DidNotConverge("enforce_prerequisites".to_string()))
    }

    /// Move courses onto the same term as their corequisites.
    ///
    /// A course with a corequisite in a different term jumps to the latest
    /// offending corequisite's term.
    pub fn enforce_corequisites(&mut self) -> Result<()> {
        for _ in 0..self.repair_cap() {
            let mut moved = false;
            for (name, term) in self.movable_courses() {
                let coreqs = match self.curriculum().course(&name) {
                    Some(c) => c.coreqs.clone(),
                    None => continue,
                };
                let target = coreqs
                    .iter()
                    .filter_map(|c| self.term_of(c))
                    .filter(|ct| *ct != term)
                    .max();
                if let Some(target) = target {
                    self.set_term(&name, target)?;
                    moved = true;
                }
            }
            if !moved {
                return Ok(());
            }
        }
        Err(Error::DidNotConverge("enforce_corequisites".to_string()))
    }

    /// Move courses later until no co-prerequisite sits in a later term.
    ///
    /// A violating course jumps straight to the latest offending
    /// co-prerequisite's term, which is the earliest term that satisfies
    /// the same-or-earlier rule.
    pub fn enforce_coprerequisites(&mut self) -> Result<()> {
        for _ in 0..self.repair_cap() {
            let mut moved = false;
            for (name, term) in self.movable_courses() {
                let coprereqs = match self.curriculum().course(&name) {
                    Some(c) => c.coprereqs.clone(),
                    None => continue,
                };
                let target = coprereqs
                    .iter()
                    .filter_map(|c| self.term_of(c))
                    .filter(|ct| *ct > term)
                    .max();
                if let Some(target) = target {
                    self.set_term(&name, target)?;
                    moved = true;
                }
            }
            if !moved {
                return Ok(());
            }
        }
        Err(Error::DidNotConverge("enforce_coprerequisites".to_string()))
    }

    /// Pull future courses back toward the present, then restore ordering.
    ///
    /// Incomplete courses placed later than the term immediately after the
    /// current term move back to that slot. With `only_constrained`, only
    /// courses that have at least one relationship are pulled; free-floating
    /// electives keep their slots. The enforcement passes then push courses
    /// back out just far enough to satisfy their relationships.
    pub fn compress_schedule(&mut self, only_constrained: bool) -> Result<()> {
        let floor = self.current_term().successor(SKIP_SUMMER);
        for (name, term) in self.movable_courses() {
            if term <= floor {
                continue;
            }
            if only_constrained {
                let constrained = self
                    .curriculum()
                    .course(&name)
                    .map(|c| c.has_dependencies())
                    .unwrap_or(false);
                if !constrained {
                    continue;
                }
            }
            self.set_term(&name, floor)?;
        }
        self.enforce_prerequisites()?;
        self.enforce_coprerequisites()?;
        self.enforce_corequisites()
    }

    /// Push a course later until it lands in its typical season.
    ///
    /// No-op for completed or unplaced courses and for courses without a
    /// typical-season hint. Steps skip summer, so a summer hint on a
    /// Spring/Fall schedule cannot be honored and reports non-convergence.
    pub fn bump_to_typical_term(&mut self, name: &str) -> Result<()> {
        let course = self
            .curriculum()
            .course(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        let Some(typical) = course.typical_season else {
            return Ok(());
        };
        if self.is_completed(name) {
            return Ok(());
        }
        let Some(mut term) = self.term_of(name) else {
            return Ok(());
        };
        if term == Term::Transfer {
            return Ok(());
        }
        for _ in 0..self.repair_cap() {
            if term.season() == Some(typical) {
                self.set_term(name, term)?;
                return Ok(());
            }
            let next = term.successor(SKIP_SUMMER);
            if next == term {
                break;
            }
            term = next;
        }
        Err(Error::DidNotConverge(format!(
            "bump_to_typical_term({name})"
        )))
    }

    /// Apply `bump_to_typical_term` across the whole catalog.
    pub fn bump_all_to_typical_terms(&mut self) -> Result<()> {
        let names: Vec<String> = self
            .curriculum()
            .courses()
            .filter(|c| c.typical_season.is_some())
            .map(|c| c.name.clone())
            .collect();
        for name in names {
            self.bump_to_typical_term(&name)?;
        }
        Ok(())
    }

    /// Reschedule incomplete courses stranded in the past.
    ///
    /// Courses placed strictly before the current term that are not
    /// completed move to the term immediately after it.
    pub fn move_unfinished_courses_forward(&mut self) -> Result<()> {
        let now = self.current_term();
        let floor = now.successor(SKIP_SUMMER);
        for (name, term) in self.movable_courses() {
            if term < now {
                self.set_term(&name, floor)?;
            }
        }
        Ok(())
    }
}
