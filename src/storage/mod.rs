//! Storage layer for cursus data.
//!
//! Student plans are the unit of persistence. Each plan is saved as a JSON
//! snapshot under `plans/<student>.json` in the data directory:
//!
//! - `CUR_DATA_DIR` environment variable, when set
//! - otherwise `~/.local/share/cursus/` (platform equivalent via `dirs`)
//!
//! A snapshot stores the catalog path plus the per-plan overlays (term
//! assignments, completed set, notes, DTA tag). Loading re-parses the
//! catalog and replays the overlays, so catalog edits show up in existing
//! plans on the next load.

use crate::curriculum::{catalog, Curriculum};
use crate::models::{Course, DtaKind, Note, Term};
use crate::plan::StudentPlan;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk form of a student plan.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanSnapshot {
    /// Path of the catalog the plan was created from
    pub catalog: PathBuf,
    /// First term of the student's schedule
    pub start: Term,
    /// The "now" marker used by repair procedures
    pub current_term: Term,
    /// Course name -> assigned term
    pub terms: BTreeMap<String, Term>,
    /// Completed course names
    pub completed: Vec<String>,
    /// Advising notes, oldest first
    #[serde(default)]
    pub notes: Vec<Note>,
    /// Transfer-degree exemption applied, if any
    #[serde(default)]
    pub dta: Option<DtaKind>,
    /// Courses registered outside the catalog (transcript imports)
    #[serde(default)]
    pub external_courses: Vec<Course>,
}

/// Storage manager rooted at a data directory.
pub struct Storage {
    /// Root directory for cursus data
    pub root: PathBuf,
}

impl Storage {
    /// Open existing storage at the resolved data directory.
    pub fn open() -> Result<Self> {
        Self::open_at(get_data_dir()?)
    }

    /// Initialize storage at the resolved data directory.
    pub fn init() -> Result<Self> {
        Self::init_at(get_data_dir()?)
    }

    /// Check whether storage has been initialized.
    pub fn exists() -> Result<bool> {
        Ok(get_data_dir()?.join("plans").is_dir())
    }

    pub fn open_at(root: PathBuf) -> Result<Self> {
        if !root.join("plans").is_dir() {
            return Err(Error::NotInitialized);
        }
        Ok(Self { root })
    }

    pub fn init_at(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(root.join("plans"))?;
        Ok(Self { root })
    }

    fn plan_path(&self, student: &str) -> PathBuf {
        self.root.join("plans").join(format!("{student}.json"))
    }

    /// Persist a plan snapshot for the student.
    ///
    /// Courses not present in the catalog file (live registrations) are
    /// embedded in the snapshot so they survive the round trip.
    pub fn save_plan(
        &self,
        student: &str,
        plan: &StudentPlan,
        catalog_path: &Path,
    ) -> Result<PathBuf> {
        let base = catalog::load(catalog_path)?;
        let external_courses: Vec<Course> = plan
            .curriculum()
            .courses()
            .filter(|c| !base.contains(&c.name))
            .cloned()
            .collect();

        let generic = plan.as_generic();
        let snapshot = PlanSnapshot {
            catalog: catalog_path.to_path_buf(),
            start: plan.start(),
            current_term: plan.current_term(),
            terms: generic.terms.clone(),
            completed: generic.completed.iter().cloned().collect(),
            notes: plan.notes().to_vec(),
            dta: plan.dta(),
            external_courses,
        };

        let path = self.plan_path(student);
        fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
        Ok(path)
    }

    /// Load a student's plan, rebuilding the curriculum from its catalog.
    pub fn load_plan(&self, student: &str) -> Result<StudentPlan> {
        Ok(self.load_plan_with_catalog(student)?.0)
    }

    /// Load a plan along with the catalog path it was created from.
    /// Mutating commands need the path to re-save the snapshot.
    pub fn load_plan_with_catalog(&self, student: &str) -> Result<(StudentPlan, PathBuf)> {
        let path = self.plan_path(student);
        if !path.exists() {
            return Err(Error::NotFound(student.to_string()));
        }
        let snapshot: PlanSnapshot = serde_json::from_str(&fs::read_to_string(&path)?)?;

        let mut curriculum: Curriculum = catalog::load(&snapshot.catalog)?;
        for course in snapshot.external_courses {
            curriculum.add_course(course)?;
        }

        let plan = StudentPlan::from_parts(
            curriculum,
            snapshot.start,
            snapshot.current_term,
            snapshot.terms,
            snapshot.completed,
            snapshot.notes,
            snapshot.dta,
        );
        Ok((plan, snapshot.catalog))
    }

    /// Names of students with a saved plan, sorted.
    pub fn list_plans(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.root.join("plans"))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Resolve the data directory: `CUR_DATA_DIR` overrides the platform
/// default.
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CUR_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("cursus"))
}
