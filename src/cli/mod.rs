//! CLI argument definitions for cursus.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cursus - curriculum modeling and course-plan scheduling.
///
/// Load a catalog with `cur catalog show`, then `cur plan create` to start
/// a student plan.
#[derive(Parser, Debug)]
#[command(name = "cur")]
#[command(author, version, about = "A CLI tool for modeling curricula and scheduling course plans", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Data directory for saved plans.
    /// Can also be set via the CUR_DATA_DIR environment variable.
    #[arg(short = 'D', long = "data-dir", global = true, env = "CUR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Catalog inspection commands
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// Student plan commands
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },

    /// System administration commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

/// Catalog subcommands
#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// Show a catalog: courses, categories, and requirements
    Show {
        /// Path to the catalog TOML file
        file: PathBuf,
    },

    /// Check the catalog's generic layout for dependency violations
    Check {
        /// Path to the catalog TOML file
        file: PathBuf,
    },
}

/// Plan subcommands
#[derive(Subcommand, Debug)]
pub enum PlanCommands {
    /// Create a plan for a student from a catalog
    Create {
        /// Student identifier
        student: String,

        /// Path to the catalog TOML file
        #[arg(short, long)]
        catalog: PathBuf,

        /// First year of attendance (e.g., 2024)
        #[arg(short, long)]
        year: u16,

        /// First season of attendance (Spring or Fall)
        #[arg(short, long, default_value = "Fall")]
        season: String,
    },

    /// List saved plans
    List,

    /// Show a plan's schedule by term
    Show {
        /// Student identifier
        student: String,
    },

    /// Check a plan for dependency violations and unmet requirements
    Check {
        /// Student identifier
        student: String,
    },

    /// Generate the advising text report
    Report {
        /// Student identifier
        student: String,
    },

    /// Move a course to a specific term
    Move {
        /// Student identifier
        student: String,

        /// Course name (e.g., "MTH 171")
        course: String,

        /// Target year (2- or 4-digit), or "Transfer"
        year: String,

        /// Target season (e.g., F, Spring, Su1)
        #[arg(default_value = "Fall")]
        season: String,
    },

    /// Mark a course as completed
    Complete {
        /// Student identifier
        student: String,

        /// Course name
        course: String,
    },

    /// Drop a course from the schedule (it stays in the catalog)
    Drop {
        /// Student identifier
        student: String,

        /// Course name
        course: String,
    },

    /// Substitute one course for another in the schedule
    Substitute {
        /// Student identifier
        student: String,

        /// Course being replaced
        old: String,

        /// Replacement course
        new: String,

        /// Treat the pair as writing-intensive sections and swap their
        /// non-W twins accordingly
        #[arg(short = 'w', long)]
        writing_intensive: bool,
    },

    /// Apply a transfer-degree (DTA) exemption bundle
    Dta {
        /// Student identifier
        student: String,

        /// Degree kind: AA or AS
        kind: String,
    },

    /// Attach a timestamped note to the plan
    Note {
        /// Student identifier
        student: String,

        /// Note text
        text: String,
    },

    /// Run the auto-repair passes over the schedule
    Repair {
        /// Student identifier
        student: String,

        /// Compress the schedule toward the current term first
        #[arg(long)]
        compress: bool,

        /// When compressing, only pull courses that have relationships
        #[arg(long)]
        only_constrained: bool,
    },

    /// Set the plan's current term (the "now" marker used by repair)
    SetTerm {
        /// Student identifier
        student: String,

        /// Year (2- or 4-digit)
        year: String,

        /// Season (Spring or Fall)
        season: String,
    },
}

/// System subcommands
#[derive(Subcommand, Debug)]
pub enum SystemCommands {
    /// Initialize the data directory
    Init,
}
