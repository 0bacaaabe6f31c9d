//! Cursus CLI - curriculum modeling and course-plan scheduling.

use clap::Parser;
use cursus::cli::{CatalogCommands, Cli, Commands, PlanCommands, SystemCommands};
use cursus::commands::{self, Output};
use std::path::PathBuf;
use std::process;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    let result = run_command(cli.command, cli.data_dir, human);

    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!(r#"{{"error": "{}"}}"#, e);
        }
        process::exit(1);
    }
}

fn run_command(
    command: Commands,
    data_dir: Option<PathBuf>,
    human: bool,
) -> Result<(), cursus::Error> {
    let data_dir = data_dir.as_ref();
    match command {
        Commands::System { command } => match command {
            SystemCommands::Init => output(&commands::system_init(data_dir)?, human),
        },

        Commands::Catalog { command } => match command {
            CatalogCommands::Show { file } => output(&commands::catalog_show(&file)?, human),
            CatalogCommands::Check { file } => output(&commands::catalog_check(&file)?, human),
        },

        Commands::Plan { command } => match command {
            PlanCommands::Create {
                student,
                catalog,
                year,
                season,
            } => output(
                &commands::plan_create(data_dir, &student, &catalog, year, &season)?,
                human,
            ),
            PlanCommands::List => output(&commands::plan_list(data_dir)?, human),
            PlanCommands::Show { student } => {
                output(&commands::plan_show(data_dir, &student)?, human)
            }
            PlanCommands::Check { student } => {
                output(&commands::plan_check(data_dir, &student)?, human)
            }
            PlanCommands::Report { student } => {
                output(&commands::plan_report(data_dir, &student)?, human)
            }
            PlanCommands::Move {
                student,
                course,
                year,
                season,
            } => output(
                &commands::plan_move(data_dir, &student, &course, &year, &season)?,
                human,
            ),
            PlanCommands::Complete { student, course } => {
                output(&commands::plan_complete(data_dir, &student, &course)?, human)
            }
            PlanCommands::Drop { student, course } => {
                output(&commands::plan_drop(data_dir, &student, &course)?, human)
            }
            PlanCommands::Substitute {
                student,
                old,
                new,
                writing_intensive,
            } => output(
                &commands::plan_substitute(data_dir, &student, &old, &new, writing_intensive)?,
                human,
            ),
            PlanCommands::Dta { student, kind } => {
                output(&commands::plan_dta(data_dir, &student, &kind)?, human)
            }
            PlanCommands::Note { student, text } => {
                output(&commands::plan_note(data_dir, &student, &text)?, human)
            }
            PlanCommands::Repair {
                student,
                compress,
                only_constrained,
            } => output(
                &commands::plan_repair(data_dir, &student, compress, only_constrained)?,
                human,
            ),
            PlanCommands::SetTerm {
                student,
                year,
                season,
            } => output(
                &commands::plan_set_term(data_dir, &student, &year, &season)?,
                human,
            ),
        },
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
