pub mod shell;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use depo_application::DependencySession;
use depo_core::project::ProjectPath;

use crate::render;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Initialize a new project in DIR and open it
    Init { dir: PathBuf },
    /// List the project's dependencies
    List,
    /// Search the registry for candidates
    Search { query: String },
    /// Search for QUERY and add one candidate
    Add {
        query: String,
        /// Candidate to add (defaults to QUERY)
        #[arg(long)]
        select: Option<String>,
        /// Version constraint overriding the candidate's own
        #[arg(long)]
        constraint: Option<String>,
    },
    /// Remove a dependency
    Delete { name: String },
    /// Update a dependency to the latest version its constraint allows
    Update { name: String },
    /// Set or remove a dependency's version constraint
    Constraint {
        name: String,
        #[arg(long = "new", conflicts_with = "remove", required_unless_present = "remove")]
        new_constraint: Option<String>,
        #[arg(long)]
        remove: bool,
    },
    /// Build all dependencies
    Build,
    /// Install all dependencies
    Install,
    /// Start an interactive session
    Shell,
}

/// Runs a single command against `project` and prints the outcome.
pub async fn run_once(session: &DependencySession, project: ProjectPath, command: Command) -> Result<()> {
    if !matches!(command, Command::Init { .. }) {
        session
            .select_project(Some(project.clone()))
            .await
            .with_context(|| format!("opening {}", project))?;
    }

    if dispatch(session, command).await? {
        render::dependencies(&session.dependencies());
    }
    Ok(())
}

/// Runs one intent against the open project.
///
/// Returns whether the dependency snapshot may have changed.
pub async fn dispatch(session: &DependencySession, command: Command) -> Result<bool> {
    match command {
        Command::Init { dir } => {
            session.init_project(Some(ProjectPath::from(dir))).await?;
            announce("Initialized", session).await;
            Ok(true)
        }
        Command::List => Ok(true),
        Command::Search { query } => {
            session.search(&query).await?;
            render::search_results(&session.search_results());
            Ok(false)
        }
        Command::Add {
            query,
            select,
            constraint,
        } => {
            session.search(&query).await?;
            let name = select.unwrap_or(query);
            let record = session.select_candidate(&name, constraint.as_deref())?;
            render::selection(&record);
            session.add_selected().await?;
            success(&format!("Added {}", record.name));
            Ok(true)
        }
        Command::Delete { name } => {
            session.delete_dependency(&name).await?;
            success(&format!("Deleted {}", name));
            Ok(true)
        }
        Command::Update { name } => {
            session.update_dependency(&name).await?;
            success(&format!("Updated {}", name));
            Ok(true)
        }
        Command::Constraint {
            name,
            new_constraint,
            remove,
        } => {
            match new_constraint {
                Some(constraint) if !remove => {
                    session.set_constraint(&name, &constraint).await?;
                    success(&format!("Constraint of {} set to {}", name, constraint.trim()));
                }
                _ => {
                    session.clear_constraint(&name).await?;
                    success(&format!("Constraint of {} removed", name));
                }
            }
            Ok(true)
        }
        Command::Build => {
            session.build_dependencies().await?;
            success("Build finished");
            Ok(false)
        }
        Command::Install => {
            session.install_dependencies().await?;
            success("Install finished");
            Ok(true)
        }
        Command::Shell => {
            println!("{}", "Already in a shell.".bright_black());
            Ok(false)
        }
    }
}

fn success(message: &str) {
    println!("{}", message.bright_green());
}

async fn announce(verb: &str, session: &DependencySession) {
    if let Some(project) = session.project().await {
        success(&format!("{} {}", verb, project));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        TestCli::try_parse_from(std::iter::once("depo").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn test_add_with_select_and_constraint() {
        let command = parse(&["add", "left", "--select", "left-pad", "--constraint", "^1.0.0"]).unwrap();
        assert_eq!(
            command,
            Command::Add {
                query: "left".to_string(),
                select: Some("left-pad".to_string()),
                constraint: Some("^1.0.0".to_string()),
            }
        );
    }

    #[test]
    fn test_constraint_requires_new_or_remove() {
        assert!(parse(&["constraint", "fmt"]).is_err());
        assert!(parse(&["constraint", "fmt", "--new", "^10", "--remove"]).is_err());

        assert_eq!(
            parse(&["constraint", "fmt", "--new", "^10"]).unwrap(),
            Command::Constraint {
                name: "fmt".to_string(),
                new_constraint: Some("^10".to_string()),
                remove: false,
            }
        );
        assert_eq!(
            parse(&["constraint", "fmt", "--remove"]).unwrap(),
            Command::Constraint {
                name: "fmt".to_string(),
                new_constraint: None,
                remove: true,
            }
        );
    }

    #[test]
    fn test_init_takes_directory() {
        assert_eq!(
            parse(&["init", "/tmp/proj"]).unwrap(),
            Command::Init {
                dir: PathBuf::from("/tmp/proj")
            }
        );
        assert!(parse(&["init"]).is_err());
    }
}
