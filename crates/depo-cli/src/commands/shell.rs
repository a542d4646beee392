//! Interactive shell over one long-lived session.
//!
//! Each backend intent runs as its own task, so a slow call never blocks the
//! prompt. Snapshot replacements are printed by a watcher task as they land.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::task::JoinHandle;

use depo_application::DependencySession;
use depo_core::project::ProjectPath;

use super::Command;
use crate::render;

const COMMANDS: &[&str] = &[
    "open",
    "init",
    "list",
    "refresh",
    "search",
    "select",
    "confirm",
    "close",
    "add",
    "delete",
    "update",
    "constraint",
    "build",
    "install",
    "error",
    "dismiss",
    "help",
    "quit",
];

#[derive(Parser, Debug)]
#[command(multicall = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
enum ShellCommand {
    /// Open an existing project
    Open { dir: PathBuf },
    /// Re-query the project's dependencies
    Refresh,
    /// Select a candidate from the last search
    Select {
        name: String,
        /// Version constraint overriding the candidate's own
        constraint: Option<String>,
    },
    /// Add the selected candidate
    Confirm,
    /// Close the search and drop the selection
    Close,
    /// Show the last recorded failure
    #[command(name = "error")]
    LastError,
    /// Dismiss the last recorded failure
    Dismiss,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
    #[command(flatten)]
    Intent(Command),
}

/// Shell helper for rustyline: command completion, hints and highlighting.
#[derive(Clone)]
struct ShellHelper;

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(char::is_whitespace) {
            return Ok((0, vec![]));
        }
        let candidates = matching_commands(line)
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let first = line.split_whitespace().next().unwrap_or_default();
        if COMMANDS.contains(&first) && line.starts_with(first) {
            Owned(format!("{}{}", first.bright_cyan(), &line[first.len()..]))
        } else {
            Borrowed(line)
        }
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(char::is_whitespace) {
            return None;
        }
        matching_commands(line)
            .find(|cmd| cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ShellHelper {}

fn matching_commands(prefix: &str) -> impl Iterator<Item = &'static str> + '_ {
    COMMANDS
        .iter()
        .copied()
        .filter(move |cmd| cmd.starts_with(prefix))
}

/// Runs the shell until `quit` or end of input.
pub async fn run(session: Arc<DependencySession>, project: Option<ProjectPath>) -> Result<()> {
    let watcher = spawn_watcher(&session);

    if let Some(project) = project {
        spawn_intent(
            &session,
            ShellCommand::Open {
                dir: project.as_path().to_path_buf(),
            },
        );
    }

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ShellHelper));

    println!("{}", "=== depo shell ===".bright_magenta().bold());
    println!(
        "{}",
        "Type 'help' for commands, 'open <dir>' to pick a project, or 'quit' to exit.".bright_black()
    );
    println!();

    loop {
        match rl.readline("depo> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let command = match parse_line(trimmed) {
                    Ok(command) => command,
                    Err(err) => {
                        let _ = err.print();
                        continue;
                    }
                };

                match command {
                    ShellCommand::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    ShellCommand::Select { name, constraint } => {
                        match session.select_candidate(&name, constraint.as_deref()) {
                            Ok(record) => render::selection(&record),
                            Err(err) => print_error(&anyhow::Error::new(err)),
                        }
                    }
                    ShellCommand::Close => {
                        session.close_search();
                        println!("{}", "Search closed.".bright_black());
                    }
                    ShellCommand::LastError => match session.last_error() {
                        Some(error) => render::session_error(&error),
                        None => println!("{}", "No error recorded.".bright_black()),
                    },
                    ShellCommand::Dismiss => {
                        session.dismiss_error();
                        println!("{}", "Error dismissed.".bright_black());
                    }
                    ShellCommand::Intent(Command::List) => {
                        render::dependencies(&session.dependencies());
                    }
                    command => spawn_intent(&session, command),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    watcher.abort();
    Ok(())
}

fn spawn_watcher(session: &DependencySession) -> JoinHandle<()> {
    let mut updates = session.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let set = updates.borrow_and_update().clone();
            println!("{}", "Dependencies:".bright_magenta());
            render::dependencies(&set);
        }
    })
}

fn spawn_intent(session: &Arc<DependencySession>, command: ShellCommand) {
    let session = Arc::clone(session);
    tokio::spawn(async move {
        if let Err(err) = run_intent(&session, command).await {
            print_error(&err);
        }
    });
}

async fn run_intent(session: &DependencySession, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::Open { dir } => {
            session.select_project(Some(ProjectPath::from(dir))).await?;
            if let Some(project) = session.project().await {
                println!("{}", format!("Opened {}", project).bright_green());
            }
        }
        ShellCommand::Refresh => session.refresh().await?,
        ShellCommand::Confirm => {
            let selected = session.selection();
            session.add_selected().await?;
            if let Some(record) = selected {
                println!("{}", format!("Added {}", record.name).bright_green());
            }
        }
        ShellCommand::Intent(command) => {
            super::dispatch(session, command).await?;
        }
        other => tracing::debug!("[shell] {:?} is handled inline", other),
    }
    Ok(())
}

fn print_error(err: &anyhow::Error) {
    eprintln!("{}", format!("Error: {:#}", err).red());
}

fn parse_line(line: &str) -> Result<ShellCommand, clap::Error> {
    let words = shell_words::split(line).map_err(|err| {
        clap::Error::raw(clap::error::ErrorKind::InvalidValue, format!("{}\n", err))
    })?;
    ShellLine::try_parse_from(words).map(|parsed| parsed.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_and_escaped_arguments() {
        assert_eq!(
            parse_line(r#"select fmt ">=9 <11""#).unwrap(),
            ShellCommand::Select {
                name: "fmt".to_string(),
                constraint: Some(">=9 <11".to_string()),
            }
        );
        assert_eq!(
            parse_line(r"open /tmp/my\ proj").unwrap(),
            ShellCommand::Open {
                dir: PathBuf::from("/tmp/my proj")
            }
        );
    }

    #[test]
    fn test_parse_shell_only_commands() {
        assert_eq!(
            parse_line("select left-pad ^1.0.0").unwrap(),
            ShellCommand::Select {
                name: "left-pad".to_string(),
                constraint: Some("^1.0.0".to_string()),
            }
        );
        assert_eq!(parse_line("confirm").unwrap(), ShellCommand::Confirm);
        assert_eq!(parse_line("exit").unwrap(), ShellCommand::Quit);
        assert_eq!(
            parse_line("open /tmp/proj").unwrap(),
            ShellCommand::Open {
                dir: PathBuf::from("/tmp/proj")
            }
        );
    }

    #[test]
    fn test_parse_shared_commands() {
        assert_eq!(
            parse_line("delete lodash").unwrap(),
            ShellCommand::Intent(Command::Delete {
                name: "lodash".to_string()
            })
        );
        assert_eq!(
            parse_line("constraint fmt --new '^10.0'").unwrap(),
            ShellCommand::Intent(Command::Constraint {
                name: "fmt".to_string(),
                new_constraint: Some("^10.0".to_string()),
                remove: false,
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("frobnicate").is_err());
        assert!(parse_line("delete").is_err());
        assert!(parse_line("search 'left").is_err());
    }

    #[test]
    fn test_matching_commands() {
        assert_eq!(matching_commands("con").collect::<Vec<_>>(), vec!["confirm", "constraint"]);
        assert_eq!(matching_commands("q").collect::<Vec<_>>(), vec!["quit"]);
        assert!(matching_commands("zz").next().is_none());
    }
}
