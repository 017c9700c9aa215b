//! Terminal form driver, standing in for the single-page form.
//!
//! Each command edits one widget's value and immediately re-runs the full
//! intake cycle, the same way every widget interaction re-runs the page.
//! `generate` is the explicit user action that triggers validation.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::errors::AppError;
use crate::intake::engine::{IntakeEngine, Outcome};
use crate::intake::models::FormSnapshot;
use crate::intake::validation::EDUCATION_LEVELS;

/// One parsed driver command.
#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    SetJd(String),
    SetEducation(String),
    SetExperience(i64),
    SetSkills(String),
    SetArea(String),
    SetTemperature(f64),
    Generate,
    Show,
    Session,
    Help,
    Quit,
}

/// Parses one input line into a command. Pure; the returned error is a
/// user-facing message.
pub fn parse_command(line: &str) -> Result<FormCommand, String> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "jd" => Ok(FormCommand::SetJd(rest.to_string())),
        "education" => Ok(FormCommand::SetEducation(rest.to_string())),
        "experience" => rest
            .parse::<i64>()
            .map(FormCommand::SetExperience)
            .map_err(|_| format!("experience must be an integer, got '{rest}'")),
        "skills" => Ok(FormCommand::SetSkills(rest.to_string())),
        "area" => Ok(FormCommand::SetArea(rest.to_string())),
        "temp" => rest
            .parse::<f64>()
            .map(FormCommand::SetTemperature)
            .map_err(|_| format!("temp must be a number, got '{rest}'")),
        "generate" => Ok(FormCommand::Generate),
        "show" => Ok(FormCommand::Show),
        "session" => Ok(FormCommand::Session),
        "help" => Ok(FormCommand::Help),
        "quit" | "exit" => Ok(FormCommand::Quit),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

/// The interactive form: current widget values plus the engine that owns the
/// session.
pub struct FormApp {
    engine: IntakeEngine,
    form: FormSnapshot,
}

impl FormApp {
    pub fn new() -> Self {
        FormApp {
            engine: IntakeEngine::new(),
            form: FormSnapshot::default(),
        }
    }

    /// Runs the prompt loop until quit or EOF.
    pub fn run(&mut self) -> Result<(), AppError> {
        self.print_welcome();

        let mut rl = DefaultEditor::new()
            .map_err(|e| anyhow::anyhow!("failed to initialize readline: {e}"))?;

        loop {
            match rl.readline(&format!("{} ", ">".green())) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    let command = match parse_command(input) {
                        Ok(command) => command,
                        Err(message) => {
                            println!("{}", message.yellow());
                            continue;
                        }
                    };
                    if command == FormCommand::Quit {
                        break;
                    }
                    if let Err(err) = self.apply(command) {
                        match err {
                            // The explicit validation action is the one place
                            // a validation error surfaces; render and carry on.
                            AppError::Validation(err) => {
                                println!("{}", "Input validation failed.".red());
                                for violation in &err.violations {
                                    println!("  {} {violation}", "-".red());
                                }
                                let report = serde_json::to_string_pretty(&err.violations)
                                    .unwrap_or_default();
                                println!("{report}");
                            }
                            other => return Err(other),
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    return Err(AppError::Internal(anyhow::anyhow!("readline error: {err}")))
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Applies one command, running a full cycle for every widget edit.
    fn apply(&mut self, command: FormCommand) -> Result<(), AppError> {
        match command {
            FormCommand::SetJd(value) => self.form.existing_jd = value,
            FormCommand::SetEducation(value) => self.form.education = value,
            FormCommand::SetExperience(value) => self.form.experience = value,
            FormCommand::SetSkills(value) => self.form.skills = value,
            FormCommand::SetArea(value) => self.form.functional_area = value,
            FormCommand::SetTemperature(value) => self.form.temperature = value,
            FormCommand::Generate => {
                self.form.generate = true;
                let report = self.engine.run_cycle(&self.form);
                self.form.generate = false;
                return match report.outcome {
                    Outcome::Validated(_) => {
                        println!("{}", "Inputs validated.".green());
                        Ok(())
                    }
                    Outcome::Rejected(err) => Err(AppError::Validation(err)),
                    Outcome::NoAction => Ok(()),
                };
            }
            FormCommand::Show => {
                self.print_form();
                return Ok(());
            }
            FormCommand::Session => {
                let dump = serde_json::to_string_pretty(&self.engine.session_dump())
                    .unwrap_or_default();
                println!("{dump}");
                return Ok(());
            }
            FormCommand::Help => {
                self.print_help();
                return Ok(());
            }
            FormCommand::Quit => return Ok(()),
        }

        // A widget edit: re-run the cycle without the generate action.
        let report = self.engine.run_cycle(&self.form);
        if report.reset_occurred {
            println!(
                "{}",
                format!(
                    "inputs changed, session reset (new id {})",
                    self.engine.session().session_id
                )
                .dimmed()
            );
        }
        println!("{}", format!("mode: {}", report.mode.as_str()).dimmed());
        Ok(())
    }

    fn print_welcome(&self) {
        println!("{}", "JD Generator (intake phase)".bold());
        println!(
            "{}",
            format!("Session ID: {}", self.engine.session().session_id).dimmed()
        );
        println!("Type 'help' for commands.");
    }

    fn print_form(&self) {
        let pasted = if self.form.existing_jd.trim().is_empty() {
            "(empty)".to_string()
        } else {
            self.form.existing_jd.clone()
        };
        println!("{} {pasted}", "existing jd:".bold());
        println!("{} {}", "education:".bold(), self.form.education);
        println!("{} {}", "experience:".bold(), self.form.experience);
        println!("{} {}", "skills:".bold(), self.form.skills);
        println!("{} {}", "functional area:".bold(), self.form.functional_area);
        println!("{} {}", "temperature:".bold(), self.form.temperature);
    }

    fn print_help(&self) {
        println!("  jd <text>          paste an existing JD (empty to clear)");
        println!(
            "  education <level>  one of: {}",
            EDUCATION_LEVELS.join(", ")
        );
        println!("  experience <n>     years of experience (0-30)");
        println!("  skills <list>      comma separated skills");
        println!("  area <text>        functional area");
        println!("  temp <t>           generation temperature (0.0-1.0)");
        println!("  generate           validate the current inputs");
        println!("  show               print the current form values");
        println!("  session            dump the session record as JSON");
        println!("  quit               exit");
    }
}

impl Default for FormApp {
    fn default() -> Self {
        FormApp::new()
    }
}
