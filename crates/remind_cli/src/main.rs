use clap::Parser;
use clap::error::ErrorKind;
use remind_core::config;
use remind_core::error::AppError;
use remind_core::model::Task;
use remind_core::notify::{self, NoopToaster, Toaster};
use remind_core::scheduler::{self, DueDatePicker};
use remind_core::task_api::{self, AddOutcome, ReminderOutcome};
use std::io::{self, BufRead, Write};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time, UtcOffset};

mod cli;

use cli::{Cli, Command};

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

fn parse_due_date(raw: &str) -> Result<Date, AppError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::invalid_input("date must be YYYY-MM-DD"))
}

fn parse_due_time(raw: &str) -> Result<Time, AppError> {
    Time::parse(raw.trim(), format_description!("[hour]:[minute]"))
        .map_err(|_| AppError::invalid_input("time must be HH:MM"))
}

/// Resolve the due instant from either a full RFC3339 value or the two-step
/// date + time pair, interpreted at the local offset.
fn resolve_due(
    at: Option<String>,
    date: Option<String>,
    time: Option<String>,
) -> Result<String, AppError> {
    if let Some(at) = at {
        let parsed = OffsetDateTime::parse(at.trim(), &Rfc3339)
            .map_err(|_| AppError::invalid_input("--at must be RFC3339"))?;
        return parsed
            .format(&Rfc3339)
            .map_err(|err| AppError::invalid_data(err.to_string()));
    }

    match (date, time) {
        (Some(date), Some(time)) => {
            let merged =
                scheduler::merge_date_and_time(parse_due_date(&date)?, parse_due_time(&time)?)?;
            merged
                .assume_offset(local_offset())
                .format(&Rfc3339)
                .map_err(|err| AppError::invalid_data(err.to_string()))
        }
        _ => Err(AppError::invalid_input(
            "a due time is required (--at, or --date with --time)",
        )),
    }
}

fn resolve_lead(lead: Option<String>) -> String {
    if let Some(lead) = lead {
        return lead;
    }

    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        log::warn!("failed to load config, using defaults: {err}");
    }
    loaded.config.lead_minutes().to_string()
}

fn resolve_toaster() -> Box<dyn Toaster> {
    if std::env::var("REMINDME_DISABLE_NOTIFICATIONS").is_ok() {
        return Box::new(NoopToaster);
    }

    match notify::platform_toaster() {
        Ok(toaster) => toaster,
        Err(err) => {
            eprintln!("WARNING: {}", err.message());
            Box::new(NoopToaster)
        }
    }
}

fn print_add_outcome(json: bool, outcome: &AddOutcome) {
    if json {
        let (scheduled, fire_at) = match &outcome.reminder {
            ReminderOutcome::Scheduled { fire_at } => (true, Some(fire_at.clone())),
            ReminderOutcome::TooLate => (false, None),
        };
        let payload = serde_json::json!({
            "id": outcome.task.id,
            "title": outcome.task.title,
            "dueDate": outcome.task.due_at,
            "reminder": {
                "scheduled": scheduled,
                "fireAt": fire_at,
            },
        });
        println!("{payload}");
        return;
    }

    println!("Added reminder: {} ({})", outcome.task.title, outcome.task.id);
    match &outcome.reminder {
        ReminderOutcome::Scheduled { fire_at } => {
            println!("Notification scheduled for {fire_at}");
        }
        ReminderOutcome::TooLate => {
            println!("Too late to notify: the reminder time has already passed.");
        }
    }
}

fn print_task_json(task: &Task) {
    let payload = serde_json::json!({
        "id": task.id,
        "title": task.title,
        "dueDate": task.due_at,
    });
    println!("{payload}");
}

fn print_tasks_plain(tasks: &[Task]) -> Result<(), AppError> {
    for task in tasks {
        let overdue = if task_api::due_elapsed(task)? {
            " (overdue)"
        } else {
            ""
        };
        println!("{} | {} | {}{}", task.id, task.title, task.due_at, overdue);
    }
    Ok(())
}

fn print_tasks_json(tasks: &[Task]) -> Result<(), AppError> {
    let mut payload = Vec::with_capacity(tasks.len());
    for task in tasks {
        payload.push(serde_json::json!({
            "id": task.id,
            "title": task.title,
            "dueDate": task.due_at,
            "overdue": task_api::due_elapsed(task)?,
        }));
    }
    println!("{}", serde_json::Value::Array(payload));
    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn run_command(command: Command, json: bool) -> Result<(), AppError> {
    match command {
        Command::Add {
            title,
            at,
            date,
            time,
            lead,
        } => {
            let title = match title {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("title is required")),
            };

            let due_at = resolve_due(at, date, time)?;
            let lead = resolve_lead(lead);
            let outcome = task_api::add_reminder(&title, &due_at, &lead)?;
            print_add_outcome(json, &outcome);
        }
        Command::Delete { id } => {
            let task = task_api::delete_reminder(&id)?;
            if json {
                print_task_json(&task);
            } else {
                println!("Deleted reminder: {} ({})", task.title, task.id);
            }
        }
        Command::List => {
            let tasks = task_api::list_reminders()?;
            if json {
                print_tasks_json(&tasks)?;
            } else {
                print_tasks_plain(&tasks)?;
            }
        }
        Command::Notify => {
            let toaster = resolve_toaster();
            let outcome = task_api::deliver_due(toaster.as_ref())?;

            if json {
                let payload = serde_json::json!({
                    "delivered": outcome.delivered,
                    "failures": outcome
                        .failures
                        .iter()
                        .map(|failure| {
                            serde_json::json!({
                                "task_id": failure.task_id,
                                "error": failure.error.code(),
                            })
                        })
                        .collect::<Vec<_>>(),
                });
                println!("{payload}");
            } else {
                if outcome.delivered.is_empty() && outcome.failures.is_empty() {
                    println!("No due reminders.");
                }
                for request in &outcome.delivered {
                    println!("Delivered reminder: {} ({})", request.message, request.task_id);
                }
            }

            for failure in &outcome.failures {
                log::warn!(
                    "failed to show reminder for {}: {}",
                    failure.task_id,
                    failure.error
                );
            }
        }
    }

    Ok(())
}

fn prompt_line(input: &mut impl BufRead, prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout()
        .flush()
        .map_err(|err| AppError::io(err.to_string()))?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|err| AppError::io(err.to_string()))?;
    Ok(line.trim().to_string())
}

/// The single-screen add flow: title, then the two-step date/time picker,
/// then the lead time. An empty answer at a picker step cancels the flow.
fn run_interactive(json: bool) -> Result<(), AppError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let title = prompt_line(&mut input, "Title: ")?;
    if title.is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }

    let mut picker = DueDatePicker::new();
    picker.start();

    let date_raw = prompt_line(&mut input, "Date (YYYY-MM-DD): ")?;
    if date_raw.is_empty() {
        picker.dismiss();
        println!("Cancelled.");
        return Ok(());
    }
    picker.select_date(parse_due_date(&date_raw)?);

    let time_raw = prompt_line(&mut input, "Time (HH:MM): ")?;
    if time_raw.is_empty() {
        picker.dismiss();
        println!("Cancelled.");
        return Ok(());
    }
    let merged = picker
        .select_time(parse_due_time(&time_raw)?)?
        .ok_or_else(|| AppError::invalid_input("a date must be chosen before a time"))?;

    let default_lead = resolve_lead(None);
    let lead_raw = prompt_line(&mut input, &format!("Lead minutes [{default_lead}]: "))?;
    let lead = if lead_raw.is_empty() {
        default_lead
    } else {
        lead_raw
    };

    let due_at = merged
        .assume_offset(local_offset())
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;

    let outcome = task_api::add_reminder(&title, &due_at, &lead)?;
    print_add_outcome(json, &outcome);
    Ok(())
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                print!("{err}");
                return;
            }
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(command) => run_command(command, cli.json),
        None => run_interactive(cli.json),
    };

    if let Err(err) = result {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
