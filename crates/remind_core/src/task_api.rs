use crate::error::AppError;
use crate::model::{ReminderRequest, Task};
use crate::notify::{Notifier, SpoolNotifier, Toaster, notifier_from_env, spool_dir};
use crate::scheduler::{ScheduleDecision, compute_fire_time, decide_schedule};
use crate::storage::json_store;
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// What happened to the reminder side of an add. The task itself is created
/// either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderOutcome {
    Scheduled { fire_at: String },
    TooLate,
}

#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub task: Task,
    pub reminder: ReminderOutcome,
}

#[derive(Debug)]
pub struct DeliveryOutcome {
    pub delivered: Vec<ReminderRequest>,
    pub failures: Vec<NotificationFailure>,
}

#[derive(Debug)]
pub struct NotificationFailure {
    pub task_id: String,
    pub error: AppError,
}

pub fn add_reminder(title: &str, due_at: &str, lead_raw: &str) -> Result<AddOutcome, AppError> {
    let path = json_store::store_path()?;
    let notifier = notifier_from_env()?;
    add_reminder_with_path(&path, notifier.as_ref(), title, due_at, lead_raw)
}

fn add_reminder_with_path(
    path: &Path,
    notifier: &dyn Notifier,
    title: &str,
    due_at: &str,
    lead_raw: &str,
) -> Result<AddOutcome, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }

    let due = OffsetDateTime::parse(due_at.trim(), &Rfc3339)
        .map_err(|_| AppError::invalid_input("due date must be RFC3339"))?;

    // Validation happens up front: a bad lead time means no task is created.
    let fire_at = compute_fire_time(due, lead_raw)?;

    let due_at = due
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    let id = format!("task-{}", OffsetDateTime::now_utc().unix_timestamp_nanos());
    let task = Task {
        id,
        title: trimmed.to_string(),
        due_at,
    };

    let message = format!("{} in {} min", trimmed, lead_raw.trim());
    let decision = decide_schedule(&task.id, &message, fire_at, OffsetDateTime::now_utc())?;

    let mut tasks = json_store::load_state_or_empty(path);
    tasks.push(task.clone());
    json_store::save_state(path, &tasks)?;

    let reminder = match decision {
        ScheduleDecision::Schedule(request) => {
            let fire_at = request.fire_at.clone();
            if let Err(err) = notifier.schedule(&request) {
                log::warn!("failed to schedule reminder for {}: {err}", request.task_id);
            }
            ReminderOutcome::Scheduled { fire_at }
        }
        ScheduleDecision::TooLate => ReminderOutcome::TooLate,
    };

    Ok(AddOutcome { task, reminder })
}

pub fn delete_reminder(id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    let notifier = notifier_from_env()?;
    delete_reminder_with_path(&path, notifier.as_ref(), id)
}

fn delete_reminder_with_path(
    path: &Path,
    notifier: &dyn Notifier,
    id: &str,
) -> Result<Task, AppError> {
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }

    let mut tasks = json_store::load_state_or_empty(path);
    let index = tasks
        .iter()
        .position(|task| task.id == trimmed_id)
        .ok_or_else(|| AppError::invalid_input("task not found"))?;

    let removed = tasks.remove(index);
    json_store::save_state(path, &tasks)?;

    // Best-effort and idempotent: the notification may never have been
    // scheduled, or may already have fired.
    if let Err(err) = notifier.cancel(&removed.id) {
        log::warn!("failed to cancel reminder for {}: {err}", removed.id);
    }

    Ok(removed)
}

pub fn list_reminders() -> Result<Vec<Task>, AppError> {
    let path = json_store::store_path()?;
    Ok(list_reminders_with_path(&path))
}

fn list_reminders_with_path(path: &Path) -> Vec<Task> {
    json_store::load_state_or_empty(path)
}

/// Whether the task's due instant has already passed, in local time.
pub fn due_elapsed(task: &Task) -> Result<bool, AppError> {
    let due = OffsetDateTime::parse(&task.due_at, &Rfc3339)
        .map_err(|_| AppError::invalid_data("dueDate must be RFC3339"))?;
    let local_offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    Ok(due.to_offset(local_offset) < OffsetDateTime::now_utc().to_offset(local_offset))
}

/// Sweep the spool and show every reminder whose fire time has been reached.
/// Each request is one-shot: it is removed from the spool whether or not the
/// display succeeded, and failures are reported but never retried.
pub fn deliver_due(toaster: &dyn Toaster) -> Result<DeliveryOutcome, AppError> {
    let spool = SpoolNotifier::new(spool_dir()?);
    deliver_due_with(&spool, toaster, OffsetDateTime::now_utc())
}

fn deliver_due_with(
    spool: &SpoolNotifier,
    toaster: &dyn Toaster,
    now: OffsetDateTime,
) -> Result<DeliveryOutcome, AppError> {
    let mut delivered = Vec::new();
    let mut failures = Vec::new();

    for request in spool.due_requests(now)? {
        let shown = toaster.show("remindme", &request.message);
        if let Err(err) = spool.remove(&request.task_id) {
            log::warn!("failed to clear delivered reminder {}: {err}", request.task_id);
        }

        match shown {
            Ok(()) => delivered.push(request),
            Err(error) => failures.push(NotificationFailure {
                task_id: request.task_id.clone(),
                error,
            }),
        }
    }

    Ok(DeliveryOutcome {
        delivered,
        failures,
    })
}
