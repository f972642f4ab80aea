use crate::error::AppError;
use crate::model::ReminderRequest;
use crate::notify::Notifier;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const SPOOL_DIR_NAME: &str = "pending";
const SPOOL_ENV_VAR: &str = "REMINDME_SPOOL_DIR";

pub fn spool_dir() -> Result<PathBuf, AppError> {
    if let Ok(dir) = std::env::var(SPOOL_ENV_VAR)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::notification("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("remindme").join(SPOOL_DIR_NAME))
    } else {
        let home =
            std::env::var("HOME").map_err(|_| AppError::notification("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("remindme")
            .join(SPOOL_DIR_NAME))
    }
}

/// Stores pending one-shot reminder requests as one JSON file per task id.
/// Creating the spool directory is the one-time setup that must happen
/// before any request is accepted.
pub struct SpoolNotifier {
    dir: PathBuf,
}

impl SpoolNotifier {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn request_path(&self, task_id: &str) -> PathBuf {
        self.dir.join(format!("{task_id}.json"))
    }

    /// Pending requests whose fire time has been reached, earliest first.
    pub fn due_requests(&self, now: OffsetDateTime) -> Result<Vec<ReminderRequest>, AppError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries =
            std::fs::read_dir(&self.dir).map_err(|err| AppError::notification(err.to_string()))?;

        let mut due = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| AppError::notification(err.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let content = std::fs::read_to_string(&path)
                .map_err(|err| AppError::notification(err.to_string()))?;
            let request: ReminderRequest = serde_json::from_str(&content)
                .map_err(|err| AppError::invalid_data(err.to_string()))?;
            let fire_at = OffsetDateTime::parse(&request.fire_at, &Rfc3339)
                .map_err(|_| AppError::invalid_data("fire_at must be RFC3339"))?;

            if fire_at <= now {
                due.push((fire_at, request));
            }
        }

        due.sort_by_key(|(fire_at, _)| *fire_at);
        Ok(due.into_iter().map(|(_, request)| request).collect())
    }

    pub fn remove(&self, task_id: &str) -> Result<(), AppError> {
        match std::fs::remove_file(self.request_path(task_id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::notification(err.to_string())),
        }
    }
}

impl Notifier for SpoolNotifier {
    fn schedule(&self, request: &ReminderRequest) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.dir).map_err(|err| AppError::notification(err.to_string()))?;

        let content = serde_json::to_string_pretty(request)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        std::fs::write(self.request_path(&request.task_id), content)
            .map_err(|err| AppError::notification(err.to_string()))
    }

    fn cancel(&self, task_id: &str) -> Result<(), AppError> {
        self.remove(task_id)
    }
}
