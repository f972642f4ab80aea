use crate::error::AppError;
use crate::model::ReminderRequest;

mod spool;

pub use spool::{SpoolNotifier, spool_dir};

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxToaster;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsToaster;

/// The notification-service seam: accepts a scheduled one-shot request
/// keyed by task id, and cancels a pending request by that id.
pub trait Notifier {
    fn schedule(&self, request: &ReminderRequest) -> Result<(), AppError>;

    /// Must be idempotent: canceling an unknown or already-fired request is
    /// not an error.
    fn cancel(&self, task_id: &str) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn schedule(&self, _request: &ReminderRequest) -> Result<(), AppError> {
        Ok(())
    }

    fn cancel(&self, _task_id: &str) -> Result<(), AppError> {
        Ok(())
    }
}

/// The device display seam used by the delivery sweep.
pub trait Toaster {
    fn show(&self, summary: &str, body: &str) -> Result<(), AppError>;
}

pub struct NoopToaster;

impl Toaster for NoopToaster {
    fn show(&self, _summary: &str, _body: &str) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn notifier_from_env() -> Result<Box<dyn Notifier>, AppError> {
    if std::env::var("REMINDME_DISABLE_NOTIFICATIONS").is_ok() {
        return Ok(Box::new(NoopNotifier));
    }

    Ok(Box::new(SpoolNotifier::new(spool_dir()?)))
}

#[cfg(target_os = "linux")]
pub fn platform_toaster() -> Result<Box<dyn Toaster>, AppError> {
    Ok(Box::new(LinuxToaster))
}

#[cfg(windows)]
pub fn platform_toaster() -> Result<Box<dyn Toaster>, AppError> {
    Ok(Box::new(WindowsToaster))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_toaster() -> Result<Box<dyn Toaster>, AppError> {
    Err(AppError::notification(
        "notifications are not supported on this platform",
    ))
}
