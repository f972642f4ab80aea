use crate::error::AppError;
use crate::notify::Toaster;
use notify_rust::Notification;

pub struct LinuxToaster;

impl Toaster for LinuxToaster {
    fn show(&self, summary: &str, body: &str) -> Result<(), AppError> {
        Notification::new()
            .summary(summary)
            .body(body)
            .show()
            .map_err(|err| AppError::notification(err.to_string()))?;
        Ok(())
    }
}
