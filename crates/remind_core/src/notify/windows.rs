use crate::error::AppError;
use crate::notify::Toaster;
use tauri_winrt_notification::Toast;

pub struct WindowsToaster;

impl Toaster for WindowsToaster {
    fn show(&self, summary: &str, body: &str) -> Result<(), AppError> {
        Toast::new(Toast::POWERSHELL_APP_ID)
            .title(summary)
            .text1(body)
            .show()
            .map_err(|err| AppError::notification(err.to_string()))
    }
}
