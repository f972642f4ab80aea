mod reminder;
mod task;

pub use reminder::ReminderRequest;
pub use task::Task;
