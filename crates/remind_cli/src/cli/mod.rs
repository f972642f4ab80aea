use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Without a subcommand the interactive add flow starts.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a reminder
    ///
    /// Example: remind add "Meeting" --at 2026-09-01T10:00:00Z --lead 10
    /// Example: remind add "Meeting" --date 2026-09-01 --time 10:00
    Add {
        title: Option<String>,
        /// Due instant as RFC3339
        #[arg(long, conflicts_with_all = ["date", "time"])]
        at: Option<String>,
        /// Due date (YYYY-MM-DD), combined with --time
        #[arg(long, requires = "time")]
        date: Option<String>,
        /// Due time (HH:MM), combined with --date
        #[arg(long, requires = "date")]
        time: Option<String>,
        /// Minutes before the due time to fire the notification
        #[arg(long)]
        lead: Option<String>,
    },
    /// Delete a reminder and cancel its pending notification
    ///
    /// Example: remind delete task-1
    Delete { id: String },
    /// List reminders in the order they were added
    ///
    /// Example: remind list
    List,
    /// Show notifications for reminders whose fire time has been reached
    ///
    /// Example: remind notify
    Notify,
}
