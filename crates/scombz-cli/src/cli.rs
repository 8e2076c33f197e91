use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// ScombZ utilities: timetable scraping, task list and login helpers.
#[derive(Parser)]
#[command(name = "scombz", version, about)]
pub struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Store database, overriding `store.path` from the config.
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Timetable page scraping.
    #[command(subcommand)]
    Timetable(TimetableCommand),

    /// The merged task list.
    #[command(subcommand)]
    Tasks(TasksCommand),

    /// Saved login credentials.
    #[command(subcommand)]
    Login(LoginCommand),

    /// Import or export the whole settings/data blob.
    #[command(subcommand)]
    Store(StoreCommand),

    /// Messages to the extension host.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
pub enum TimetableCommand {
    /// Scrape a saved timetable page and print the records as JSON.
    Scrape {
        /// HTML file of the timetable page.
        html: PathBuf,
        /// Also replace the stored timetable.
        #[arg(long)]
        save: bool,
    },
}

#[derive(Subcommand)]
pub enum TasksCommand {
    /// Print the visible tasks.
    List {
        /// Zero-based page to show.
        #[arg(long, default_value_t = 0)]
        page: usize,
        /// Ignore pagination and print every task.
        #[arg(long)]
        all: bool,
    },
    /// Hide a task by id.
    Hide { id: String },
    /// Switch between relative and absolute deadlines.
    ToggleMode,
    /// Add a task of your own.
    Add(AddTask),
    /// Reprint the list whenever the clock ticks, until Ctrl+C.
    Watch,
}

#[derive(Args)]
pub struct AddTask {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub course: String,
    /// ISO-8601 datetime; a zone-less value is read in the configured offset.
    #[arg(long)]
    pub deadline: String,
    #[arg(long, default_value = "")]
    pub link: String,
}

#[derive(Subcommand)]
pub enum LoginCommand {
    /// Validate and store the student id and password.
    Save { username: String, password: String },
    /// Submit the stored credentials after the configured delay.
    Submit,
}

#[derive(Subcommand)]
pub enum StoreCommand {
    /// Load a `{settings, scombzData}` JSON blob into the store.
    Import { json: PathBuf },
    /// Print the store as a `{settings, scombzData}` JSON blob.
    Export,
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Ask the host to open the settings page.
    Open,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_store_flag_after_subcommand() {
        let cli = Cli::parse_from([
            "scombz", "tasks", "add", "--title", "Report", "--deadline", "2030-01-01T09:00:00",
            "--store", "/tmp/s.db",
        ]);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/s.db")));
        match cli.command {
            Command::Tasks(TasksCommand::Add(add)) => {
                assert_eq!(add.title, "Report");
                assert!(add.course.is_empty());
            }
            _ => panic!("expected tasks add"),
        }
    }

    #[test]
    fn list_defaults_to_first_page() {
        let cli = Cli::parse_from(["scombz", "tasks", "list"]);
        assert!(matches!(
            cli.command,
            Command::Tasks(TasksCommand::List { page: 0, all: false })
        ));
    }
}
