use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use todo_calendar::calendar;
use todo_calendar::config::Config;
use todo_calendar::date_key::{self, DateKey};
use todo_calendar::slot::FileSlot;
use todo_calendar::{PersistenceAdapter, TaskId, TaskStore};

/// Manage to-do tasks grouped by date
#[derive(Debug, Parser)]
#[command(name = "todo")]
struct Cli {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// File the tasks are saved to (overrides the configuration)
    #[arg(long)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a task
    Add {
        /// Day of the task (YYYY-MM-DD), today by default
        #[arg(long)]
        date: Option<String>,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List the tasks of a day
    List {
        #[arg(long)]
        date: Option<String>,
    },
    /// Mark a task as completed, or uncompleted if it was completed
    Toggle {
        #[arg(long)]
        date: Option<String>,
        id: u64,
    },
    /// Delete a task
    Remove {
        #[arg(long)]
        date: Option<String>,
        id: u64,
    },
    /// List every task, day by day
    Dates,
    /// Show which days of a month have tasks
    Month {
        /// YYYY-MM, the month of the selected day by default
        month: Option<String>,
        /// The selected day, today by default
        #[arg(long)]
        date: Option<String>,
    },
}


#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load_or_default(cli.config.as_deref());
    if let Some(data) = cli.data {
        config.data_file = data;
    }
    log::debug!("Using data file {:?}", config.data_file);

    let adapter = PersistenceAdapter::new(FileSlot::new(&config.data_file));
    let (mut store, writer) = adapter.open_store(&config.writer).await;

    let result = apply(&mut store, cli.command);

    writer.shutdown(&mut store).await;
    result
}

fn apply(store: &mut TaskStore, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Add { date, text } => {
            let date = resolve_date(date)?;
            let text = text.join(" ");
            let text = text.trim();
            if text.is_empty() {
                return Err("A task cannot be empty".into());
            }
            let id = store.add_task(&date, text);
            println!("Added task {} to {}", id, date);
        },
        Command::List { date } => {
            let date = resolve_date(date)?;
            todo_calendar::utils::print_tasks_for(&date, store.tasks_for(&date));
        },
        Command::Toggle { date, id } => {
            let date = resolve_date(date)?;
            if store.toggle_task(&date, TaskId::from(id)) == false {
                println!("No task {} on {}", id, date);
            }
            todo_calendar::utils::print_tasks_for(&date, store.tasks_for(&date));
        },
        Command::Remove { date, id } => {
            let date = resolve_date(date)?;
            if store.remove_task(&date, TaskId::from(id)) == false {
                println!("No task {} on {}", id, date);
            }
            todo_calendar::utils::print_tasks_for(&date, store.tasks_for(&date));
        },
        Command::Dates => {
            todo_calendar::utils::print_state(store.state());
        },
        Command::Month { month, date } => {
            let selected = resolve_date(date)?;
            let (year, month) = match month {
                Some(month) => date_key::parse_month(&month)?,
                None => date_key::parse_month(&selected[..7])?,
            };
            let marks = calendar::month_marks(store, year, month, Some(selected.as_str()))?;
            todo_calendar::utils::print_month(&marks);
        },
    }
    Ok(())
}

/// Validate a date given by the user, or use today's date
fn resolve_date(date: Option<String>) -> Result<DateKey, Box<dyn Error>> {
    match date {
        None => Ok(date_key::today()),
        Some(date) => {
            date_key::parse(&date)?;
            Ok(date)
        },
    }
}
