use clap::{Parser, Subcommand};
use daytodo::todo::TodoId;

#[derive(Parser, Debug)]
#[command(name = "daytodo")]
#[command(about = "A daily todo list kept per calendar date", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a todo to the end of a day's list
    Add {
        text: String,

        /// Day to act on (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List a day's todos
    Show {
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Flip a todo between open and done
    Toggle {
        id: TodoId,

        #[arg(short, long)]
        date: Option<String>,
    },
    /// Replace a todo's text
    Edit {
        id: TodoId,
        text: String,

        #[arg(short, long)]
        date: Option<String>,
    },
    Delete {
        id: TodoId,

        #[arg(short, long)]
        date: Option<String>,
    },
    /// Move a todo into the position of another one
    Move {
        from: TodoId,
        to: TodoId,

        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show a month with markers on days that have todos
    Calendar {
        /// Month to show (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
}
