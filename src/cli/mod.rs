mod commands;
pub mod error;
pub mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::resolve_db_path;
use crate::db::{Database, Id, SqliteDatabase};
use commands::question::{self, CreateQuestionRequest, UpdateQuestionRequest};
use error::CliResult;

#[derive(Parser)]
#[command(name = "forms-question")]
#[command(author, version, about = "Manage form questions", long_about = None)]
pub struct Cli {
    /// Database file path (default: FORMS_QUESTION_DB or the XDG data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List questions
    List {
        /// Only questions of this step
        #[arg(long)]
        step: Option<Id>,
        /// Only questions of this form
        #[arg(long)]
        form: Option<Id>,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show a single question
    Show {
        /// Question ID
        id: Id,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Create a question
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        code: String,
        #[arg(long)]
        description: Option<String>,
        /// Entry ID the question is bound to
        #[arg(long)]
        entry: Id,
        /// Step ID the question belongs to
        #[arg(long)]
        step: Id,
        #[arg(long)]
        column_title: Option<String>,
        /// Visible in the global multiview
        #[arg(long)]
        global: bool,
        /// Visible in the multiview when its form is selected
        #[arg(long)]
        form_selected: bool,
    },
    /// Update fields of a question
    Update {
        /// Question ID
        id: Id,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        entry: Option<Id>,
        #[arg(long)]
        step: Option<Id>,
        #[arg(long)]
        column_title: Option<String>,
        #[arg(long)]
        global: Option<bool>,
        #[arg(long)]
        form_selected: Option<bool>,
    },
    /// Delete a question
    Delete {
        /// Question ID
        id: Id,
    },
    /// Print all question IDs
    Ids {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Print (id, title) pairs for selection lists
    Refs {
        /// Only questions of this form
        #[arg(long)]
        form: Option<Id>,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

/// Initialize tracing subscriber with env filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forms_question=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn open_database(path: Option<PathBuf>) -> CliResult<SqliteDatabase> {
    let db_path = resolve_db_path(path);
    info!(path = %db_path.display(), "opening database");

    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let db = SqliteDatabase::open(&db_path).await?;
    db.migrate().await?;
    Ok(db)
}

async fn execute(db: &SqliteDatabase, command: Commands) -> CliResult<String> {
    let repo = db.questions();

    match command {
        Commands::List { step, form, format } => {
            let filter = question::parse_filter(step, form)?;
            question::list_questions(&repo, filter, &format).await
        }
        Commands::Show { id, format } => question::get_question(&repo, id, &format).await,
        Commands::Add {
            title,
            code,
            description,
            entry,
            step,
            column_title,
            global,
            form_selected,
        } => {
            let request = CreateQuestionRequest {
                title,
                code,
                description,
                id_entry: entry,
                id_step: step,
                visible_multiview_global: global,
                visible_multiview_form_selected: form_selected,
                column_title,
            };
            question::create_question(&repo, request).await
        }
        Commands::Update {
            id,
            title,
            code,
            description,
            entry,
            step,
            column_title,
            global,
            form_selected,
        } => {
            let request = UpdateQuestionRequest {
                title,
                code,
                description,
                id_entry: entry,
                id_step: step,
                visible_multiview_global: global,
                visible_multiview_form_selected: form_selected,
                column_title,
            };
            question::update_question(&repo, id, request).await
        }
        Commands::Delete { id } => question::delete_question(&repo, id).await,
        Commands::Ids { format } => question::list_question_ids(&repo, &format).await,
        Commands::Refs { form, format } => question::list_references(&repo, form, &format).await,
    }
}

pub async fn run() -> miette::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // Show help when no command provided
        let _ = Cli::parse_from(["forms-question", "--help"]);
        return Ok(());
    };

    init_tracing();

    let db = open_database(cli.db).await?;
    let output = execute(&db, command).await?;
    println!("{}", output);
    Ok(())
}
