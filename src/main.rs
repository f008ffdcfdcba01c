use chrono::Utc;
use clap::{Parser, Subcommand};
use std::io;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use honoka::models::JsonOutput;
use honoka::{config, list_due, review_next, Database, Review};

#[derive(Parser)]
#[command(name = "honoka")]
#[command(about = "A minimal spaced-repetition flashcard CLI")]
#[command(long_about = "Stores front/back flashcards and shows at most one due card per run.\n\
    Run without a command to review the next due card: press Enter to reveal\n\
    the back, then answer Y (or just Enter) if you recalled it.")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new card
    Add {
        /// Prompt shown during review, must be unique
        front: String,

        /// Answer revealed after the prompt
        back: String,
    },

    /// List the fronts of all cards due for review
    List,

    /// Remove a card by its front
    Remove {
        /// Front of the card to remove
        front: String,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help and version go to stdout and are not failures.
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    init_logging(cli.verbose);

    let json = cli.json;
    if let Err(e) = run(cli) {
        if json {
            if let Ok(out) = serde_json::to_string(&JsonOutput::<()>::err(e.to_string())) {
                println!("{}", out);
            }
        }
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "honoka=debug" } else { "honoka=warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let db_path = config::db_path()?;
    let db = Database::open(&db_path)?;
    db.init()?;

    match cli.command {
        None => {
            let stdin = io::stdin();
            match review_next(&db, stdin.lock(), io::stdout(), Utc::now())? {
                Review::NothingDue => debug!("no card due"),
                Review::Reviewed {
                    front,
                    outcome,
                    interval_index,
                } => debug!(%front, outcome = outcome.as_str(), %interval_index, "reviewed"),
            }
        }

        Some(Commands::Add { front, back }) => {
            db.insert_card(&front, &back)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({ "front": front })))?
                );
            }
        }

        Some(Commands::List) => {
            let fronts = list_due(&db, Utc::now())?;
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&fronts))?);
            } else {
                for front in fronts {
                    println!("{}", front);
                }
            }
        }

        Some(Commands::Remove { front }) => {
            let removed = db.delete_card(&front)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "front": front,
                        "removed": removed > 0
                    })))?
                );
            }
        }
    }

    db.close()?;
    Ok(())
}
