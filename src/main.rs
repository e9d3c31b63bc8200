use anyhow::Result;
use clap::{Parser, Subcommand};
use snap_vocab::app::App;
use snap_vocab::models::{Level, SaveOutcome};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "snap-vocab")]
#[command(about = "Learn English vocabulary from photos")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Suggest three words (beginner/intermediate/advanced) for a photo.
    Extract {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },
    /// Predict likely replies to a conversation starter.
    Predict { starter: String },
    /// Rewrite a sentence so it sounds natural.
    Correct { text: String },
    /// Manage saved words.
    #[command(subcommand)]
    Words(WordsCommand),
}

#[derive(Debug, Subcommand)]
enum WordsCommand {
    List,
    Save {
        word: String,
        #[arg(value_parser = parse_level_arg)]
        level: Level,
        sentence: String,
    },
    Remove { id: String },
    Exists { word: String },
}

fn parse_level_arg(input: &str) -> std::result::Result<Level, String> {
    input.parse().map_err(|e: snap_vocab::Error| e.to_string())
}

async fn run(app: &App, command: Command) -> snap_vocab::Result<()> {
    match command {
        Command::Extract { image } => {
            for s in app.extract_from_file(&image).await? {
                println!("[{}] {} - {}", s.level, s.word, s.sentence);
                for starter in &s.conversation_starters {
                    println!("    > {}", starter);
                }
            }
        }
        Command::Predict { starter } => {
            for flow in app.predict(&starter).await? {
                println!("They: {}", flow.their_response);
                println!("You:  {}", flow.your_follow_up);
                println!();
            }
        }
        Command::Correct { text } => match app.correct(&text).await? {
            Some(fix) => {
                println!("Original:  {}", fix.original);
                println!("Corrected: {}", fix.corrected);
                println!("{}", fix.explanation);
            }
            None => println!("Nothing to correct."),
        },
        Command::Words(words) => match words {
            WordsCommand::List => {
                for w in app.words().list().await {
                    println!(
                        "{}  [{}] {} - {} ({})",
                        w.id,
                        w.level,
                        w.word,
                        w.sentence,
                        w.saved_at.to_rfc3339()
                    );
                }
            }
            WordsCommand::Save {
                word,
                level,
                sentence,
            } => match app.words().save(&word, level, &sentence).await? {
                SaveOutcome::Saved(w) => println!("Saved '{}' ({})", w.word, w.id),
                SaveOutcome::AlreadySaved(w) => println!("'{}' is already saved", w.word),
            },
            WordsCommand::Remove { id } => {
                app.words().remove(&id).await?;
                println!("Removed {}", id);
            }
            WordsCommand::Exists { word } => {
                println!("{}", app.words().exists(&word).await);
            }
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snap_vocab=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&app, args.command).await {
        error!("Command failed ({:?}): {}", e.kind(), e);
        eprintln!("Something went wrong. Please try again.");
        std::process::exit(1);
    }

    Ok(())
}
