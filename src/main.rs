use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use voyage_concierge::{
    Config, ConsoleSpeaker, DialogueConfig, FIELDS, Intent, LineRecognizer, Session,
    SessionOutcome, SpeechInput,
};

/// Voyage - voice-driven trip booking concierge
#[derive(Parser)]
#[command(name = "voyage", version, about)]
struct Cli {
    /// Config file (defaults to ~/.config/voyage/config.toml when present)
    #[arg(short, long, env = "VOYAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Replay utterances from a file, one per line, instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Skip the thinking pauses between turns
    #[arg(long, env = "VOYAGE_NO_DELAY")]
    no_delay: bool,

    /// Print every dialogue event as a JSON line after the session
    #[arg(long)]
    events: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List the booking fields in the order they are asked
    Fields,
    /// Show how an idle utterance would be classified
    Classify {
        /// Utterance text
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,voyage_concierge=info",
        1 => "info,voyage_concierge=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        match cmd {
            Command::Fields => list_fields(),
            Command::Classify { text } => println!("{}", Intent::classify(&text)),
        }
        return Ok(());
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if cli.no_delay {
        config.dialogue = DialogueConfig {
            max_attempts: config.dialogue.max_attempts,
            ..DialogueConfig::immediate()
        };
    }
    tracing::debug!(?config, "loaded configuration");

    let speaker = ConsoleSpeaker::stdout(config.voice.clone());
    let outcome = if let Some(path) = &cli.script {
        let file = tokio::fs::File::open(path).await?;
        tracing::info!(path = %path.display(), "replaying script");
        converse(config, LineRecognizer::new(BufReader::new(file)), speaker).await?
    } else {
        converse(config, LineRecognizer::stdin(), speaker).await?
    };

    if cli.events {
        for envelope in &outcome.events {
            println!("{}", serde_json::to_string(envelope)?);
        }
    }

    match &outcome.record {
        Some(record) => println!("{}", serde_json::to_string_pretty(record)?),
        None => tracing::warn!(
            turns = outcome.transcript.len(),
            "session ended without a completed booking"
        ),
    }

    Ok(())
}

async fn converse<I: SpeechInput>(
    config: Config,
    input: I,
    speaker: ConsoleSpeaker<tokio::io::Stdout>,
) -> anyhow::Result<SessionOutcome> {
    let session = Session::new(config, input, speaker);
    tracing::info!(session_id = session.id(), "say something (Ctrl-D to end)");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    Ok(session.run_until(shutdown).await?)
}

fn list_fields() {
    for (i, field) in FIELDS.iter().enumerate() {
        println!("{}. {:<14} {}", i + 1, field.key, field.question);
    }
}
