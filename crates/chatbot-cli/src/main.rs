//! chatbot CLI: Terminal client for the sample chatbot backend

use chatbot_engine::{Backend, Config, HttpBackend, Message, MessageId};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "chatbot=info";

/// Chat with the sample chatbot backend
#[derive(Parser)]
#[command(name = "chatbot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend base URL (overrides CHATBOT_BACKEND_URL)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where the TUI writes its log
    #[arg(long, global = true, default_value = "chatbot.log")]
    log_file: PathBuf,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Start a conversation and print its id
    Start,

    /// Send a message and print the conversation
    Send {
        /// Conversation id
        #[arg(long)]
        conversation: String,

        /// Message text
        text: String,
    },

    /// Replace a message and print the conversation
    Edit {
        /// Conversation id
        #[arg(long)]
        conversation: String,

        /// Id of the message to replace
        #[arg(long)]
        message: MessageId,

        /// New message text
        text: String,
    },

    /// Delete a message and print the conversation
    Delete {
        /// Conversation id
        #[arg(long)]
        conversation: String,

        /// Id of the message to delete
        #[arg(long)]
        message: MessageId,
    },
}

fn main() {
    // A missing .env is fine; the environment may already be set.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    if interactive {
        init_file_logging(&cli.log_file)?;
    } else {
        init_stderr_logging();
    }

    let backend = build_backend(cli.backend_url.as_deref(), cli.config.as_deref())?;
    let rt = tokio::runtime::Runtime::new()?;
    let json = cli.json;

    match cli.command {
        None | Some(Commands::Tui) => rt.block_on(chatbot_tui::run_tui(Arc::new(backend))),
        Some(Commands::Start) => {
            let id = rt.block_on(backend.start_conversation())?;
            if json {
                println!("{}", serde_json::json!({ "conversation_id": id }));
            } else {
                println!("{id}");
            }
            Ok(())
        }
        Some(Commands::Send { conversation, text }) => {
            let messages = rt.block_on(backend.send_message(&conversation, &text))?;
            print_messages(&messages, json)
        }
        Some(Commands::Edit {
            conversation,
            message,
            text,
        }) => {
            let messages = rt.block_on(backend.update_message(&conversation, message, &text))?;
            print_messages(&messages, json)
        }
        Some(Commands::Delete {
            conversation,
            message,
        }) => {
            let messages = rt.block_on(backend.delete_message(&conversation, message))?;
            print_messages(&messages, json)
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
}

/// Log to `path`; the TUI owns the terminal.
fn init_file_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)
        .map_err(|e| format!("cannot open log file {}: {e}", path.display()))?;
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Layer the config file, environment and `--backend-url`.
fn build_backend(
    backend_url: Option<&str>,
    config_path: Option<&Path>,
) -> Result<HttpBackend, Box<dyn Error>> {
    let config = resolve_config(backend_url, config_path)?;
    let backend = HttpBackend::from_config(&config)?;
    info!(
        backend_url = backend.base_url(),
        timeout_secs = config.request_timeout_secs,
        "Using backend"
    );
    Ok(backend)
}

fn resolve_config(
    backend_url: Option<&str>,
    config_path: Option<&Path>,
) -> Result<Config, Box<dyn Error>> {
    let mut config = Config::resolve(config_path)?;
    if let Some(url) = backend_url {
        debug!(url, "Backend URL set on the command line");
        config.backend_url = Some(url.to_string());
    }
    Ok(config)
}

fn print_messages(messages: &[Message], json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        let body = serde_json::json!({ "response": messages });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", format_messages(messages));
    }
    Ok(())
}

/// One line per message: `#id sender: text`.
fn format_messages(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "(no messages)\n".to_string();
    }
    messages
        .iter()
        .map(|m| format!("#{} {}: {}\n", m.id, m.sender, m.text))
        .collect()
}
