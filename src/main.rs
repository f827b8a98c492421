mod serve;

use clap::{Parser, Subcommand};
use nudge_channels::OneBotTransport;
use nudge_core::{
    config::{self, Config, LoggingConfig},
    message::InboundEnvelope,
};
use nudge_memory::{format_action_context, Store};
use nudge_poke::{Collaborators, PokeAction, PokeResponder};
use nudge_providers::OpenAiGenerator;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(
    name = "nudge",
    version,
    about = "Nudge — poke responder and proactive poke action for chat agents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Read event envelopes (one JSON object per line) from stdin and answer pokes.
    Serve,
    /// Run the poke responder on a single event.
    Handle {
        /// Raw notification payload (JSON text).
        #[arg(long)]
        raw: Option<String>,
        /// Platform handle of the user who triggered the event.
        #[arg(long)]
        user_id: Option<String>,
        /// Session the event arrived on (e.g. `group:42`).
        #[arg(long)]
        session: String,
        /// Display text attached to the event.
        #[arg(long, default_value = "")]
        text: String,
    },
    /// Poke someone by display name.
    Poke {
        /// Display name of the person to poke.
        name: String,
        /// Session to poke in (e.g. `group:42`).
        #[arg(long)]
        session: String,
    },
    /// Manage known people.
    Person {
        #[command(subcommand)]
        command: PersonCommands,
    },
    /// Show recorded actions for a session.
    History {
        #[arg(long)]
        session: String,
        /// Number of records (defaults to `memory.history_limit`).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the effective configuration and the poke action description.
    Status,
}

#[derive(Subcommand)]
enum PersonCommands {
    /// Register a person, or rename an existing one.
    Add {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        name: String,
    },
    /// List known people.
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _log_guard = init_logging(&cfg.logging)?;

    match cli.command {
        Commands::Serve => {
            cfg.validate()?;
            let store = Store::new(&cfg.memory).await?;
            let responder = PokeResponder::new(
                cfg.bot.clone(),
                cfg.poke.clone(),
                build_collaborators(&cfg, store),
            );
            serve::run(Arc::new(responder)).await?;
        }
        Commands::Handle {
            raw,
            user_id,
            session,
            text,
        } => {
            cfg.validate()?;
            let store = Store::new(&cfg.memory).await?;
            let responder = PokeResponder::new(
                cfg.bot.clone(),
                cfg.poke.clone(),
                build_collaborators(&cfg, store),
            );
            let envelope = InboundEnvelope {
                raw_message: raw,
                user_id,
                plain_text: text,
                stream_id: session,
            };
            let outcome = responder.handle(&envelope).await;
            println!("{}", outcome.message());
            if !outcome.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Poke { name, session } => {
            let store = Store::new(&cfg.memory).await?;
            let action = PokeAction::new(cfg.bot.clone(), build_collaborators(&cfg, store));
            let outcome = action
                .execute(&session, &serde_json::json!({ "name": name }))
                .await;
            println!("{}", outcome.message);
            if !outcome.success {
                std::process::exit(1);
            }
        }
        Commands::Person { command } => {
            let store = Store::new(&cfg.memory).await?;
            match command {
                PersonCommands::Add { user_id, name } => {
                    if name.trim().is_empty() {
                        anyhow::bail!("name must not be empty");
                    }
                    let id = store
                        .register_person(&cfg.bot.platform, &user_id, name.trim())
                        .await?;
                    println!("{name} ({}:{user_id}) → {id}", cfg.bot.platform);
                }
                PersonCommands::List => {
                    let persons = store.list_persons(&cfg.bot.platform).await?;
                    if persons.is_empty() {
                        println!("No people known on {}.", cfg.bot.platform);
                    }
                    for (id, user_id, name) in persons {
                        println!("{id}  {user_id}  {}", name.unwrap_or_default());
                    }
                }
            }
        }
        Commands::History { session, limit } => {
            let store = Store::new(&cfg.memory).await?;
            let limit = limit.unwrap_or(store.history_limit());
            let records = store.recent_actions(&session, limit).await?;
            if records.is_empty() {
                println!("No actions recorded on {session}.");
            } else {
                println!("{}", format_action_context(&records));
            }
        }
        Commands::Status => {
            print_status(&cli.config, &cfg);
        }
    }

    Ok(())
}

/// Install the stderr subscriber, plus a daily log file when `logging.dir` is set.
fn init_logging(logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&logging.level))?;

    let (file_layer, guard) = match logging.dir.as_deref() {
        Some(dir) => {
            let dir = config::shellexpand(dir);
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::daily(dir, "nudge.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Wire the store, transport, and generator into the pipeline's collaborators.
fn build_collaborators(cfg: &Config, store: Store) -> Collaborators {
    let store = Arc::new(store);
    let transport = OneBotTransport::new(&cfg.transport).with_history(store.clone());
    Collaborators {
        resolver: store.clone(),
        generator: Arc::new(OpenAiGenerator::from_config(&cfg.generator)),
        transport: Arc::new(transport),
        history: store,
    }
}

fn print_status(config_path: &str, cfg: &Config) {
    let on_off = |b: bool| if b { "on" } else { "off" };
    println!("Nudge — Status\n");
    println!("Config: {config_path}");
    println!(
        "Bot: {} ({}:{})",
        cfg.bot.nickname,
        cfg.bot.platform,
        if cfg.bot.account.is_empty() {
            "<account not set>"
        } else {
            cfg.bot.account.as_str()
        }
    );
    println!("  poke reply: {}", on_off(cfg.poke.enable_poke_reply));
    println!("  poke back:  {}", on_off(cfg.poke.enable_poke_back));
    println!("  fragment pause: {}ms", cfg.poke.fragment_pause_ms);
    println!("Transport: {}", cfg.transport.base_url);
    println!(
        "Generator: {} ({})",
        cfg.generator.model,
        if cfg.generator.api_key.is_empty() {
            "no api key"
        } else {
            "api key set"
        }
    );
    println!("Memory: {}", config::shellexpand(&cfg.memory.db_path));
    println!();
    print!("{}", PokeAction::info(&cfg.poke).render());
}
