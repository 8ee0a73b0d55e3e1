// SpaceTraders graph proxy - command line entry point

use clap::{ArgAction, Parser, Subcommand};
use serde_json::json;
use std::process;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use spacetraders_graph::operations::ConfigureArgs;
use spacetraders_graph::{
    execute_str, load_agent_token, parse_references, verbosity, CacheKind, Credential, Proxy, ProxyConfig, Result,
    Session, DEFAULT_CONFIG_FILE,
};

#[derive(Parser)]
#[command(name = "spacetraders-graph", version, about = "Graph-shaped proxy over the SpaceTraders API")]
struct Cli {
    /// Increase log output (-v basic, -vv full request trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file, created with defaults when missing
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Session state file (overrides the configured path)
    #[arg(long, global = true)]
    state: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store an agent token, or register a new agent
    Configure {
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        callsign: Option<String>,
        #[arg(long)]
        faction: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Run a selection document, e.g. '{ agent { symbol credits } }'
    Query {
        document: String,
        /// Stay running until every arrival scheduled by the document has fired
        #[arg(long)]
        wait_arrival: bool,
    },
    /// Parse free text into system / waypoint references
    Lookup { text: String },
    /// Inspect or reset the market and jump-gate cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    Show,
    Clear,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = verbosity::init(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("❌ {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ProxyConfig::load_or_create(&cli.config)?;
    config.validate()?;

    let state_path = cli.state.unwrap_or_else(|| config.state.path.clone());
    let session = if config.state.persist {
        Session::load_or_default(&state_path)
    } else {
        Session::new()
    };
    if session.credential().is_none() {
        if let Some(token) = load_agent_token(&config.api.token_file)? {
            info!("Using agent token from {}", config.api.token_file);
            session.set_credential(Credential::token(token));
        }
    }
    let session = Arc::new(session);
    let proxy = Proxy::connect(&config, Arc::clone(&session))?;

    let outcome = dispatch(cli.command, &proxy, &session).await;
    if config.state.persist {
        return session.save_after(&state_path, outcome);
    }
    outcome
}

async fn dispatch(command: Commands, proxy: &Proxy, session: &Session) -> Result<()> {
    match command {
        Commands::Configure {
            token,
            callsign,
            faction,
            email,
        } => {
            let args = ConfigureArgs {
                token,
                callsign,
                faction,
                email,
            };
            let data = proxy.agent().configure(args).await?;
            print_json(&data)?;
        }
        Commands::Query { document, wait_arrival } => {
            let mut events = proxy.arrivals().subscribe();
            let data = execute_str(proxy, &document).await?;
            print_json(&data)?;
            if wait_arrival {
                wait_for_arrivals(proxy, &mut events).await?;
            }
        }
        Commands::Lookup { text } => {
            print_json(&serde_json::to_value(parse_references(&text))?)?;
        }
        Commands::Cache { action } => match action {
            CacheAction::Show => {
                let cache = session.cache();
                let markets: Vec<String> = cache.snapshot(CacheKind::Market).into_keys().collect();
                let jump_gates: Vec<String> = cache.snapshot(CacheKind::JumpGate).into_keys().collect();
                print_json(&json!({ "markets": markets, "jumpGates": jump_gates }))?;
            }
            CacheAction::Clear => {
                session.cache().clear();
                info!("Cache cleared");
            }
        },
    }
    Ok(())
}

async fn wait_for_arrivals(
    proxy: &Proxy,
    events: &mut tokio::sync::broadcast::Receiver<spacetraders_graph::ArrivalEvent>,
) -> Result<()> {
    while proxy.arrivals().pending_count() > 0 {
        info!("⏳ Waiting for {} arrival(s), Ctrl+C to stop", proxy.arrivals().pending_count());
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => print_json(&serde_json::to_value(&event)?)?,
                Err(RecvError::Lagged(missed)) => warn!("Missed {} arrival events", missed),
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, pending arrivals dropped");
                break;
            }
        }
    }
    // arrivals that fired while the last wait was ending
    while let Ok(event) = events.try_recv() {
        print_json(&serde_json::to_value(&event)?)?;
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
