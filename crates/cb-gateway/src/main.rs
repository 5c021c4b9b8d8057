//! callbridge: communications gateway binary
//!
//! Usage:
//!   callbridge            - Start the HTTP server (dispatch API + webhooks)
//!   callbridge --help     - Show help
//!   callbridge --version  - Show version

use std::sync::Arc;
use std::time::Duration;

use cb_api::AppState;
use cb_core::{Config, PromptAssets, SessionStore, SystemClock};
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    Server,
    Help,
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match parse_args() {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("callbridge {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Server => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting callbridge ({})...", config.server.environment);
    tracing::info!("Public base URL: {}", config.server.base_url);

    run_server(config).await
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }
    RunMode::Server
}

/// Print help message
fn print_help() {
    println!("callbridge - voice, SMS, WhatsApp, email and chat gateway");
    println!();
    println!("Usage:");
    println!("  callbridge            Start the HTTP server");
    println!("  callbridge --help     Show this help message");
    println!("  callbridge --version  Show version");
    println!();
    println!("Configuration is read from ./callbridge.toml when present, then");
    println!("overridden by environment variables (a .env file is loaded first):");
    println!("  PORT                  HTTP port (default: 3000)");
    println!("  APP_BASE_URL          Public URL used for Twilio callbacks");
    println!("  API_KEY               Bearer key for dispatch endpoints (optional)");
    println!("  TWILIO_ACCOUNT_SID    Twilio account SID");
    println!("  TWILIO_AUTH_TOKEN     Twilio auth token");
    println!("  TWILIO_PHONE_NUMBER   Default voice/SMS sender");
    println!("  TWILIO_WHATSAPP_NUMBER Default WhatsApp sender");
    println!("  SENDGRID_API_KEY      SendGrid API key");
    println!("  VAPI_PRIVATE_KEY      Vapi private key");
    println!("  VAPI_PHONE_NUMBER_ID  Vapi phone number id for outbound calls");
    println!("  OPENAI_API_KEY        Completion API key (chat falls back offline)");
    println!("  CHAT_STRATEGY         keyword or completion (default: completion)");
    println!("  IVR_TRANSFER_NUMBER   Live-transfer target for menu option 0");
}

/// Run the HTTP server until Ctrl+C
async fn run_server(config: Config) -> anyhow::Result<()> {
    let prompts = PromptAssets::load(&config.chat.prompts_dir);

    let sessions = Arc::new(SessionStore::with_clock(
        config.chat.session_timeout_secs,
        Arc::new(SystemClock),
    ));
    let sweeper = Arc::clone(&sessions)
        .start_sweep_task(Duration::from_secs(config.chat.sweep_interval_secs.max(1)));

    let port = config.server.port;
    let state = AppState::from_config(config, &prompts, sessions)?;

    let server = tokio::spawn(async move {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
            }
            tracing::info!("Shutting down...");
        };
        if let Err(e) = cb_api::start_server(port, state, shutdown).await {
            tracing::error!("HTTP API error: {}", e);
        }
    });

    tracing::info!("callbridge initialized successfully");
    tracing::info!("Press Ctrl+C to exit");

    server.await?;
    sweeper.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}
