//! Fortuna service binary
//!
//! Wires the in-memory stores, the wager engine, and the verification
//! subsystem into the API server. Collaborator capabilities are constructed
//! here and passed down explicitly; nothing holds a free-standing global.

use clap::Parser;
use fortuna::api::{ApiServer, AppState};
use fortuna::config::FortunaConfig;
use fortuna::games::{ThreadRngSource, WagerEngine};
use fortuna::identity::TokenTableGate;
use fortuna::store::InMemorySettlementStore;
use fortuna::verification::{
    InMemoryCodeStore, TracingEmailSender, VerificationIssuer, VerificationValidator,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fortuna", about = "Authoritative wagering settlement engine")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,

    /// Opening balance for the seeded demo account
    #[arg(long, default_value_t = 1000.0)]
    demo_balance: f64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fortuna=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => FortunaConfig::load_from_file(path)?,
        None => FortunaConfig::default(),
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    let store = Arc::new(InMemorySettlementStore::new());
    let code_store = Arc::new(InMemoryCodeStore::new());
    let rng = Arc::new(ThreadRngSource);
    let gate = Arc::new(TokenTableGate::new());

    // A single demo identity until the external auth service is wired in.
    let demo_account = store.open_account(args.demo_balance);
    gate.register("demo-token", demo_account);
    info!(
        account = %demo_account,
        balance = args.demo_balance,
        "seeded demo account (bearer: demo-token)"
    );

    let state = Arc::new(AppState {
        engine: WagerEngine::new(store.clone(), rng.clone()),
        store,
        gate,
        issuer: VerificationIssuer::new(
            code_store.clone(),
            Arc::new(TracingEmailSender),
            rng,
            config.verification.clone(),
        ),
        validator: VerificationValidator::new(code_store, config.verification.clone()),
    });

    ApiServer::new(config.server, state).run().await
}
