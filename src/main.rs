//! Wiring & DI. Entry point: bootstrap adapters, inject into services, serve HTTP.
//! No business logic here.

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use weekly_budget::adapters::http::{AppState, HttpServer};
use weekly_budget::adapters::integrations::WebhookNotifier;
use weekly_budget::adapters::persistence::open_store;
use weekly_budget::ports::{AgentPort, NotifierPort};
use weekly_budget::shared::config::AppConfig;
use weekly_budget::usecases::{BudgetAgent, LedgerService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    // --- Session store (memory:// or sqlite://path) ---
    let store_url = cfg.store_url_or_default();
    let store = open_store(&store_url)
        .await
        .map_err(|e| anyhow::anyhow!("session store {}: {}", store_url, e))?;
    if store_url.starts_with("memory") {
        warn!(
            "using in-memory session store; budgets are lost on restart \
             (set STORE_URL=sqlite://<path>)"
        );
    } else {
        info!(url = %store_url, "session store connected");
    }

    // --- Services ---
    let session_ttl = cfg.session_ttl();
    info!(ttl_secs = session_ttl.as_secs(), "session TTL");
    let ledger = Arc::new(LedgerService::new(store, session_ttl));

    let notifier: Arc<dyn NotifierPort> = Arc::new(
        WebhookNotifier::new(cfg.webhook_timeout()).map_err(|e| anyhow::anyhow!("{}", e))?,
    );
    let agent: Arc<dyn AgentPort> = Arc::new(
        BudgetAgent::new(ledger, notifier).with_currency(cfg.currency_symbol_or_default()),
    );

    // --- HTTP ---
    let addr = cfg.listen_addr();
    let server = HttpServer::bind(addr, AppState { agent })
        .await
        .map_err(|e| anyhow::anyhow!("bind {}: {}", addr, e))?;
    server.run(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
