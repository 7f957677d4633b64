use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use voltline::application::ports::{JobRepository, LedgerRepository, SystemClock};
use voltline::application::services::{DispatchService, LifecycleService};
use voltline::infrastructure::observability::{LogNotifier, TracingConfig, init_tracing};
use voltline::infrastructure::persistence::{
    InMemoryStore, PgJobRepository, PgLedgerRepository, connect_pool,
};
use voltline::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    let tracing_config =
        TracingConfig::for_environment(settings.environment.to_string(), settings.logging.json);
    init_tracing(&tracing_config);

    let (jobs, ledger): (Arc<dyn JobRepository>, Arc<dyn LedgerRepository>) =
        if settings.database.enabled {
            let pool =
                connect_pool(&settings.database.url, settings.database.max_connections).await?;
            sqlx::migrate!().run(&pool).await?;
            tracing::info!("Database migrations applied");
            (
                Arc::new(PgJobRepository::new(pool.clone())),
                Arc::new(PgLedgerRepository::new(pool)),
            )
        } else {
            tracing::info!("Database disabled, running on the in-memory store");
            let store = Arc::new(InMemoryStore::new());
            (store.clone(), store)
        };

    let clock = Arc::new(SystemClock);
    let notifier = Arc::new(LogNotifier);

    let lifecycle = Arc::new(LifecycleService::new(
        Arc::clone(&jobs),
        Arc::clone(&ledger),
        clock.clone(),
        notifier,
        settings.marketplace.commission_rate,
        settings.marketplace.max_commit_attempts,
    ));

    let dispatch = Arc::new(DispatchService::new(
        Arc::clone(&jobs),
        Arc::clone(&lifecycle),
        clock,
        chrono::Duration::seconds(settings.marketplace.offer_ttl_secs),
    ));

    let state = AppState {
        lifecycle,
        dispatch,
        ledger,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
