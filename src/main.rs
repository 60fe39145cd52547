use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod collector;
mod config;
mod formatter;
mod handlers;
mod models;
mod routes;
mod scheduler;
mod snmp;
mod state;
mod storage;
mod ws;

use collector::FleetCollector;
use scheduler::PollScheduler;
use state::AppState;
use storage::DeviceStore;
use ws::WsHub;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "printwatch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let profile_path =
        std::env::var("SNMP_PROFILE").unwrap_or_else(|_| "./profiles/printer.yaml".to_string());
    let config = Arc::new(config::AppConfig::load(&profile_path)?);
    info!(
        profile = %config.profile.name,
        fields = config.profile.fields.len(),
        "профиль опроса загружен"
    );

    let machines = config::load_machines(&config.get_machines_file());
    if machines.is_empty() {
        warn!("список машин пуст, опрашивать нечего");
    }

    // Недоступный каталог данных и занятый порт — единственные фатальные
    // ошибки; всё дальнейшее процесс переживает
    let store = Arc::new(DeviceStore::new(config.get_data_dir())?);
    let collector = Arc::new(FleetCollector::new(
        &config.profile,
        config.get_community(),
        Duration::from_secs(config.get_timeout()),
    )?);
    let hub = Arc::new(WsHub::new());

    let router = routes::create_router(AppState {
        config: Arc::clone(&config),
        hub: Arc::clone(&hub),
    });
    let listen = config.get_listen();
    let listener = tokio::net::TcpListener::bind(listen.as_str())
        .await
        .context(format!("Не удалось открыть порт {}", listen))?;
    info!("HTTP/WebSocket сервер слушает {}", listen);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("HTTP сервер остановился: {}", e);
        }
    });

    let scheduler = PollScheduler::new(
        collector,
        store,
        hub,
        machines,
        Duration::from_secs(config.get_interval()),
    );
    info!(interval = config.get_interval(), "запускаем цикл опроса");
    scheduler.run().await;

    Ok(())
}
