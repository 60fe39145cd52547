use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{error, info, warn};

use crate::collector::FleetCollector;
use crate::config::Machine;
use crate::storage::DeviceStore;
use crate::ws::WsHub;

/// Оркестратор цикла опроса: фиксированный интервал, за тик один цикл
/// опрос → слияние → чтение → рассылка
pub struct PollScheduler {
    collector: Arc<FleetCollector>,
    store: Arc<DeviceStore>,
    hub: Arc<WsHub>,
    machines: Arc<Vec<Machine>>,
    period: Duration,
}

impl PollScheduler {
    pub fn new(
        collector: Arc<FleetCollector>,
        store: Arc<DeviceStore>,
        hub: Arc<WsHub>,
        machines: Vec<Machine>,
        period: Duration,
    ) -> Self {
        Self {
            collector,
            store,
            hub,
            machines: Arc::new(machines),
            period,
        }
    }

    /// Бесконечный цикл планировщика. Тик при ещё работающем цикле
    /// пропускается по single-flight замку: циклы не перекрываются, а
    /// слияния хранилища проходят строго по одному
    pub async fn run(self) {
        let in_flight = Arc::new(Mutex::new(()));
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let guard = match Arc::clone(&in_flight).try_lock_owned() {
                Ok(guard) => guard,
                Err(_) => {
                    warn!("предыдущий цикл ещё выполняется, пропускаем тик");
                    continue;
                }
            };

            let collector = Arc::clone(&self.collector);
            let store = Arc::clone(&self.store);
            let hub = Arc::clone(&self.hub);
            let machines = Arc::clone(&self.machines);

            tokio::spawn(async move {
                let _guard = guard;
                run_cycle(&collector, &store, &hub, &machines).await;
            });
        }
    }
}

/// Один цикл опроса. Сбой любого шага логируется и не прерывает
/// расписание: следующий тик пойдёт своим чередом
pub async fn run_cycle(
    collector: &FleetCollector,
    store: &DeviceStore,
    hub: &WsHub,
    machines: &[Machine],
) {
    let outcomes = collector.collect_fleet(machines).await;

    if let Err(e) = store.merge(&outcomes) {
        error!("слияние хранилища не удалось: {e:#}");
    }

    let records = store.read_all();
    let delivered = hub.broadcast(&records).await;

    info!(
        devices = outcomes.len(),
        records = records.len(),
        subscribers = delivered,
        "цикл опроса завершён"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;
    use indexmap::IndexMap;

    fn collector() -> FleetCollector {
        let mut fields = IndexMap::new();
        fields.insert("model".to_string(), "1.3.6.1.2.1.1.1.0".to_string());
        let profile = Profile {
            name: "test".to_string(),
            fields,
        };
        FleetCollector::new(&profile, b"public".to_vec(), Duration::from_millis(100)).unwrap()
    }

    #[tokio::test]
    async fn cycle_with_empty_fleet_completes_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = DeviceStore::new(dir.path()).unwrap();
        let hub = WsHub::new();

        run_cycle(&collector(), &store, &hub, &[]).await;

        // цикл записал пустое хранилище и ничего никому не отправил
        assert!(dir.path().join("device_data.json").exists());
        assert!(store.read_all().is_empty());
    }

    #[tokio::test]
    async fn failed_merge_does_not_abort_the_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = DeviceStore::new(dir.path()).unwrap();
        // каталог на месте файла хранилища ломает rename при записи
        std::fs::create_dir(dir.path().join("device_data.json")).unwrap();
        let hub = WsHub::new();

        let machines = vec![Machine {
            target: "10.0.0.5:99999".to_string(),
            label: None,
        }];

        // не должен ни упасть, ни зависнуть
        run_cycle(&collector(), &store, &hub, &machines).await;
    }
}
