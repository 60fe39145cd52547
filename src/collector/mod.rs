use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use indexmap::IndexMap;
use snmp2::{Oid, Value};
use tokio::sync::Mutex;
use tokio::time::{Duration, timeout};
use tracing::{debug, warn};

use crate::config::{Machine, Profile};
use crate::formatter::ValueFormatter;
use crate::snmp::{SnmpClientV2c, create_v2c_client};

pub mod types;
pub mod walk;

pub use types::{DeviceOutcome, DeviceSnapshot, OFFLINE_MARKER};

/// Одно поле спецификации опроса с заранее распарсенным OID
struct QueryField {
    name: String,
    oid_str: String,
    oid: Oid<'static>,
}

/// Коллектор парка устройств: опрашивает все машины параллельно,
/// по одной сессии на устройство
pub struct FleetCollector {
    fields: Vec<QueryField>,
    community: Vec<u8>,
    request_timeout: Duration,
    /// Сессии по адресу устройства, создаются лениво и живут между циклами
    sessions: Mutex<HashMap<String, Arc<Mutex<SnmpClientV2c>>>>,
}

impl FleetCollector {
    /// Спецификация опроса фиксируется на старте процесса: невалидный OID
    /// в профиле — ошибка конструктора, а не каждого цикла
    pub fn new(profile: &Profile, community: Vec<u8>, request_timeout: Duration) -> Result<Self> {
        let mut fields = Vec::with_capacity(profile.fields.len());
        for (name, oid_str) in &profile.fields {
            let oid = crate::snmp::parse_oid(oid_str)
                .context(format!("Поле '{}' профиля '{}'", name, profile.name))?;
            fields.push(QueryField {
                name: name.clone(),
                oid_str: oid_str.clone(),
                oid,
            });
        }

        Ok(Self {
            fields,
            community,
            request_timeout,
            sessions: Mutex::new(HashMap::new()),
        })
    }

    /// Параллельный опрос всего парка. Результаты позиционно совпадают со
    /// списком целей; отказ одного устройства не влияет на остальные
    pub async fn collect_fleet(&self, machines: &[Machine]) -> Vec<DeviceOutcome> {
        let polls = machines.iter().map(|m| self.collect_device(m));
        join_all(polls).await
    }

    /// Опрос одного устройства: поля в порядке профиля, ошибка отдельного
    /// OID даёт null только для этого поля, таймаут — OFFLINE целиком
    async fn collect_device(&self, machine: &Machine) -> DeviceOutcome {
        let client = match self.session_for(&machine.target).await {
            Ok(client) => client,
            Err(e) => {
                warn!(device = %machine.target, "не удалось открыть SNMP сессию: {e:#}");
                return self.offline_outcome(machine);
            }
        };

        let mut client = client.lock().await;
        let mut fields: IndexMap<String, Option<String>> = IndexMap::new();
        let mut timed_out = false;

        // TODO: собирать все поля одним PDU, когда в snmp2 появится
        // multi-oid GET
        for field in &self.fields {
            match timeout(self.request_timeout, client.get(&field.oid)).await {
                Ok(Ok(value)) => {
                    let rendered = match value {
                        Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView => {
                            debug!(device = %machine.target, oid = %field.oid_str,
                                "OID отсутствует на устройстве");
                            None
                        }
                        ref v => Some(ValueFormatter::format(&field.oid_str, v).text),
                    };
                    fields.insert(field.name.clone(), rendered);
                }
                Ok(Err(e)) => {
                    warn!(device = %machine.target, oid = %field.oid_str,
                        "ошибка чтения поля '{}': {e:#}", field.name);
                    fields.insert(field.name.clone(), None);
                }
                Err(_) => {
                    // Таймаут — считаем устройство недоступным целиком,
                    // оставшиеся поля не спрашиваем
                    warn!(device = %machine.target, "таймаут опроса, устройство OFFLINE");
                    timed_out = true;
                    break;
                }
            }
        }

        if timed_out {
            // Роняем сессию: следующий цикл создаст новую
            drop(client);
            self.drop_session(&machine.target).await;
            return self.offline_outcome(machine);
        }

        let snapshot = DeviceSnapshot::Fields(fields);
        DeviceOutcome {
            ip_address: device_key(machine, &snapshot),
            snapshot,
        }
    }

    fn offline_outcome(&self, machine: &Machine) -> DeviceOutcome {
        DeviceOutcome {
            ip_address: host_part(&machine.target),
            snapshot: DeviceSnapshot::Offline,
        }
    }

    /// Возвращает живую сессию устройства либо создаёт новую
    async fn session_for(&self, target: &str) -> Result<Arc<Mutex<SnmpClientV2c>>> {
        {
            let sessions = self.sessions.lock().await;
            if let Some(client) = sessions.get(target) {
                return Ok(Arc::clone(client));
            }
        }

        let client = Arc::new(Mutex::new(
            create_v2c_client(target, &self.community).await?,
        ));
        self.sessions
            .lock()
            .await
            .insert(target.to_string(), Arc::clone(&client));
        Ok(client)
    }

    async fn drop_session(&self, target: &str) {
        self.sessions.lock().await.remove(target);
    }
}

/// Ключ записи в хранилище: поле ip_address из снимка, если оно
/// опрашивалось, иначе адрес цели без порта
fn device_key(machine: &Machine, snapshot: &DeviceSnapshot) -> String {
    if let Some(ip) = snapshot.field("ip_address") {
        return ip.to_string();
    }
    host_part(&machine.target)
}

/// Отрезает ":порт" от адреса цели. IPv6 без скобок не трогаем
fn host_part(target: &str) -> String {
    match target.rsplit_once(':') {
        Some((host, port))
            if !host.contains(':') && !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) =>
        {
            host.to_string()
        }
        _ => target.to_string(),
    }
}
