use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::collector::{DeviceOutcome, DeviceSnapshot};

const STORE_FILE: &str = "device_data.json";

/// Запись устройства в хранилище. birth_snapshot ставится один раз при
/// первом успешном слиянии ключа и больше никогда не перезаписывается
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub ip_address: String,
    pub current_fields: DeviceSnapshot,
    pub birth_snapshot: DeviceSnapshot,
    pub last_updated: DateTime<Utc>,
}

/// Хранилище записей устройств: один JSON файл, читается и
/// перезаписывается целиком на каждом цикле
pub struct DeviceStore {
    path: PathBuf,
}

impl DeviceStore {
    /// Создаёт каталог данных. Невозможность создать каталог — фатальная
    /// ошибка старта
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)
            .context(format!("Не удалось создать каталог данных {:?}", data_dir))?;

        Ok(Self {
            path: data_dir.join(STORE_FILE),
        })
    }

    /// Полное содержимое хранилища. Отсутствующий или битый файл — пустая
    /// коллекция, никогда не ошибка
    pub fn read_all(&self) -> Vec<DeviceRecord> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("не удалось прочитать {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "файл {:?} повреждён, считаем хранилище пустым: {}",
                    self.path, e
                );
                Vec::new()
            }
        }
    }

    /// Сливает итоги цикла опроса с сохранённым состоянием и атомарно
    /// перезаписывает файл. Ошибка записи возвращается вызывающему и не
    /// роняет процесс; записи, не попавшие в этот цикл, проходят без
    /// изменений
    pub fn merge(&self, outcomes: &[DeviceOutcome]) -> Result<Vec<DeviceRecord>> {
        let mut records = self.read_all();
        // Одна метка времени на весь вызов merge: все записи цикла несут
        // одинаковый last_updated
        let now = Utc::now();

        for outcome in outcomes {
            match records
                .iter_mut()
                .find(|r| r.ip_address == outcome.ip_address)
            {
                Some(existing) => {
                    existing.current_fields = outcome.snapshot.clone();
                    existing.last_updated = now;
                }
                None => records.push(DeviceRecord {
                    ip_address: outcome.ip_address.clone(),
                    current_fields: outcome.snapshot.clone(),
                    birth_snapshot: outcome.snapshot.clone(),
                    last_updated: now,
                }),
            }
        }

        self.write_all(&records)?;
        info!(devices = records.len(), "хранилище устройств обновлено");
        Ok(records)
    }

    /// Атомарная перезапись целиком: временный файл в том же каталоге,
    /// затем rename
    fn write_all(&self, records: &[DeviceRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)
            .context("Не удалось сериализовать записи устройств")?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).context(format!("Не удалось записать {:?}", tmp))?;
        std::fs::rename(&tmp, &self.path)
            .context(format!("Не удалось заменить {:?}", self.path))?;
        Ok(())
    }
}
