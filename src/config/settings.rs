use serde::{Deserialize, Serialize};

/// Базовые настройки приложения
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Настройки SNMP подключения
    pub connection: ConnectionSettings,
    /// Настройки аутентификации
    pub auth: AuthSettings,
    /// Настройки цикла опроса
    pub poller: PollerSettings,
    /// Настройки HTTP/WebSocket сервера
    pub server: ServerSettings,
    /// Настройки хранилища
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Таймаут одного SNMP запроса (секунды)
    pub timeout: u64,
    /// Количество повторов при ошибках
    pub retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    pub v2c: SnmpV2cSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnmpV2cSettings {
    /// Community string
    pub community: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerSettings {
    /// Интервал между циклами опроса (секунды)
    pub interval: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Адрес, на котором слушает HTTP/WebSocket сервер
    pub listen: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Каталог данных (хранилище устройств, логи обходов)
    pub data_dir: String,
    /// Файл со списком машин
    pub machines_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            connection: ConnectionSettings {
                timeout: 2,
                retries: 1,
            },
            auth: AuthSettings {
                v2c: SnmpV2cSettings {
                    community: "public".to_string(),
                },
            },
            poller: PollerSettings { interval: 10 },
            server: ServerSettings {
                listen: "0.0.0.0:8080".to_string(),
            },
            storage: StorageSettings {
                data_dir: "./data".to_string(),
                machines_file: "./config/machines.json".to_string(),
            },
        }
    }
}
