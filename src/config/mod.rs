use anyhow::Result;
use std::env;
use std::path::Path;

pub mod machines;
pub mod profile;
pub mod settings;

pub use machines::{Machine, load_machines};
pub use profile::Profile;
pub use settings::Settings;

/// Главная конфигурация приложения
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Спецификация опроса
    pub profile: Profile,
    /// Базовые настройки
    pub settings: Settings,
}

impl AppConfig {
    /// Загружает профиль опроса из YAML файла, настройки — по умолчанию
    /// с переопределением через переменные окружения
    pub fn load(profile_path: impl AsRef<Path>) -> Result<Self> {
        let path = profile_path.as_ref().display().to_string();
        let profile = Profile::load(&path)?;
        let settings = Settings::default();

        Ok(Self { profile, settings })
    }

    /// Community для SNMPv2c
    pub fn get_community(&self) -> Vec<u8> {
        env::var("SNMP_COMMUNITY")
            .unwrap_or_else(|_| self.settings.auth.v2c.community.clone())
            .into_bytes()
    }

    /// Таймаут одного SNMP запроса (секунды)
    pub fn get_timeout(&self) -> u64 {
        env::var("SNMP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(self.settings.connection.timeout)
    }

    /// Интервал между циклами опроса (секунды)
    pub fn get_interval(&self) -> u64 {
        env::var("POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(self.settings.poller.interval)
    }

    /// Адрес HTTP/WebSocket сервера
    pub fn get_listen(&self) -> String {
        env::var("LISTEN_ADDR").unwrap_or_else(|_| self.settings.server.listen.clone())
    }

    /// Каталог данных
    pub fn get_data_dir(&self) -> String {
        env::var("DATA_DIR").unwrap_or_else(|_| self.settings.storage.data_dir.clone())
    }

    /// Файл со списком машин
    pub fn get_machines_file(&self) -> String {
        env::var("MACHINES_FILE").unwrap_or_else(|_| self.settings.storage.machines_file.clone())
    }
}
