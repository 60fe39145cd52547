use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Маркер устройства, не ответившего на опрос
pub const OFFLINE_MARKER: &str = "OFFLINE";

/// Снимок одного устройства за один проход опроса: либо поля в порядке
/// профиля (None — поле не прочиталось), либо маркер OFFLINE
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSnapshot {
    Fields(IndexMap<String, Option<String>>),
    Offline,
}

impl DeviceSnapshot {
    pub fn is_offline(&self) -> bool {
        matches!(self, DeviceSnapshot::Offline)
    }

    /// Значение поля, если снимок онлайн и поле прочиталось
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            DeviceSnapshot::Fields(fields) => fields.get(name)?.as_deref(),
            DeviceSnapshot::Offline => None,
        }
    }
}

// В JSON офлайн-снимок — буквальная строка "OFFLINE", как её ждут
// подписчики; онлайн-снимок — обычный объект
impl Serialize for DeviceSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DeviceSnapshot::Fields(fields) => fields.serialize(serializer),
            DeviceSnapshot::Offline => serializer.serialize_str(OFFLINE_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for DeviceSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Marker(String),
            Fields(IndexMap<String, Option<String>>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Marker(s) if s == OFFLINE_MARKER => Ok(DeviceSnapshot::Offline),
            Repr::Marker(s) => Err(serde::de::Error::custom(format!(
                "неизвестный маркер снимка: {}",
                s
            ))),
            Repr::Fields(fields) => Ok(DeviceSnapshot::Fields(fields)),
        }
    }
}

/// Итог опроса одного устройства: ключ хранилища плюс снимок
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceOutcome {
    pub ip_address: String,
    pub snapshot: DeviceSnapshot,
}
