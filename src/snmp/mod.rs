use anyhow::{Context, Result};
use snmp2::Oid;

pub mod v2c;

pub use v2c::{SnmpClientV2c, WalkRow};

/// Парсит строку вида "1.3.6.1.2.1.1.1.0" в объект Oid
pub fn parse_oid(s: &str) -> Result<Oid<'static>> {
    let parts: Result<Vec<u64>, _> = s
        .trim()
        .split('.')
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<u64>())
        .collect();

    let parts = parts.context(format!("Невалидный OID: {}", s))?;
    Oid::from(&parts).map_err(|e| anyhow::anyhow!("Не удалось создать Oid из '{}': {:?}", s, e))
}

/// Фабрика SNMPv2c клиента. Версия протокола фиксирована: v2c,
/// аутентификация SNMPv3 вне задач сервиса
pub async fn create_v2c_client(target: &str, community: &[u8]) -> Result<SnmpClientV2c> {
    SnmpClientV2c::new(target, community).await
}
