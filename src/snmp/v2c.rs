use anyhow::{Context, Result};
use snmp2::{AsyncSession, Oid, Value};

use crate::formatter::ValueFormatter;

/// Одна строка результата обхода поддерева: OID, тип и значение
#[derive(Debug, Clone)]
pub struct WalkRow {
    pub oid: String,
    pub type_name: &'static str,
    pub value: String,
}

/// SNMPv2c клиент поверх одной UDP сессии. Сессия переживает циклы
/// опроса и пересоздаётся только после сетевой ошибки
pub struct SnmpClientV2c {
    session: AsyncSession,
}

impl SnmpClientV2c {
    pub async fn new(target: &str, community: &[u8]) -> Result<Self> {
        let session = AsyncSession::new_v2c(target, community, 2)
            .await
            .context(format!("Не удалось создать SNMP сессию для {}", target))?;

        Ok(Self { session })
    }

    /// Одиночный GET: значение первого varbind ответа
    pub async fn get(&mut self, oid: &Oid<'_>) -> Result<Value<'_>> {
        let resp = self
            .session
            .get(oid)
            .await
            .context("SNMP GET запрос не удался")?;

        let (_, value) = resp
            .varbinds
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("SNMP ответ пустой"))?;

        Ok(value)
    }

    /// Обход всего поддерева через GETBULK, значения сразу
    /// классифицируются в строки
    pub async fn walk(&mut self, start_oid: &Oid<'_>) -> Result<Vec<WalkRow>> {
        self.walk_bulk(start_oid, 10).await
    }

    pub async fn walk_bulk(
        &mut self,
        start_oid: &Oid<'_>,
        max_repetitions: u32,
    ) -> Result<Vec<WalkRow>> {
        let mut results: Vec<WalkRow> = Vec::new();
        let mut current_oid = start_oid.to_owned();

        loop {
            let resp = self
                .session
                .getbulk(&[&current_oid], 0, max_repetitions)
                .await
                .context("SNMP GETBULK запрос не удался")?;

            let mut items = Vec::new();
            let mut found_any = false;

            for (oid, value) in resp.varbinds {
                // Вышли за пределы поддерева либо упёрлись в конец MIB
                if !oid.starts_with(start_oid) || matches!(value, Value::EndOfMibView) {
                    results.extend(items);
                    return Ok(results);
                }

                let oid_str = oid.to_string();
                let formatted = ValueFormatter::format(&oid_str, &value);
                items.push(WalkRow {
                    oid: oid_str,
                    type_name: formatted.type_name,
                    value: formatted.text,
                });
                current_oid = oid.to_owned();
                found_any = true;
            }

            if !found_any {
                break;
            }

            results.extend(items);
        }

        Ok(results)
    }
}
