use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use crate::snmp::{WalkRow, create_v2c_client, parse_oid};

/// Итог диагностического обхода
#[derive(Debug, Clone)]
pub struct WalkSummary {
    pub output_file: PathBuf,
    pub total: usize,
}

/// Диагностический дамп: полный обход поддерева одной цели с записью
/// плоского текстового лога. Не участвует в цикле опроса, запускается
/// по требованию
pub async fn walk_dump(
    target: &str,
    start_oid: &str,
    community: &[u8],
    output_dir: &Path,
) -> Result<WalkSummary> {
    let root = parse_oid(start_oid)?;
    let mut client = create_v2c_client(target, community).await?;
    let rows = client.walk(&root).await?;

    let log = render_walk_log(target, &rows);
    let file_name = format!("snmp_walk_{}.txt", target.replace(':', "_"));
    let output_file = output_dir.join(file_name);
    std::fs::write(&output_file, log)
        .context(format!("Не удалось записать лог обхода в {:?}", output_file))?;

    Ok(WalkSummary {
        output_file,
        total: rows.len(),
    })
}

/// Формат лога: заголовок с целью и временем, затем триплеты OID/Type/Value
fn render_walk_log(target: &str, rows: &[WalkRow]) -> String {
    let mut log = String::new();
    log.push_str(&format!("SNMP Walk Results for {}\n", target));
    log.push_str(&format!("Timestamp: {}\n", Utc::now().to_rfc3339()));
    log.push_str(&"=".repeat(50));
    log.push_str("\n\n");

    for row in rows {
        log.push_str(&format!(
            "OID: {}\nType: {}\nValue: {}\n\n",
            row.oid, row.type_name, row.value
        ));
    }

    log
}
