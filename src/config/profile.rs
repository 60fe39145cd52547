use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Спецификация опроса: упорядоченное отображение имени поля в OID.
/// Фиксируется на старте процесса и разделяется всеми устройствами;
/// порядок полей в YAML определяет порядок запросов и полей снимка
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub fields: IndexMap<String, String>,
}

impl Profile {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Не удалось прочитать файл: {}", path))?;

        let profile: Profile =
            serde_yml::from_str(&content).context("Не удалось распарсить YAML")?;

        if profile.fields.is_empty() {
            anyhow::bail!("Профиль '{}' пустой", profile.name);
        }

        Ok(profile)
    }
}
