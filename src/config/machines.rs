use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Одна машина из конфигурационного списка. Обязателен только адрес
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub target: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// Загружает список машин. Отсутствующий или битый файл даёт пустой парк
/// с предупреждением — не ошибку старта
pub fn load_machines(path: &str) -> Vec<Machine> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("файл машин {} не прочитан: {}", path, e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Machine>>(&content) {
        Ok(machines) => {
            info!("загружено {} машин из конфигурации", machines.len());
            machines
        }
        Err(e) => {
            warn!("файл машин {} повреждён: {}", path, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_targets_with_optional_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("machines.json");
        std::fs::write(
            &path,
            r#"[
                {"target": "10.0.0.5:161", "label": "бухгалтерия"},
                {"target": "10.0.0.6:161"}
            ]"#,
        )
        .unwrap();

        let machines = load_machines(path.to_str().unwrap());
        assert_eq!(machines.len(), 2);
        assert_eq!(machines[0].target, "10.0.0.5:161");
        assert_eq!(machines[0].label.as_deref(), Some("бухгалтерия"));
        assert_eq!(machines[1].label, None);
    }

    #[test]
    fn missing_file_yields_empty_fleet() {
        assert!(load_machines("./no-such-machines.json").is_empty());
    }

    #[test]
    fn corrupt_file_yields_empty_fleet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("machines.json");
        std::fs::write(&path, "не json").unwrap();

        assert!(load_machines(path.to_str().unwrap()).is_empty());
    }
}
