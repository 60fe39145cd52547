use serde::Deserialize;

/// Параметры диагностического обхода
#[derive(Debug, Deserialize)]
pub struct WalkRequest {
    pub target: String,
    /// Корень поддерева; по умолчанию mib-2
    #[serde(default)]
    pub start_oid: Option<String>,
}
