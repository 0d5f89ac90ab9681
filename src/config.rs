use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// What to do when the price index could not be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingIndexPolicy {
    /// Stop the run with `PipelineError::MissingInput`.
    #[default]
    Fail,
    /// Keep going with every index column set to the missing marker.
    Fill,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub base_url: String,
    pub table: String,
    pub variable: String,
    pub period: String,
    pub classification: String,
    pub timeout_seconds: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            base_url: "https://apisidra.ibge.gov.br/values".into(),
            table: "7060".into(),
            variable: "63".into(),
            period: "all".into(),
            classification: "c315/7169".into(),
            timeout_seconds: 30,
        }
    }
}

/// Column names of the transactions dataset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransactionColumns {
    pub id_column: String,
    pub date_column: String,
    pub amount_column: String,
}

impl Default for TransactionColumns {
    fn default() -> Self {
        Self {
            id_column: "cod_transacao".into(),
            date_column: "data_transacao".into(),
            amount_column: "valor_transacao".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub output_csv: Option<PathBuf>,
    pub chart_dir: PathBuf,
    pub render_charts: bool,
    pub missing_index: MissingIndexPolicy,
    pub index: IndexConfig,
    pub transactions: TransactionColumns,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data").join("banvic_data"),
            output_csv: default_output_csv(),
            chart_dir: PathBuf::from("charts"),
            render_charts: true,
            missing_index: MissingIndexPolicy::default(),
            index: IndexConfig::default(),
            transactions: TransactionColumns::default(),
        }
    }
}

fn default_output_csv() -> Option<PathBuf> {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"))?;
    Some(
        PathBuf::from(home)
            .join("Documents")
            .join("transacoes_ipca.csv"),
    )
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
