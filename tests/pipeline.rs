use banvic_analytics::config::TransactionColumns;
use banvic_analytics::model::{FetchError, INDEX_VALUE, YEAR_MONTH};
use banvic_analytics::registry::{dataset_paths, DatasetName};
use banvic_analytics::storage::CsvStorage;
use banvic_analytics::{run, AppConfig, IndexSource, MissingIndexPolicy, PipelineError, MISSING};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct StubSource(Option<&'static str>);

impl IndexSource for StubSource {
    fn fetch(&self) -> Result<String, FetchError> {
        self.0.map(str::to_string).ok_or(FetchError::Status(500))
    }
}

const INDEX_BODY: &str = r#"[
    {"NC":"Nível Territorial (Código)","V":"Valor","D3C":"Mês (Código)","D3N":"Mês"},
    {"NC":"1","NN":"Brasil","MC":"2","MN":"%","V":"0.53","D1C":"1","D1N":"Brasil","D2C":"63","D2N":"IPCA - Variação mensal","D3C":"202301","D3N":"janeiro 2023","D4C":"7169","D4N":"Índice geral"},
    {"NC":"1","NN":"Brasil","MC":"2","MN":"%","V":"0.84","D1C":"1","D1N":"Brasil","D2C":"63","D2N":"IPCA - Variação mensal","D3C":"202302","D3N":"fevereiro 2023","D4C":"7169","D4N":"Índice geral"},
    {"NC":"1","NN":"Brasil","MC":"2","MN":"%","V":"0.71","D1C":"1","D1N":"Brasil","D2C":"63","D2N":"IPCA - Variação mensal","D3C":"202303","D3N":"março 2023","D4C":"7169","D4N":"Índice geral"},
    {"NC":"1","NN":"Brasil","MC":"2","MN":"%","V":"0.61","D1C":"1","D1N":"Brasil","D2C":"63","D2N":"IPCA - Variação mensal","D3C":"202304","D3N":"abril 2023","D4C":"7169","D4N":"Índice geral"}
]"#;

const TRANSACTIONS: &str = "\
cod_transacao,num_conta,data_transacao,nome_transacao,valor_transacao
1,100,2023-03-15 10:00:00 UTC,Pix - Recebido,100.0
2,100,2023-03-20 18:30:00 UTC,Saque,
3,200,2023-04-02 09:15:00 UTC,Compra Débito,300.0
";

fn workspace(transactions: Option<&str>) -> (TempDir, AppConfig) {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("banvic_data");
    fs::create_dir_all(&data_dir).unwrap();

    for (name, path) in dataset_paths(&data_dir) {
        match name {
            DatasetName::Transacoes => {
                if let Some(body) = transactions {
                    fs::write(path, body).unwrap();
                }
            }
            DatasetName::Contas => {}
            _ => fs::write(path, "id,nome\n1,Alpha\n2,\n").unwrap(),
        }
    }

    let config = AppConfig {
        data_dir,
        output_csv: Some(dir.path().join("Documents").join("transacoes_ipca.csv")),
        chart_dir: dir.path().join("charts"),
        ..AppConfig::default()
    };
    (dir, config)
}

fn column<'a>(table: &'a banvic_analytics::Table, name: &str) -> Vec<&'a str> {
    table.column(name).unwrap().collect()
}

#[test]
fn end_to_end_two_months() {
    let (_dir, config) = workspace(Some(TRANSACTIONS));
    let output = run(&config, &StubSource(Some(INDEX_BODY))).unwrap();

    assert_eq!(output.integrated.len(), 3);
    assert_eq!(column(&output.integrated, YEAR_MONTH), vec!["2023-03", "2023-03", "2023-04"]);
    assert_eq!(column(&output.integrated, INDEX_VALUE), vec!["0.71", "0.71", "0.61"]);
    assert_eq!(column(&output.integrated, "valor_transacao")[1], MISSING);

    let labels: Vec<String> = output.quarterly.iter().map(|q| q.quarter.to_string()).collect();
    assert_eq!(labels, vec!["2023-Q1", "2023-Q2"]);
    assert_eq!(
        output.quarterly.iter().map(|q| q.transaction_count).sum::<usize>(),
        3
    );
    assert_eq!(output.quarterly[0].mean_amount, Some(100.0));
    assert_eq!(output.quarterly[1].mean_amount, Some(300.0));

    assert_eq!(output.charts.len(), 2);
    assert!(output.charts.iter().all(|p| p.exists()));
    assert!(output.correlation.is_some());
}

#[test]
fn export_round_trips() {
    let (_dir, config) = workspace(Some(TRANSACTIONS));
    let output = run(&config, &StubSource(Some(INDEX_BODY))).unwrap();

    let exported = output.exported.clone().unwrap();
    let reloaded = CsvStorage::new(&exported).load().unwrap();
    assert_eq!(reloaded.len(), output.integrated.len());
    assert_eq!(reloaded.columns(), output.integrated.columns());
}

#[test]
fn unavailable_index_fails_loudly() {
    let (_dir, config) = workspace(Some(TRANSACTIONS));
    let result = run(&config, &StubSource(None));
    assert!(matches!(result, Err(PipelineError::MissingInput(_))));
    assert!(!config.output_csv.as_deref().is_some_and(Path::exists));
}

#[test]
fn unavailable_index_can_be_filled() {
    let (_dir, mut config) = workspace(Some(TRANSACTIONS));
    config.missing_index = MissingIndexPolicy::Fill;
    config.render_charts = false;

    let output = run(&config, &StubSource(None)).unwrap();
    assert_eq!(output.integrated.len(), 3);
    assert!(column(&output.integrated, INDEX_VALUE).iter().all(|c| *c == MISSING));
    assert_eq!(output.quarterly.len(), 2);
    assert!(output.correlation.is_none());
    assert!(output.charts.is_empty());
}

#[test]
fn missing_transactions_dataset_is_fatal() {
    let (_dir, config) = workspace(None);
    let result = run(&config, &StubSource(Some(INDEX_BODY)));
    assert!(matches!(result, Err(PipelineError::MissingDataset(name)) if name == "TRANSACOES"));
}

#[test]
fn renamed_amount_column_is_a_shape_error() {
    let (_dir, mut config) = workspace(Some(TRANSACTIONS));
    config.transactions = TransactionColumns {
        amount_column: "valor".into(),
        ..TransactionColumns::default()
    };
    let result = run(&config, &StubSource(Some(INDEX_BODY)));
    assert!(matches!(result, Err(PipelineError::MissingColumn(c)) if c == "valor"));
}

#[test]
fn unknown_id_column_is_a_shape_error() {
    let (_dir, mut config) = workspace(Some(TRANSACTIONS));
    config.transactions.id_column = "no_such_column".into();
    let result = run(&config, &StubSource(Some(INDEX_BODY)));
    assert!(matches!(result, Err(PipelineError::MissingColumn(c)) if c == "no_such_column"));
}
