use crate::analyzer::indicators::{compute_correlation, scatter_points};
use crate::analyzer::{Analyzer, AnalyzerImpl, QuarterlySummary};
use crate::config::AppConfig;
use crate::fetcher::{fetch_index_table, IndexSource};
use crate::integrator::integrate;
use crate::loader::load_datasets;
use crate::model::{PipelineError, Table};
use crate::registry::{dataset_paths, DatasetName};
use crate::storage::CsvStorage;
use crate::visualizer::render_charts;
use std::path::PathBuf;
use tracing::{info, warn};

/// Everything a run produced.
#[derive(Debug)]
pub struct PipelineOutput {
    pub integrated: Table,
    pub quarterly: Vec<QuarterlySummary>,
    pub correlation: Option<f64>,
    pub charts: Vec<PathBuf>,
    pub exported: Option<PathBuf>,
}

/// Runs load → fetch → integrate → export → aggregate → render.
pub fn run(config: &AppConfig, source: &dyn IndexSource) -> Result<PipelineOutput, PipelineError> {
    info!("Loading datasets from {}", config.data_dir.display());
    let datasets = load_datasets(&dataset_paths(&config.data_dir));
    let transactions = datasets
        .get(&DatasetName::Transacoes)
        .ok_or_else(|| PipelineError::MissingDataset(DatasetName::Transacoes.to_string()))?;

    info!("Fetching price index...");
    let index = fetch_index_table(source);

    info!("Integrating transactions with price index...");
    let integrated = integrate(
        transactions,
        index.as_ref(),
        &config.transactions,
        config.missing_index,
    )?;
    info!("Integrated columns: {}", integrated.columns().join(", "));

    let exported = match &config.output_csv {
        Some(path) => {
            let storage = CsvStorage::new(path);
            match storage.save(&integrated) {
                Ok(()) => Some(storage.path().to_path_buf()),
                Err(e) => {
                    warn!("Export to {} failed: {}", path.display(), e);
                    None
                }
            }
        }
        None => None,
    };

    let analyzer = AnalyzerImpl::new(config.transactions.clone());
    let observations = analyzer.observations(&integrated)?;
    let quarterly = analyzer.quarterly_summary(&observations);

    let points = scatter_points(&observations);
    let correlation = compute_correlation(&points);
    match correlation {
        Some(r) => info!("Index/amount correlation over {} rows: {:.4}", points.len(), r),
        None => info!("Index/amount correlation undefined ({} rows)", points.len()),
    }

    let charts = if config.render_charts {
        render_charts(&quarterly, &points, &config.chart_dir)?
    } else {
        Vec::new()
    };

    info!("Pipeline finished: {} integrated rows, {} quarters", integrated.len(), quarterly.len());
    Ok(PipelineOutput {
        integrated,
        quarterly,
        correlation,
        charts,
        exported,
    })
}
