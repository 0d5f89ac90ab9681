use crate::config::TransactionColumns;
use crate::model::{PipelineError, Table, INDEX_VALUE};
use crate::normalizer::Quarter;
use crate::utils::{is_missing, parse_datetime, parse_number};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// One integrated row re-parsed into typed values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Whether the transaction id cell holds a value.
    pub has_id: bool,
    pub date: Option<NaiveDateTime>,
    pub index_value: Option<f64>,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuarterlySummary {
    pub quarter: Quarter,
    pub transaction_count: usize,
    /// Mean over rows with an amount; `None` if the quarter has none.
    pub mean_amount: Option<f64>,
}

/// Trait defining the interface for the integrated table analyzer.
pub trait Analyzer {
    fn observations(&self, integrated: &Table) -> Result<Vec<Observation>, PipelineError>;
    fn quarterly_summary(&self, observations: &[Observation]) -> Vec<QuarterlySummary>;
}

pub struct AnalyzerImpl {
    columns: TransactionColumns,
}

impl AnalyzerImpl {
    pub fn new(columns: TransactionColumns) -> Self {
        Self { columns }
    }
}

fn required_column<'a>(
    table: &'a Table,
    name: &str,
) -> Result<impl Iterator<Item = &'a str> + 'a, PipelineError> {
    table
        .column(name)
        .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
}

impl Analyzer for AnalyzerImpl {
    /// Re-parses id, date, index value and amount. Any of the four columns
    /// being absent is a hard error; bad cells become `None`.
    fn observations(&self, integrated: &Table) -> Result<Vec<Observation>, PipelineError> {
        let ids = required_column(integrated, &self.columns.id_column)?;
        let dates = required_column(integrated, &self.columns.date_column)?;
        let index_values = required_column(integrated, INDEX_VALUE)?;
        let amounts = required_column(integrated, &self.columns.amount_column)?;

        Ok(ids
            .zip(dates)
            .zip(index_values)
            .zip(amounts)
            .map(|(((id, date), index_value), amount)| Observation {
                has_id: !is_missing(id),
                date: parse_datetime(date),
                index_value: parse_number(index_value),
                amount: parse_number(amount),
            })
            .collect())
    }

    /// Groups by calendar quarter in chronological order. Rows without a
    /// date are left out; the count only includes rows with an id.
    fn quarterly_summary(&self, observations: &[Observation]) -> Vec<QuarterlySummary> {
        let mut groups: BTreeMap<Quarter, (usize, f64, usize)> = BTreeMap::new();
        let mut undated = 0usize;

        for obs in observations {
            let Some(date) = obs.date else {
                undated += 1;
                continue;
            };
            let entry = groups.entry(Quarter::of(&date)).or_default();
            if obs.has_id {
                entry.0 += 1;
            }
            if let Some(amount) = obs.amount {
                entry.1 += amount;
                entry.2 += 1;
            }
        }

        if undated > 0 {
            warn!("{} rows without a valid date left out of the quarterly summary", undated);
        }

        let summary: Vec<QuarterlySummary> = groups
            .into_iter()
            .map(|(quarter, (count, sum, with_amount))| QuarterlySummary {
                quarter,
                transaction_count: count,
                mean_amount: (with_amount > 0).then(|| sum / with_amount as f64),
            })
            .collect();

        for q in &summary {
            match q.mean_amount {
                Some(mean) => info!("{}: {} transactions, mean {:.2}", q.quarter, q.transaction_count, mean),
                None => info!("{}: {} transactions, no amounts", q.quarter, q.transaction_count),
            }
        }
        summary
    }
}
