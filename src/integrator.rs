// Left join of transactions and the monthly price index on year-month
use crate::config::{MissingIndexPolicy, TransactionColumns};
use crate::model::{PipelineError, Table, MISSING, YEAR_MONTH};
use crate::normalizer::date_key;
use crate::parser::INDEX_COLUMNS;
use crate::utils::{parse_datetime, NORMALIZED_DATETIME};
use std::collections::HashMap;
use tracing::{info, warn};

/// Builds the integrated table.
///
/// Every transaction row survives. Rows without a matching index month get
/// `MISSING` in every index column; rows matching several index rows are
/// repeated once per match.
pub fn integrate(
    transactions: &Table,
    index: Option<&Table>,
    columns: &TransactionColumns,
    policy: MissingIndexPolicy,
) -> Result<Table, PipelineError> {
    let date_idx = transactions
        .column_index(&columns.date_column)
        .ok_or_else(|| PipelineError::MissingColumn(columns.date_column.clone()))?;

    let filler;
    let index = match (index, policy) {
        (Some(index), _) => index,
        (None, MissingIndexPolicy::Fail) => {
            return Err(PipelineError::MissingInput("price index table".into()));
        }
        (None, MissingIndexPolicy::Fill) => {
            warn!("Price index missing; filling index columns with '{}'", MISSING);
            filler = Table::new(INDEX_COLUMNS);
            &filler
        }
    };

    let index_key_idx = index
        .column_index(YEAR_MONTH)
        .ok_or_else(|| PipelineError::MissingColumn(YEAR_MONTH.into()))?;
    let index_cols: Vec<usize> = (0..index.columns().len())
        .filter(|i| *i != index_key_idx)
        .collect();

    if let Some(clash) = index_cols
        .iter()
        .map(|i| &index.columns()[*i])
        .find(|name| transactions.column_index(name).is_some())
    {
        return Err(PipelineError::ColumnClash(clash.clone()));
    }

    let mut by_month: HashMap<&str, Vec<&Vec<String>>> = HashMap::new();
    for row in index.rows() {
        let key = row[index_key_idx].as_str();
        if key != MISSING {
            by_month.entry(key).or_default().push(row);
        }
    }

    let mut header: Vec<String> = transactions
        .columns()
        .iter()
        .filter(|c| c.as_str() != YEAR_MONTH)
        .cloned()
        .collect();
    let own_key_idx = transactions.column_index(YEAR_MONTH);
    header.push(YEAR_MONTH.to_string());
    header.extend(index_cols.iter().map(|i| index.columns()[*i].clone()));

    let mut joined = Table::new(header);
    let mut unmatched = 0usize;
    let mut bad_dates = 0usize;

    for row in transactions.rows() {
        let parsed = parse_datetime(&row[date_idx]);
        if parsed.is_none() {
            bad_dates += 1;
        }
        let key = parsed
            .as_ref()
            .map(date_key)
            .unwrap_or_else(|| MISSING.to_string());

        let mut base: Vec<String> = row
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != own_key_idx)
            .map(|(i, cell)| {
                if i == date_idx {
                    parsed
                        .map(|d| d.format(NORMALIZED_DATETIME).to_string())
                        .unwrap_or_else(|| MISSING.to_string())
                } else {
                    cell.clone()
                }
            })
            .collect();
        base.push(key.clone());

        match by_month.get(key.as_str()) {
            Some(matches) => {
                for index_row in matches {
                    let mut out = base.clone();
                    out.extend(index_cols.iter().map(|i| index_row[*i].clone()));
                    joined.push_row(out);
                }
            }
            None => {
                unmatched += 1;
                let mut out = base;
                out.extend(index_cols.iter().map(|_| MISSING.to_string()));
                joined.push_row(out);
            }
        }
    }

    if bad_dates > 0 {
        warn!("{} transactions have an unparseable date", bad_dates);
    }
    info!(
        "Joined {} transactions with {} index rows: {} rows, {} without index month",
        transactions.len(),
        index.len(),
        joined.len(),
        unmatched
    );
    Ok(joined)
}
