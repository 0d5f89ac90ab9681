pub mod sidra;
pub mod traits;

pub use sidra::SidraFetcher;
pub use traits::IndexSource;

use crate::model::Table;
use crate::parser::{index_table, parse_index_response};
use tracing::{error, info};

/// Fetches and reshapes the price index.
///
/// Returns `None` when the index is unavailable; the cause is logged here and
/// never propagated.
pub fn fetch_index_table(source: &dyn IndexSource) -> Option<Table> {
    let body = match source.fetch() {
        Ok(body) => body,
        Err(e) => {
            error!("Price index unavailable: {}", e);
            return None;
        }
    };

    match parse_index_response(&body) {
        Ok(records) => {
            info!("Fetched {} price index records", records.len());
            Some(index_table(&records))
        }
        Err(e) => {
            error!("Price index unavailable: {}", e);
            None
        }
    }
}
