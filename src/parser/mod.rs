pub mod sidra_parser;

pub use sidra_parser::{index_table, parse_index_response, INDEX_COLUMNS};
