// SIDRA-specific JSON reshaping
use crate::model::{IndexRecord, ParseError, Table, INDEX_VALUE, YEAR_MONTH};
use crate::normalizer::{index_key, split_month_period};
use crate::utils::{cell_or_missing, is_missing, parse_number};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Column order of the reshaped index table.
pub const INDEX_COLUMNS: [&str; 16] = [
    "territory_code",
    "territory_name",
    "unit_code",
    "unit_name",
    INDEX_VALUE,
    "country_code",
    "country_name",
    "variable_code",
    "variable_name",
    "month_code",
    "month_name",
    "group_code",
    "group_name",
    "month",
    "year",
    YEAR_MONTH,
];

/// One element of the SIDRA values response, keyed by its short field codes.
#[derive(Debug, Default, Deserialize)]
struct SidraRow {
    #[serde(rename = "NC")]
    territory_code: Option<String>,
    #[serde(rename = "NN")]
    territory_name: Option<String>,
    #[serde(rename = "MC")]
    unit_code: Option<String>,
    #[serde(rename = "MN")]
    unit_name: Option<String>,
    #[serde(rename = "V")]
    value: Option<String>,
    #[serde(rename = "D1C")]
    country_code: Option<String>,
    #[serde(rename = "D1N")]
    country_name: Option<String>,
    #[serde(rename = "D2C")]
    variable_code: Option<String>,
    #[serde(rename = "D2N")]
    variable_name: Option<String>,
    #[serde(rename = "D3C")]
    month_code: Option<String>,
    #[serde(rename = "D3N")]
    month_name: Option<String>,
    #[serde(rename = "D4C")]
    group_code: Option<String>,
    #[serde(rename = "D4N")]
    group_name: Option<String>,
}

/// Parses the SIDRA values response. The first element is the header row
/// and is dropped.
pub fn parse_index_response(body: &str) -> Result<Vec<IndexRecord>, ParseError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(items) = value else {
        return Err(ParseError::NotAnArray);
    };

    let mut records = Vec::with_capacity(items.len().saturating_sub(1));
    for (pos, item) in items.into_iter().enumerate().skip(1) {
        if !item.is_object() {
            warn!("Ignoring index element {}: not an object ({})", pos, item);
            continue;
        }
        match serde_json::from_value::<SidraRow>(item) {
            Ok(row) => records.push(reshape(row)),
            Err(e) => warn!("Ignoring index element {}: {}", pos, e),
        }
    }
    Ok(records)
}

fn present(field: Option<String>) -> Option<String> {
    field
        .filter(|s| !is_missing(s))
        .map(|s| s.trim().to_string())
}

fn reshape(row: SidraRow) -> IndexRecord {
    let month_name = present(row.month_name);
    let period = month_name.as_deref().and_then(split_month_period);
    let year_month = period
        .as_ref()
        .map(|(month, year)| index_key(month, year));
    let (month, year) = match period {
        Some((month, year)) => (Some(month), Some(year)),
        None => (None, None),
    };

    IndexRecord {
        territory_code: present(row.territory_code),
        territory_name: present(row.territory_name),
        unit_code: present(row.unit_code),
        unit_name: present(row.unit_name),
        index_value: present(row.value).as_deref().and_then(parse_number),
        country_code: present(row.country_code),
        country_name: present(row.country_name),
        variable_code: present(row.variable_code),
        variable_name: present(row.variable_name),
        month_code: present(row.month_code),
        month_name,
        group_code: present(row.group_code),
        group_name: present(row.group_name),
        month,
        year,
        year_month,
    }
}

/// Lays reshaped records out as a table, writing `MISSING` for absent values.
pub fn index_table(records: &[IndexRecord]) -> Table {
    let mut table = Table::new(INDEX_COLUMNS);
    for r in records {
        table.push_row(vec![
            cell_or_missing(r.territory_code.clone()),
            cell_or_missing(r.territory_name.clone()),
            cell_or_missing(r.unit_code.clone()),
            cell_or_missing(r.unit_name.clone()),
            cell_or_missing(r.index_value.map(|v| v.to_string())),
            cell_or_missing(r.country_code.clone()),
            cell_or_missing(r.country_name.clone()),
            cell_or_missing(r.variable_code.clone()),
            cell_or_missing(r.variable_name.clone()),
            cell_or_missing(r.month_code.clone()),
            cell_or_missing(r.month_name.clone()),
            cell_or_missing(r.group_code.clone()),
            cell_or_missing(r.group_name.clone()),
            cell_or_missing(r.month.clone()),
            cell_or_missing(r.year.clone()),
            cell_or_missing(r.year_month.clone()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MISSING;

    const BODY: &str = r#"[
        {"NC":"Nível Territorial (Código)","NN":"Nível Territorial","MC":"Unidade de Medida (Código)","MN":"Unidade de Medida","V":"Valor","D1C":"Brasil (Código)","D1N":"Brasil","D2C":"Variável (Código)","D2N":"Variável","D3C":"Mês (Código)","D3N":"Mês","D4C":"Geral, grupo, subgrupo, item e subitem (Código)","D4N":"Geral, grupo, subgrupo, item e subitem"},
        {"NC":"1","NN":"Brasil","MC":"2","MN":"%","V":"0.71","D1C":"1","D1N":"Brasil","D2C":"63","D2N":"IPCA - Variação mensal","D3C":"202303","D3N":"março 2023","D4C":"7169","D4N":"Índice geral"},
        {"NC":"1","NN":"Brasil","MC":"2","MN":"%","V":"...","D1C":"1","D1N":"Brasil","D2C":"63","D2N":"IPCA - Variação mensal","D3C":"202399","D3N":"xyz 2023","D4C":"7169","D4N":"Índice geral"},
        {"NC":"1","NN":"Brasil","MC":"2","MN":"%","V":"0.5","D3C":"2023","D3N":"2023"}
    ]"#;

    #[test]
    fn header_row_is_dropped_and_fields_renamed() {
        let records = parse_index_response(BODY).unwrap();
        assert_eq!(records.len(), 3);

        let march = &records[0];
        assert_eq!(march.territory_name.as_deref(), Some("Brasil"));
        assert_eq!(march.variable_code.as_deref(), Some("63"));
        assert_eq!(march.group_name.as_deref(), Some("Índice geral"));
        assert_eq!(march.index_value, Some(0.71));
        assert_eq!(march.month.as_deref(), Some("março"));
        assert_eq!(march.year.as_deref(), Some("2023"));
        assert_eq!(march.year_month.as_deref(), Some("2023-03"));
    }

    #[test]
    fn bad_values_become_missing() {
        let records = parse_index_response(BODY).unwrap();

        let unknown = &records[1];
        assert_eq!(unknown.index_value, None);
        assert_eq!(unknown.year_month.as_deref(), Some("2023-00"));

        let no_period = &records[2];
        assert_eq!(no_period.month, None);
        assert_eq!(no_period.year_month, None);
        assert_eq!(no_period.country_code, None);
    }

    #[test]
    fn table_has_no_unset_cells() {
        let table = index_table(&parse_index_response(BODY).unwrap());
        assert_eq!(table.columns().len(), INDEX_COLUMNS.len());
        assert_eq!(table.len(), 3);

        let keys: Vec<&str> = table.column(YEAR_MONTH).unwrap().collect();
        assert_eq!(keys, vec!["2023-03", "2023-00", MISSING]);
        let values: Vec<&str> = table.column(INDEX_VALUE).unwrap().collect();
        assert_eq!(values, vec!["0.71", MISSING, "0.5"]);
        assert!(table.rows().iter().flatten().all(|c| !c.is_empty()));
    }

    #[test]
    fn non_array_body_is_rejected() {
        assert!(matches!(
            parse_index_response(r#"{"error":"bad"}"#),
            Err(ParseError::NotAnArray)
        ));
        assert!(matches!(
            parse_index_response("<html>"),
            Err(ParseError::Json(_))
        ));
        assert!(parse_index_response("[]").unwrap().is_empty());
    }

    #[test]
    fn non_object_elements_are_skipped() {
        let body = r#"[
            {"NC":"Nível Territorial (Código)"},
            "stray",
            {"NC":"1","V":0.5,"D3N":"abril 2023"},
            {"NC":"1","V":"0.61","D3N":"abril 2023","extra":"ignored"}
        ]"#;
        let records = parse_index_response(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].index_value, Some(0.61));
        assert_eq!(records[0].year_month.as_deref(), Some("2023-04"));
    }
}
