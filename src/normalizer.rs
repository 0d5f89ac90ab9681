// Month names and year-month / quarter keys shared by the index and transactions
use chrono::{Datelike, NaiveDateTime};

const MONTHS: [(&str, &str); 12] = [
    ("janeiro", "01"),
    ("fevereiro", "02"),
    ("março", "03"),
    ("abril", "04"),
    ("maio", "05"),
    ("junho", "06"),
    ("julho", "07"),
    ("agosto", "08"),
    ("setembro", "09"),
    ("outubro", "10"),
    ("novembro", "11"),
    ("dezembro", "12"),
];

/// Two-digit month for a Portuguese month name, `"00"` when unknown.
pub fn month_number(name: &str) -> &'static str {
    let name = name.trim().to_lowercase();
    MONTHS
        .iter()
        .find(|(month, _)| *month == name)
        .map(|(_, number)| *number)
        .unwrap_or("00")
}

/// Splits `"março 2023"` into `("março", "2023")`.
pub fn split_month_period(label: &str) -> Option<(String, String)> {
    let mut parts = label.split_whitespace();
    let month = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let month_ok = month.chars().all(char::is_alphabetic);
    let year_ok = year.len() == 4 && year.chars().all(|c| c.is_ascii_digit());
    (month_ok && year_ok).then(|| (month.to_string(), year.to_string()))
}

/// Join key for an index month label, e.g. `"2023-03"`.
pub fn index_key(month: &str, year: &str) -> String {
    format!("{}-{}", year, month_number(month))
}

/// Join key for a transaction timestamp.
pub fn date_key(date: &NaiveDateTime) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Calendar quarter, ordered chronologically and displayed as `YYYY-Q#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    pub year: i32,
    pub quarter: u32,
}

impl Quarter {
    pub fn of(date: &NaiveDateTime) -> Self {
        Self {
            year: date.year(),
            quarter: (date.month() - 1) / 3 + 1,
        }
    }
}

impl std::fmt::Display for Quarter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}
