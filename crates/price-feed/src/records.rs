use chrono::NaiveDate;
use core_types::Bar;
use rust_decimal::Decimal;
use serde::Deserialize;

/// One row of a daily history file.
///
/// ```csv
/// Date,Open,High,Low,Close,Volume
/// 2024-01-02,100.5,102.0,99.75,101.25,1200000
/// ```
///
/// Extra columns (e.g. `Adj Close`) are ignored.
#[derive(Debug, Deserialize)]
pub struct BarRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open", with = "rust_decimal::serde::str")]
    pub open: Decimal,
    #[serde(rename = "High", with = "rust_decimal::serde::str")]
    pub high: Decimal,
    #[serde(rename = "Low", with = "rust_decimal::serde::str")]
    pub low: Decimal,
    #[serde(rename = "Close", with = "rust_decimal::serde::str")]
    pub close: Decimal,
    #[serde(rename = "Volume", with = "rust_decimal::serde::str")]
    pub volume: Decimal,
}

impl From<BarRecord> for Bar {
    fn from(record: BarRecord) -> Self {
        Bar {
            date: record.date,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        }
    }
}

/// Parses a history file into bars, in file order.
pub fn parse_bars(bytes: &[u8]) -> Result<Vec<Bar>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut bars = Vec::new();
    for result in reader.deserialize() {
        let record: BarRecord = result?;
        bars.push(Bar::from(record));
    }
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_bars_ignores_extra_columns() {
        let csv = "Date,Open,High,Low,Close,Adj Close,Volume\n\
                   2024-01-02,100.5,102.0,99.75,101.25,101.0,1200000\n\
                   2024-01-03, 101.25 ,103,101,102.5,102.3,900000\n";
        let bars = parse_bars(csv.as_bytes()).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].close, Decimal::from_str("101.25").unwrap());
        assert_eq!(bars[1].open, Decimal::from_str("101.25").unwrap());
        assert_eq!(bars[1].volume, Decimal::from(900000));
    }

    #[test]
    fn test_parse_bars_rejects_malformed_rows() {
        let csv = "Date,Open,High,Low,Close,Volume\n2024-01-02,null,null,null,null,null\n";
        assert!(parse_bars(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let bars = parse_bars(b"Date,Open,High,Low,Close,Volume\n").unwrap();
        assert!(bars.is_empty());
    }
}
