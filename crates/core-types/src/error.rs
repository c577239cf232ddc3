use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Bar dated {date} has a non-positive {field} price: {value}")]
    NonPositivePrice {
        date: NaiveDate,
        field: &'static str,
        value: Decimal,
    },

    #[error("Bar dated {date} has a negative volume: {value}")]
    NegativeVolume { date: NaiveDate, value: Decimal },

    #[error("Price at position {index} is not a finite number")]
    NonFinitePrice { index: usize },

    #[error("Date after {0} is out of range")]
    DateOutOfRange(NaiveDate),

    #[error("Bar dates must be strictly increasing, but {current} follows {previous}")]
    NonMonotonicDates {
        previous: NaiveDate,
        current: NaiveDate,
    },
}
