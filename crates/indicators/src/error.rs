use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Indicator engine received invalid parameters: {0}")]
    InvalidParameters(String),
}
