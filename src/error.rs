//! Report error types and user-input parsing.

use thiserror::Error;

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Which piece of user input failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    OrderId,
    Threshold,
    Price,
}

/// Errors that can occur while running a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The underlying SQLite call failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// User-supplied input was rejected before any query ran.
    #[error("'{}': {}", .value, invalid_input_message(.field))]
    InvalidInput { field: InputField, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ReportError {
    /// True for errors that only skip the requested report.
    pub fn is_user_input(&self) -> bool {
        matches!(self, ReportError::InvalidInput { .. })
    }
}

fn invalid_input_message(field: &InputField) -> &'static str {
    match field {
        InputField::OrderId => "Please enter a valid integer order ID.",
        InputField::Threshold | InputField::Price => "Please enter a valid numerical value.",
    }
}

/// Parse an order id: ASCII digits only, no sign.
pub fn parse_order_id(input: &str) -> ReportResult<i64> {
    let trimmed = input.trim();
    let invalid = || ReportError::InvalidInput {
        field: InputField::OrderId,
        value: input.to_string(),
    };

    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    trimmed.parse().map_err(|_| invalid())
}

/// Parse a currency threshold. Rejects non-finite values.
pub fn parse_threshold(input: &str) -> ReportResult<f64> {
    parse_amount(input, InputField::Threshold)
}

pub fn parse_price(input: &str) -> ReportResult<f64> {
    parse_amount(input, InputField::Price)
}

fn parse_amount(input: &str, field: InputField) -> ReportResult<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ReportError::InvalidInput {
            field,
            value: input.to_string(),
        })
}
