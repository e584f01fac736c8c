use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HouseholdFinanceError {
    #[error("Invalid input: {field} ({reason})")]
    InvalidInput { field: String, reason: String },

    #[error("Never amortizes: payment {payment} does not retire the balance at period {period} (interest {interest})")]
    NeverAmortizes {
        period: u32,
        payment: Decimal,
        interest: Decimal,
    },

    #[error("Numeric overflow in {context}")]
    NumericOverflow { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for HouseholdFinanceError {
    fn from(e: serde_json::Error) -> Self {
        HouseholdFinanceError::SerializationError(e.to_string())
    }
}

impl HouseholdFinanceError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        HouseholdFinanceError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
