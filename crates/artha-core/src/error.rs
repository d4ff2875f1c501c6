use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArthaError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error(
        "Invalid schedule: installment {installment} cannot cover periodic interest {periodic_interest}"
    )]
    InvalidSchedule {
        installment: Decimal,
        periodic_interest: Decimal,
    },

    #[error("Invalid tax schedule: {0}")]
    InvalidTaxSchedule(String),

    #[error("Numeric overflow in {context}")]
    Overflow { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ArthaError {
    fn from(e: serde_json::Error) -> Self {
        ArthaError::SerializationError(e.to_string())
    }
}
