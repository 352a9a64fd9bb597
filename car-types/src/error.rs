//! Error types for carsync records.

use thiserror::Error;

/// A car draft that cannot be written to the store.
///
/// The display text is the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Make or model is empty after trimming.
    #[error("Please fill Make & Model")]
    MissingMakeOrModel,

    /// Year is empty, zero, or not a number.
    #[error("Year must be a number")]
    InvalidYear,

    /// Price is empty, zero, or not a number.
    #[error("Price must be a number")]
    InvalidPrice,

    /// Horsepower is present but not a number.
    #[error("Horsepower must be a number")]
    InvalidHorsepower,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ValidationError::MissingMakeOrModel.to_string(),
            "Please fill Make & Model"
        );
        assert_eq!(ValidationError::InvalidYear.to_string(), "Year must be a number");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ValidationError>();
    }
}
