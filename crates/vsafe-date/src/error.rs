//! Error types for calendar date handling.

use thiserror::Error;

/// Errors produced while parsing or constructing dates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Text does not split into exactly three `/`-separated parts.
    #[error("date '{value}' is not in month/day/year form")]
    InvalidFormat { value: String },

    /// One of the three parts is not an integer.
    #[error("invalid {component} in date '{value}'")]
    InvalidComponent {
        value: String,
        component: &'static str,
    },

    /// The normalized date falls outside years 1 through 9999.
    #[error("date with day count {day_count} is outside the supported range")]
    OutOfRange { day_count: i64 },
}

/// Result type alias for date operations.
pub type Result<T> = std::result::Result<T, DateError>;

impl DateError {
    /// Create an InvalidFormat error.
    pub fn invalid_format(value: impl Into<String>) -> Self {
        Self::InvalidFormat {
            value: value.into(),
        }
    }

    /// Create an InvalidComponent error.
    pub fn invalid_component(value: impl Into<String>, component: &'static str) -> Self {
        Self::InvalidComponent {
            value: value.into(),
            component,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DateError::invalid_format("2024-01-15");
        assert_eq!(
            err.to_string(),
            "date '2024-01-15' is not in month/day/year form"
        );

        let err = DateError::invalid_component("1/x/2024", "day");
        assert_eq!(err.to_string(), "invalid day in date '1/x/2024'");
    }
}
