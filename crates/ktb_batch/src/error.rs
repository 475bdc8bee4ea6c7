//! Error types for the key tenor batch.

use ktb_core::DateError;
use ktb_inputs::prelude::{MarketDataError, TradeSourceError};
use ktb_outputs::prelude::SinkError;
use thiserror::Error;

/// Batch error type
#[derive(Debug, Error)]
pub enum BatchError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Blotter could not be located or read
    #[error("Trade source error: {0}")]
    TradeSource(#[from] TradeSourceError),

    /// Market data fixture could not be loaded
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    /// Report could not be rendered or written
    #[error("Output error: {0}")]
    Output(#[from] SinkError),

    /// Evaluation date is invalid
    #[error("Date error: {0}")]
    Date(#[from] DateError),

    /// Workflow execution error
    #[error("Workflow execution error: {0}")]
    Workflow(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Workflow cancelled
    #[error("Workflow cancelled")]
    Cancelled,
}

impl BatchError {
    /// Create a workflow error
    pub fn workflow(msg: impl Into<String>) -> Self {
        Self::Workflow(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_error_display() {
        let err = BatchError::workflow("test error");
        assert!(err.to_string().contains("test error"));
    }

    #[test]
    fn test_from_config_error() {
        let err: BatchError = ConfigError::Parse("bad toml".to_string()).into();
        assert!(matches!(err, BatchError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn test_from_date_error() {
        let err: BatchError = DateError::ParseError("19/10/2026".to_string()).into();
        assert!(err.to_string().starts_with("Date error"));
    }
}
