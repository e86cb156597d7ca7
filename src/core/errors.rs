//! Error types for the form-fill pipeline.
//!
//! A single error taxonomy covers every stage: OCR data validation, engine
//! invocation, image handling, LLM calls, and profile persistence. Helper
//! constructors keep call sites terse.
//!
//! Note that a label not being found on a page is *not* an error: the matcher
//! returns `Option` and the renderer records a diagnostic and moves on. Font
//! measurement failures are likewise recovered locally with a width estimate
//! and never surface here.

use thiserror::Error;

/// Convenient result alias for form-fill operations.
pub type FillResult<T> = Result<T, FormFillError>;

/// Errors produced by the form-fill pipeline.
#[derive(Debug, Error)]
pub enum FormFillError {
    /// The parallel OCR arrays (text, left, top, width, height) disagree in
    /// length. Fatal for the affected page only.
    #[error("malformed OCR data: {message}")]
    MalformedOcrData {
        /// Description of the inconsistency.
        message: String,
    },

    /// The external OCR engine could not be invoked or returned a failure.
    #[error("OCR engine failure: {message}")]
    OcrEngine {
        /// Description of the failure.
        message: String,
    },

    /// An image could not be loaded or decoded.
    #[error("image load failed: {0}")]
    ImageLoad(#[from] image::ImageError),

    /// A document page could not be rasterized.
    #[error("page rasterization failed: {message}")]
    PageRender {
        /// Description of the failure.
        message: String,
    },

    /// A font file could not be read or parsed.
    #[error("font error: {message}")]
    Font {
        /// Description of the failure.
        message: String,
    },

    /// The LLM API rejected a request or returned a non-success status.
    #[error("LLM request failed: {message}")]
    Llm {
        /// Description of the failure, including any status code.
        message: String,
    },

    /// The LLM response could not be interpreted even after the repair pass.
    #[error("unexpected LLM response: {message}")]
    InvalidResponse {
        /// Description of what was expected versus received.
        message: String,
    },

    /// Profile database error.
    #[error("profile storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// CSV mirror export error.
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid configuration.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the invalid setting.
        message: String,
    },

    /// Underlying I/O error (subprocess pipes, temp files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error from the LLM client.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormFillError {
    /// Creates a `MalformedOcrData` error.
    pub fn malformed_ocr_data(message: impl Into<String>) -> Self {
        Self::MalformedOcrData {
            message: message.into(),
        }
    }

    /// Creates an `OcrEngine` error.
    pub fn ocr_engine(message: impl Into<String>) -> Self {
        Self::OcrEngine {
            message: message.into(),
        }
    }

    /// Creates a `PageRender` error.
    pub fn page_render(message: impl Into<String>) -> Self {
        Self::PageRender {
            message: message.into(),
        }
    }

    /// Creates a `Font` error.
    pub fn font(message: impl Into<String>) -> Self {
        Self::Font {
            message: message.into(),
        }
    }

    /// Creates an `Llm` error.
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
        }
    }

    /// Creates an `InvalidResponse` error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates a `ConfigError`.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FormFillError::malformed_ocr_data("text has 4 entries, left has 3");
        assert_eq!(
            err.to_string(),
            "malformed OCR data: text has 4 entries, left has 3"
        );

        let err = FormFillError::llm("status 429: rate limited");
        assert!(err.to_string().contains("429"));
    }
}
