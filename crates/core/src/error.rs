//! Error types for the career-shot-core library.
//!
//! This module provides granular error variants for different failure modes,
//! enabling precise error handling and user-friendly error messages.

use thiserror::Error;

/// The two remote operations the application can have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// The initial photo-to-career-photo transformation.
    Generate,
    /// A free-text modification of the currently displayed image.
    Edit,
}

impl Operation {
    /// Message shown when the API answered but produced no image part,
    /// typically because the content was filtered or blocked.
    pub fn blocked_message(self) -> &'static str {
        match self {
            Operation::Generate => {
                "No image was generated. The response may have been blocked."
            }
            Operation::Edit => {
                "No image was returned from the edit request. The response may have been blocked."
            }
        }
    }

    /// Generic message shown when the call itself failed. The full detail
    /// goes to the logs, not to the user.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Generate => "Failed to generate image. Please check the logs for more details.",
            Operation::Edit => "Failed to edit image. Please check the logs for more details.",
        }
    }

    /// Fallback message for a failure that carries no text of its own.
    pub fn unknown_error_message(self) -> &'static str {
        match self {
            Operation::Generate => "An unknown error occurred during image generation.",
            Operation::Edit => "An unknown error occurred during image editing.",
        }
    }
}

/// Errors that can occur within the career-shot-core library.
///
/// Each variant represents a specific failure mode. Variants that face the
/// user display a fixed message; diagnostic detail is kept alongside for
/// the logs.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing keys, invalid values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A local image file could not be read into memory. The payload holds
    /// diagnostic detail; the displayed message is intentionally fixed.
    #[error("Failed to read the image file.")]
    ImageRead(String),

    /// The API call succeeded transport-wise but returned no usable image.
    #[error("{}", .0.blocked_message())]
    NoImageReturned(Operation),

    /// Transport or service failure calling the remote API. The second field
    /// holds the underlying failure for diagnostics.
    #[error("{}", .0.failure_message())]
    Upstream(Operation, String),

    /// Image decoding or encoding failed.
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    /// UI-related errors (rendering, window management).
    #[error("UI error: {0}")]
    Ui(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an image processing error with the given message.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::ImageProcessing(msg.into())
    }

    /// Creates a UI error with the given message.
    pub fn ui(msg: impl Into<String>) -> Self {
        Self::Ui(msg.into())
    }
}

/// Picks the message stored in the error slot when a remote call fails:
/// the failure's own text when it has any, otherwise a generic fallback
/// for the operation that failed.
pub fn user_facing_message(operation: Operation, error: &AppError) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        operation.unknown_error_message().to_string()
    } else {
        message
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
