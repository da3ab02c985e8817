//! Career-Shot Core Library
//!
//! This library provides the core functionality for the Career-Shot tool:
//! turn a photo of yourself into an AI-generated picture of you working in
//! any profession, then refine the result with free-text edits.
//!
//! # Overview
//!
//! The user uploads a photo, names a dream job, and receives a generated
//! career photo from Google's Gemini image model. The library handles:
//!
//! - **Image Encoding**: file/byte payloads and data-URLs via [`codec`]
//! - **AI Integration**: the generate and edit calls via [`gemini`]
//! - **Flow Control**: the upload/generate/edit/reset state machine in [`state`]
//! - **User Interface**: the desktop window via [`ui`]
//!
//! # Quick Start
//!
//! The simplest way to use the library is through the [`CareerShot`] facade:
//!
//! ```ignore
//! use career_shot_core::CareerShot;
//!
//! // Initialize with environment configuration (GEMINI_API_KEY required)
//! let app = CareerShot::new()?;
//!
//! // Launch the desktop application
//! app.run()?;
//! ```
//!
//! # Module Structure
//!
//! - [`codec`]: image payload encoding and data-URL handling
//! - [`config`]: configuration loading and management
//! - [`error`]: error types and result aliases
//! - [`gemini`]: Gemini image generation client
//! - [`state`]: the application state machine
//! - [`ui`]: user interface components

pub mod codec;
pub mod config;
pub mod error;
pub mod gemini;
pub mod state;
pub mod ui;

// Re-export primary types for convenience
pub use codec::UploadedImage;
pub use config::Config;
pub use error::{AppError, Operation, Result};
pub use gemini::GeminiClient;
pub use state::{AppState, Screen};

/// Main entry point for the Career-Shot application.
///
/// This struct provides a facade over the various subsystems,
/// handling initialization and orchestration.
pub struct CareerShot {
    config: Config,
}

impl CareerShot {
    /// Creates a new instance with environment-based configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `GEMINI_API_KEY` is not set; a missing credential
    /// is fatal, not a runtime-recoverable condition.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Ok(Self { config })
    }

    /// Creates an instance with custom configuration.
    ///
    /// Use this when you need to override environment-based configuration,
    /// such as specifying a different model or API key.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Launches the desktop application and blocks until it closes.
    pub fn run(&self) -> Result<()> {
        ui::run_app(self.config.clone())
    }

    /// Builds a Gemini client for headless use of the generate/edit calls.
    pub fn client(&self) -> GeminiClient {
        GeminiClient::new(&self.config)
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the configuration.
    ///
    /// Allows modifying settings like the model name after initialization.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}

/// Initializes the library by loading environment variables.
///
/// Call this once at application startup before using any other functions.
/// This loads `.env` files if present and sets up the environment.
pub fn init() {
    let _ = dotenvy::dotenv();
}
