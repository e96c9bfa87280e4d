//! Configuration
//!
//! Settings are loaded from `mtss.toml` in the working directory, or from
//! a path given on the command line:
//!
//! ```toml
//! [llm]
//! model = "gpt-4-turbo-preview"
//! api_key_env = "OPENAI_API_KEY"
//!
//! [retry]
//! max_attempts = 3
//! delay_ms = 2000
//!
//! [generation]
//! strategy = "sections"
//!
//! [branding]
//! primary_color = "#3da0ad"
//! ```

mod settings;

#[cfg(test)]
mod tests;

pub use settings::{
    BrandingSettings, GenerationSettings, LlmSettings, RetrySettings, Rgb, Settings, CONFIG_FILE,
};
