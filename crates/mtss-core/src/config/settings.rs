//! Configuration settings
//!
//! Defines the `mtss.toml` structures. Every section falls back to its
//! defaults when absent.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::assembler::GenerationStrategy;
use crate::error::{CoreError, Result};

/// Default config file name looked up in the working directory
pub const CONFIG_FILE: &str = "mtss.toml";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Text generator endpoint and sampling parameters
    pub llm: LlmSettings,
    /// Bounded retry policy
    pub retry: RetrySettings,
    /// Document assembly options
    pub generation: GenerationSettings,
    /// Organization name, footer text and theme colors
    pub branding: BrandingSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from an explicit path, or from `mtss.toml` in the
    /// working directory when present, or fall back to defaults.
    ///
    /// An explicit path that cannot be read is an error; a missing
    /// default file is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = Path::new(CONFIG_FILE);
                if !default.exists() {
                    tracing::debug!("No {} found, using default settings", CONFIG_FILE);
                    return Ok(Self::default());
                }
                default.to_path_buf()
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|source| CoreError::ConfigIo {
            path: path.clone(),
            source,
        })?;
        let settings = Self::from_toml_str(&text)?;
        settings.branding.validate()?;
        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }
}

/// OpenAI-compatible endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub temperature: f32,
    pub chat_max_tokens: u32,
    pub resource_max_tokens: u32,
    pub section_max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4-turbo-preview".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.7,
            chat_max_tokens: 1000,
            resource_max_tokens: 2000,
            section_max_tokens: 1000,
            timeout_secs: 60,
        }
    }
}

/// Retry policy settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Fixed delay between attempts in milliseconds
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 2000,
        }
    }
}

impl RetrySettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Document assembly settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub strategy: GenerationStrategy,
    /// School level used when the user does not give one
    pub school_level: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            strategy: GenerationStrategy::WholeDocument,
            school_level: "K-12".to_string(),
        }
    }
}

/// Branding shown in headers, footers and themes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingSettings {
    pub organization: String,
    pub copyright: String,
    pub promo: String,
    pub promo_url: String,
    /// `#rrggbb`; h1/h2 text, table headers, PDF header band
    pub primary_color: String,
    /// `#rrggbb`; h3 and deeper
    pub secondary_color: String,
}

impl Default for BrandingSettings {
    fn default() -> Self {
        Self {
            organization: "Nsightz".to_string(),
            copyright: "© 2025 Nsightz Inc. All Rights Reserved".to_string(),
            promo: "For one-click progress monitoring, visit mtss.nsightz.com/launch".to_string(),
            promo_url: "https://mtss.nsightz.com/launch".to_string(),
            primary_color: "#3da0ad".to_string(),
            secondary_color: "#2a8995".to_string(),
        }
    }
}

impl BrandingSettings {
    /// Primary theme color
    pub fn primary(&self) -> Result<Rgb> {
        Rgb::from_hex(&self.primary_color)
    }

    /// Secondary theme color
    pub fn secondary(&self) -> Result<Rgb> {
        Rgb::from_hex(&self.secondary_color)
    }

    /// Check both colors parse
    pub fn validate(&self) -> Result<()> {
        self.primary()?;
        self.secondary()?;
        Ok(())
    }
}

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Parse `#rrggbb` (the `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| CoreError::InvalidColor(hex.to_string()))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Channels scaled to `0.0..=1.0`
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_rgb_round_trip() {
        let rgb = Rgb::from_hex("#3DA0AD").unwrap();
        assert_eq!(rgb, Rgb(0x3d, 0xa0, 0xad));
        assert_eq!(rgb.to_string(), "#3da0ad");
    }

    #[test]
    fn test_rgb_rejects_garbage() {
        assert!(Rgb::from_hex("#3da0a").is_err());
        assert!(Rgb::from_hex("teal").is_err());
    }

    #[test]
    fn test_settings_debug() {
        let settings = Settings::default();
        let debug_str = format!("{:?}", settings);
        assert!(debug_str.contains("Settings"));
    }
}
