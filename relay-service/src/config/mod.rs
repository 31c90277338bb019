use crate::persona::Persona;
use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Gemini `generateContent` endpoint used when `GEMINI_API_URL` is not set.
pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub persona: Persona,
    pub features: FeatureConfig,
    /// OTLP collector endpoint; span export is disabled when unset.
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Only ever sent as the outbound `key` query parameter.
    pub api_key: Secret<String>,
    pub endpoint_url: String,
}

#[derive(Debug, Clone)]
pub struct FeatureConfig {
    /// Serve `POST /describe-image`.
    pub image_description: bool,
}

impl RelayConfig {
    /// Load from `.env`, the optional `configuration` file and the process environment.
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::load_with(common, |key| env::var(key).ok())
    }

    /// Build the relay configuration from an arbitrary variable lookup.
    pub fn load_with<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = get_env(&lookup, "GEMINI_API_KEY", None)?;

        let persona = get_env(&lookup, "RELAY_PERSONA", Some("standard"))?
            .parse::<Persona>()
            .map_err(|e| config_error(format!("RELAY_PERSONA: {}", e)))?;

        let image_description = parse_bool(
            "RELAY_IMAGE_DESCRIPTION",
            &get_env(&lookup, "RELAY_IMAGE_DESCRIPTION", Some("true"))?,
        )?;

        let config = RelayConfig {
            common,
            gemini: GeminiSettings {
                api_key: Secret::new(api_key),
                endpoint_url: get_env(&lookup, "GEMINI_API_URL", Some(DEFAULT_GEMINI_API_URL))?,
            },
            persona,
            features: FeatureConfig { image_description },
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|v| !v.trim().is_empty()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the relay cannot serve with. Fields are public, so
    /// startup re-runs this on configs that did not come through `load_with`.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.gemini.api_key().trim().is_empty() {
            return Err(config_error(
                "Missing GEMINI_API_KEY environment variable. Check your .env file.",
            ));
        }
        if self.gemini.endpoint_url.trim().is_empty() {
            return Err(config_error("GEMINI_API_URL must not be empty"));
        }
        Ok(())
    }
}

impl GeminiSettings {
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

fn config_error(msg: impl std::fmt::Display) -> AppError {
    AppError::ConfigError(anyhow::anyhow!("{}", msg))
}

fn get_env<F>(lookup: &F, key: &str, default: Option<&str>) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(config_error(format!(
                "Missing {} environment variable. Check your .env file.",
                key
            ))),
        },
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(config_error(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
