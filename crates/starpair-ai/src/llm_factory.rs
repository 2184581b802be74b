use crate::gemini_provider::{GeminiConfig, GeminiProvider};
use crate::llm_provider::*;
use crate::openai_compatible_provider::{OpenAICompatibleConfig, OpenAICompatibleProvider};
use anyhow::{anyhow, Result};
use starpair_core::LlmConfig;
use std::sync::Arc;
use tracing::info;

/// Factory for creating LLM providers based on configuration
pub struct LLMProviderFactory;

impl LLMProviderFactory {
    /// Create the configured provider.
    ///
    /// `Ok(None)` means no AI service is available and every analysis takes
    /// the deterministic fallback path. With `provider = "auto"` Gemini is
    /// preferred over OpenAI, and a missing key simply yields `None`; naming
    /// a provider explicitly without its key is an error.
    pub fn create_from_config(config: &LlmConfig) -> Result<Option<Arc<dyn LLMProvider>>> {
        if !config.enabled {
            info!("LLM disabled in configuration; using fallback narratives only");
            return Ok(None);
        }

        let provider_name = config.provider.to_lowercase();

        match provider_name.as_str() {
            "auto" => {
                if let Some(key) = config.gemini_key() {
                    Self::create_gemini_provider(config, key).map(Some)
                } else if let Some(key) = config.openai_key() {
                    Self::create_openai_provider(config, Some(key)).map(Some)
                } else {
                    info!("No generative-text API key configured; using fallback narratives only");
                    Ok(None)
                }
            }
            "gemini" => {
                let key = config.gemini_key().ok_or_else(|| {
                    anyhow!(
                        "Gemini API key not found. Set 'llm.gemini_api_key' in config \
                         or GEMINI_API_KEY environment variable"
                    )
                })?;
                Self::create_gemini_provider(config, key).map(Some)
            }
            "openai" => {
                let key = config.openai_key().ok_or_else(|| {
                    anyhow!(
                        "OpenAI API key not found. Set 'llm.openai_api_key' in config \
                         or OPENAI_API_KEY environment variable"
                    )
                })?;
                Self::create_openai_provider(config, Some(key)).map(Some)
            }
            "openai-compatible" => {
                Self::create_openai_provider(config, config.openai_key()).map(Some)
            }
            _ => Err(anyhow!(
                "Unsupported LLM provider: {}. Available providers: auto, gemini, openai, openai-compatible",
                provider_name
            )),
        }
    }

    fn create_gemini_provider(config: &LlmConfig, api_key: String) -> Result<Arc<dyn LLMProvider>> {
        let mut gemini_config = GeminiConfig::new(api_key);
        if let Some(model) = &config.model {
            gemini_config.model = model.clone();
        }
        if let Some(base_url) = &config.base_url {
            gemini_config.base_url = base_url.clone();
        }
        gemini_config.timeout_secs = config.timeout_secs;

        info!(model = %gemini_config.model, "Using Gemini provider");
        Ok(Arc::new(GeminiProvider::new(gemini_config)?))
    }

    fn create_openai_provider(
        config: &LlmConfig,
        api_key: Option<String>,
    ) -> Result<Arc<dyn LLMProvider>> {
        let defaults = OpenAICompatibleConfig::default();
        let provider_name = if config.provider.eq_ignore_ascii_case("openai-compatible") {
            "openai-compatible".to_string()
        } else {
            defaults.provider_name.clone()
        };
        let compat_config = OpenAICompatibleConfig {
            base_url: config.base_url.clone().unwrap_or(defaults.base_url),
            model: config.model.clone().unwrap_or(defaults.model),
            timeout_secs: config.timeout_secs,
            api_key,
            provider_name,
        };

        info!(
            provider = %compat_config.provider_name,
            model = %compat_config.model,
            "Using OpenAI-compatible provider"
        );
        Ok(Arc::new(OpenAICompatibleProvider::new(compat_config)?))
    }
}
