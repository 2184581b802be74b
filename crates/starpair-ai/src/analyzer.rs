use crate::llm_provider::{GenerationConfig, LLMProvider};
use crate::prompt::build_compatibility_prompt;
use crate::response::parse_narrative_response;
use serde::{Deserialize, Serialize};
use starpair_core::{narrate, score, CompatibilityTier, DailyHoroscope, NarrativeBundle, Person};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Where a bundle's narrative text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeSource {
    Ai,
    Fallback,
}

impl fmt::Display for NarrativeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NarrativeSource::Ai => write!(f, "ai"),
            NarrativeSource::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub bundle: NarrativeBundle,
    pub source: NarrativeSource,
}

/// Runs the AI-assisted reading and falls back to the deterministic
/// narrative whenever the provider is absent, slow, failing, or returns
/// something unusable.
#[derive(Clone)]
pub struct CompatibilityAnalyzer {
    provider: Option<Arc<dyn LLMProvider>>,
    generation: GenerationConfig,
    timeout: Duration,
}

impl CompatibilityAnalyzer {
    pub fn new(
        provider: Option<Arc<dyn LLMProvider>>,
        generation: GenerationConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            generation,
            timeout,
        }
    }

    /// An analyzer that never calls out.
    pub fn fallback_only() -> Self {
        Self::new(None, GenerationConfig::default(), Duration::from_secs(1))
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.provider_name())
    }

    pub async fn analyze(
        &self,
        person1: &Person,
        person2: &Person,
        horoscope1: &DailyHoroscope,
        horoscope2: &DailyHoroscope,
    ) -> Analysis {
        let score = score(person1.zodiac_sign, person2.zodiac_sign);
        let tier = CompatibilityTier::from_score(score);
        info!(
            sign1 = %person1.zodiac_sign,
            sign2 = %person2.zodiac_sign,
            score,
            tier = %tier,
            "Scored pair"
        );

        let Some(provider) = &self.provider else {
            debug!("No generative-text provider configured");
            return Self::fallback(person1, person2, score, tier);
        };

        let prompt =
            build_compatibility_prompt(person1, person2, horoscope1, horoscope2, score, tier);
        let started = Instant::now();

        let response = match tokio::time::timeout(
            self.timeout,
            provider.generate_with_config(&prompt, &self.generation),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(provider = provider.provider_name(), error = %e, "Provider request failed, using fallback");
                return Self::fallback(person1, person2, score, tier);
            }
            Err(_) => {
                warn!(
                    provider = provider.provider_name(),
                    timeout_secs = self.timeout.as_secs_f64(),
                    "Provider timed out, using fallback"
                );
                return Self::fallback(person1, person2, score, tier);
            }
        };

        match parse_narrative_response(&response.content, person1, person2, score, tier) {
            Ok(bundle) => {
                info!(
                    provider = provider.provider_name(),
                    model = %response.model,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "AI narrative accepted"
                );
                Analysis {
                    bundle,
                    source: NarrativeSource::Ai,
                }
            }
            Err(e) => {
                warn!(provider = provider.provider_name(), reason = %e, "AI response rejected, using fallback");
                Self::fallback(person1, person2, score, tier)
            }
        }
    }

    fn fallback(
        person1: &Person,
        person2: &Person,
        score: u8,
        tier: CompatibilityTier,
    ) -> Analysis {
        Analysis {
            bundle: narrate(person1, person2, score, tier),
            source: NarrativeSource::Fallback,
        }
    }
}
