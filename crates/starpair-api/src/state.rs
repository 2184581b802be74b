use crate::sheets::{AnalysisLogSink, GoogleSheetsSink};
use anyhow::Result;
use starpair_ai::{CompatibilityAnalyzer, GenerationConfig, LLMProviderFactory};
use starpair_core::Settings;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub analyzer: CompatibilityAnalyzer,
    pub log_sink: Option<Arc<dyn AnalysisLogSink>>,
}

impl AppState {
    /// Wire up the provider and the spreadsheet log from settings.
    ///
    /// A misconfigured provider is fatal. A broken spreadsheet setup only
    /// disables logging.
    pub async fn new(settings: Settings) -> Result<Self> {
        let provider = LLMProviderFactory::create_from_config(&settings.llm)?;
        let analyzer = CompatibilityAnalyzer::new(
            provider,
            GenerationConfig {
                temperature: settings.llm.temperature,
                max_output_tokens: settings.llm.max_output_tokens,
            },
            Duration::from_secs(settings.llm.timeout_secs),
        );

        let log_sink = match GoogleSheetsSink::from_config(&settings.sheets).await {
            Ok(sink) => sink.map(|s| Arc::new(s) as Arc<dyn AnalysisLogSink>),
            Err(e) => {
                warn!(error = %e, "Spreadsheet logging unavailable");
                None
            }
        };

        Ok(Self::with_parts(settings, analyzer, log_sink))
    }

    pub fn with_parts(
        settings: Settings,
        analyzer: CompatibilityAnalyzer,
        log_sink: Option<Arc<dyn AnalysisLogSink>>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            analyzer,
            log_sink,
        }
    }
}
