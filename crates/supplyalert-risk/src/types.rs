use serde::Serialize;
use supplyalert_core::{AppConfig, OutputMode, RiskProfile};

use crate::error::RiskError;

/// Context string used when the news search fails or finds nothing.
pub const NO_NEWS_PLACEHOLDER: &str = "No recent news.";

/// A validated route submitted for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub origin: String,
    pub destination: String,
    /// Free-text cargo description. `None` means general cargo.
    pub cargo: Option<String>,
}

impl AnalysisRequest {
    /// Build a request, trimming every field.
    ///
    /// A blank cargo description is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Validation`] when origin or destination is blank.
    pub fn new(origin: &str, destination: &str, cargo: Option<&str>) -> Result<Self, RiskError> {
        let origin = origin.trim();
        let destination = destination.trim();

        let mut missing = Vec::new();
        if origin.is_empty() {
            missing.push("origin");
        }
        if destination.is_empty() {
            missing.push("destination");
        }
        if !missing.is_empty() {
            return Err(RiskError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            cargo: cargo
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(ToOwned::to_owned),
        })
    }
}

/// One search hit used as model context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsSnippet {
    pub published_date: String,
    pub content: String,
}

/// Ordered news snippets for one route. Never absent, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsContext {
    snippets: Vec<NewsSnippet>,
}

impl NewsContext {
    #[must_use]
    pub fn new(snippets: Vec<NewsSnippet>) -> Self {
        Self { snippets }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    /// Render as `[date] content` lines, or [`NO_NEWS_PLACEHOLDER`] when empty.
    #[must_use]
    pub fn render(&self) -> String {
        if self.snippets.is_empty() {
            return NO_NEWS_PLACEHOLDER.to_string();
        }
        self.snippets
            .iter()
            .map(|s| format!("[{}] {}", s.published_date, s.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The model's judgment after parsing, before the safety net runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelVerdict {
    /// Score in `0..=100`.
    pub score: u8,
    pub explanation: String,
    pub verdict: String,
}

impl ModelVerdict {
    /// `explanation`, a blank line, then `verdict`.
    #[must_use]
    pub fn report_text(&self) -> String {
        format!("{}\n\n{}", self.explanation, self.verdict)
    }
}

/// What the pipeline hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Final score in `0..=100`.
    pub score: u8,
    pub report_text: String,
}

/// Sampling parameters passed to the model on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 1000,
        }
    }
}

/// Selects one variant of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PipelineConfig {
    pub output_mode: OutputMode,
    pub profile: RiskProfile,
    pub generation: GenerationSettings,
}

impl PipelineConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            output_mode: config.output_mode,
            profile: config.risk_profile,
            generation: GenerationSettings {
                temperature: config.model_temperature,
                max_output_tokens: config.model_max_output_tokens,
            },
        }
    }
}
