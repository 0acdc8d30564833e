//! Risk pipeline orchestration.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use supplyalert_core::OutputMode;

use crate::correction::ScoreCorrection;
use crate::error::RiskError;
use crate::model::{GenerationRequest, TextGenerator};
use crate::news::NewsSearch;
use crate::parse::{parse_delimited, parse_structured, DelimitedAnswer, UNPARSED_SCORE};
use crate::prompt::{build_prompt, build_search_query};
use crate::types::{AnalysisRequest, AnalysisResult, NewsContext, PipelineConfig};

/// One configured variant of the risk pipeline with its collaborators.
///
/// Holds no per-request state; share it behind an `Arc` across handlers.
#[derive(Clone)]
pub struct RiskPipeline {
    news: Arc<dyn NewsSearch>,
    model: Arc<dyn TextGenerator>,
    config: PipelineConfig,
}

impl RiskPipeline {
    #[must_use]
    pub fn new(
        news: Arc<dyn NewsSearch>,
        model: Arc<dyn TextGenerator>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            news,
            model,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Assess one route.
    ///
    /// 1. Validate the route (no outbound call happens for an invalid one).
    /// 2. Search recent news; a failed search falls back to a placeholder.
    /// 3. Build the prompt for the configured output mode and profile.
    /// 4. Call the model.
    /// 5. Parse the answer and, in delimited mode, run the keyword safety net.
    ///
    /// # Errors
    ///
    /// - [`RiskError::Validation`] if origin or destination is blank.
    /// - [`RiskError::Upstream`] if the model call fails.
    /// - [`RiskError::Parse`] if a structured answer is malformed.
    pub async fn assess(
        &self,
        origin: &str,
        destination: &str,
        cargo: Option<&str>,
    ) -> Result<AnalysisResult, RiskError> {
        let request = AnalysisRequest::new(origin, destination, cargo)?;
        self.assess_request(&request, Utc::now().date_naive()).await
    }

    /// Assess an already-validated request as of `today`.
    ///
    /// # Errors
    ///
    /// Same as [`RiskPipeline::assess`], minus validation.
    pub async fn assess_request(
        &self,
        request: &AnalysisRequest,
        today: NaiveDate,
    ) -> Result<AnalysisResult, RiskError> {
        let news = self.gather_news(request).await;

        let prompt = build_prompt(
            request,
            &news,
            today,
            self.config.output_mode,
            self.config.profile,
        );

        let raw = self
            .model
            .generate(&GenerationRequest {
                prompt,
                settings: self.config.generation,
                structured: self.config.output_mode == OutputMode::Structured,
            })
            .await
            .inspect_err(|e| {
                tracing::error!(
                    origin = %request.origin,
                    destination = %request.destination,
                    error = %e,
                    "model call failed"
                );
            })?;

        if raw.trim().is_empty() {
            tracing::error!(
                origin = %request.origin,
                destination = %request.destination,
                "model returned an empty answer"
            );
            return Err(RiskError::Upstream {
                service: "model",
                message: "empty answer".to_string(),
            });
        }

        let result = self.interpret(&raw)?;

        tracing::info!(
            origin = %request.origin,
            destination = %request.destination,
            profile = %self.config.profile,
            mode = %self.config.output_mode,
            news_items = news.len(),
            score = result.score,
            "route assessed"
        );

        Ok(result)
    }

    async fn gather_news(&self, request: &AnalysisRequest) -> NewsContext {
        let query = build_search_query(request);
        match self.news.search(&query).await {
            Ok(snippets) => {
                tracing::debug!(
                    origin = %request.origin,
                    destination = %request.destination,
                    count = snippets.len(),
                    "collected news context"
                );
                NewsContext::new(snippets)
            }
            Err(e) => {
                tracing::warn!(
                    origin = %request.origin,
                    destination = %request.destination,
                    error = %e,
                    "news search failed; continuing without news context"
                );
                NewsContext::default()
            }
        }
    }

    /// Turn the raw model answer into the final result for this variant.
    fn interpret(&self, raw: &str) -> Result<AnalysisResult, RiskError> {
        match self.config.output_mode {
            OutputMode::Structured => {
                let verdict = parse_structured(raw)?;
                Ok(AnalysisResult {
                    score: verdict.score,
                    report_text: verdict.report_text(),
                })
            }
            OutputMode::Delimited => match parse_delimited(raw) {
                DelimitedAnswer::Parsed(verdict) => {
                    let correction = ScoreCorrection::for_profile(self.config.profile);
                    let score =
                        correction.apply(verdict.score, &verdict.explanation, &verdict.verdict);
                    Ok(AnalysisResult {
                        score,
                        report_text: verdict.report_text(),
                    })
                }
                DelimitedAnswer::Unstructured(text) => {
                    tracing::warn!("model answer had no delimited structure; returning raw text");
                    Ok(AnalysisResult {
                        score: UNPARSED_SCORE,
                        report_text: text,
                    })
                }
            },
        }
    }
}
