//! Route risk assessment pipeline for SupplyAlert.
//!
//! Gathers recent shipping news for a route from Tavily, asks a Gemini model
//! for a scored risk judgment, parses the answer, and runs a keyword safety
//! net that keeps the numeric score consistent with the model's own narrative.

pub mod correction;
pub mod error;
pub mod model;
pub mod news;
pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod types;

pub use correction::ScoreCorrection;
pub use error::RiskError;
pub use model::{GeminiClient, GenerationRequest, TextGenerator};
pub use news::{NewsSearch, TavilyClient};
pub use pipeline::RiskPipeline;
pub use types::{
    AnalysisRequest, AnalysisResult, GenerationSettings, ModelVerdict, NewsContext, NewsSnippet,
    PipelineConfig,
};
