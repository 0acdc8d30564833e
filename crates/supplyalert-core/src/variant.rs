use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// How the model is asked to format its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// One line of `SCORE|EXPLANATION|VERDICT`. Best-effort parsing.
    #[default]
    Delimited,
    /// A JSON object with `score`, `explanation` and `verdict`. Strict parsing.
    Structured,
}

/// Which scoring policy the prompt and safety net follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    /// Route risk only.
    #[default]
    General,
    /// Route risk weighed against cargo time-sensitivity and deadlines.
    BusinessImpact,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Delimited => write!(f, "delimited"),
            OutputMode::Structured => write!(f, "structured"),
        }
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delimited" => Ok(OutputMode::Delimited),
            "structured" => Ok(OutputMode::Structured),
            other => Err(format!(
                "unknown output mode '{other}'; expected 'delimited' or 'structured'"
            )),
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskProfile::General => write!(f, "general"),
            RiskProfile::BusinessImpact => write!(f, "business_impact"),
        }
    }
}

impl FromStr for RiskProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(RiskProfile::General),
            "business_impact" | "business-impact" => Ok(RiskProfile::BusinessImpact),
            other => Err(format!(
                "unknown risk profile '{other}'; expected 'general' or 'business_impact'"
            )),
        }
    }
}
