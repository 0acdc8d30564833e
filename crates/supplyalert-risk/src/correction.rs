//! Keyword safety net for delimited model answers.
//!
//! The model does not always keep its number in line with its own words: it
//! can describe a severe storm and still answer `20`. When the narrative
//! contains an acute-danger keyword and the score sits below the profile
//! floor, the score is raised to the profile's forced value.

use supplyalert_core::RiskProfile;

/// Acute-danger keywords for the general route-risk profile.
///
/// Lowercase; matched as substrings of the lowercased narrative.
pub(crate) const GENERAL_DANGER_KEYWORDS: &[&str] = &[
    "storm",
    "severe",
    "hurricane",
    "war",
    "attack",
    "blockade",
    "diversion",
    "red sea",
];

/// The general keywords plus deadline and spoilage signals the
/// business-impact prompt asks the model to weigh.
pub(crate) const BUSINESS_DANGER_KEYWORDS: &[&str] = &[
    "storm",
    "severe",
    "hurricane",
    "war",
    "attack",
    "blockade",
    "diversion",
    "red sea",
    "missed deadline",
    "deadline missed",
    "spoil",
];

/// One parameterised keyword override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCorrection {
    pub keywords: &'static [&'static str],
    /// Scores strictly below this are eligible for the override.
    pub floor: u8,
    /// Score assigned when the override fires.
    pub forced: u8,
}

impl ScoreCorrection {
    pub const GENERAL: Self = Self {
        keywords: GENERAL_DANGER_KEYWORDS,
        floor: 50,
        forced: 75,
    };

    pub const BUSINESS_IMPACT: Self = Self {
        keywords: BUSINESS_DANGER_KEYWORDS,
        floor: 80,
        forced: 90,
    };

    #[must_use]
    pub fn for_profile(profile: RiskProfile) -> Self {
        match profile {
            RiskProfile::General => Self::GENERAL,
            RiskProfile::BusinessImpact => Self::BUSINESS_IMPACT,
        }
    }

    /// First configured keyword found in `text`, case-insensitively.
    #[must_use]
    pub fn matched_keyword(&self, text: &str) -> Option<&'static str> {
        let lowered = text.to_lowercase();
        self.keywords
            .iter()
            .copied()
            .find(|keyword| lowered.contains(keyword))
    }

    /// Return the corrected score for `score` given the model's narrative.
    ///
    /// `explanation` and `verdict` are concatenated as-is before matching.
    #[must_use]
    pub fn apply(&self, score: u8, explanation: &str, verdict: &str) -> u8 {
        if score >= self.floor {
            return score;
        }
        let narrative = format!("{explanation}{verdict}");
        match self.matched_keyword(&narrative) {
            Some(keyword) => {
                tracing::debug!(
                    keyword,
                    parsed = score,
                    forced = self.forced,
                    "danger keyword below floor; overriding score"
                );
                self.forced
            }
            None => score,
        }
    }
}
