//! Search query and model prompt construction.

use chrono::NaiveDate;
use supplyalert_core::{OutputMode, RiskProfile};

use crate::types::{AnalysisRequest, NewsContext};

/// Cargo label used when the request does not describe one.
pub const DEFAULT_CARGO: &str = "general cargo";

/// Risk terms appended to every news query.
const QUERY_RISK_TERMS: &str = "delays conflict weather storm";

/// Build the news search query for a route.
#[must_use]
pub fn build_search_query(request: &AnalysisRequest) -> String {
    format!(
        "maritime shipping risk news {} to {} {QUERY_RISK_TERMS}",
        request.origin, request.destination
    )
}

/// Build the full model prompt.
#[must_use]
pub fn build_prompt(
    request: &AnalysisRequest,
    news: &NewsContext,
    today: NaiveDate,
    mode: OutputMode,
    profile: RiskProfile,
) -> String {
    let cargo = request.cargo.as_deref().unwrap_or(DEFAULT_CARGO);
    let mut prompt = format!(
        "Role: Maritime Supply Chain Risk Expert. Date: {date}.\n\
         Route: {origin} to {destination}.\n\
         Cargo: {cargo}.\n\
         \n\
         Recent News:\n\
         {news}\n\
         \n\
         SCORING RULES (0-100 Scale):\n\
         - 0-10: NO RISK. Smooth sailing.\n\
         - 11-40: LOW RISK. Minor delays, standard vigilance.\n\
         - 41-70: MEDIUM/HIGH RISK. Bad weather, political tension, strikes.\n\
         - 71-100: CRITICAL RISK. War, Severe Storm, Blockade, Route diversion.\n\
         \n\
         IMPORTANT: If you mention \"Storm\", \"Conflict\", \"War\" or \"Diversion\", the score MUST be above 60.\n",
        date = today.format("%Y-%m-%d"),
        origin = request.origin,
        destination = request.destination,
        news = news.render(),
    );

    if profile == RiskProfile::BusinessImpact {
        prompt.push_str(BUSINESS_IMPACT_REASONING);
    }

    prompt.push('\n');
    prompt.push_str(match mode {
        OutputMode::Delimited => DELIMITED_FORMAT,
        OutputMode::Structured => STRUCTURED_FORMAT,
    });
    prompt
}

const BUSINESS_IMPACT_REASONING: &str = "\n\
BUSINESS IMPACT ANALYSIS (reason in three steps):\n\
1. Route risk: assess the route using the news above.\n\
2. Cargo sensitivity: decide whether the cargo is seasonal (tied to a sales date or event) or perishable.\n\
3. Timing: compare today's date and the expected transit delay with any deadline the cargo implies.\n\
\n\
FORCED SCORES:\n\
- If a time-sensitive cargo will miss its deadline, the score MUST be between 90 and 100.\n\
- If perishable cargo faces a material delay, the score MUST be between 80 and 100.\n";

const DELIMITED_FORMAT: &str = "REQUIRED OUTPUT FORMAT (Separate with vertical bars | ):\n\
SCORE|EXPLANATION|VERDICT\n\
\n\
Details:\n\
- SCORE: Integer (e.g., 85).\n\
- EXPLANATION: 3 clear sentences in English explaining the situation. Do not use the | character.\n\
- VERDICT: Short conclusion starting with \"VERDICT:\".\n\
Answer on a single line.\n";

const STRUCTURED_FORMAT: &str = "REQUIRED OUTPUT FORMAT: a single JSON object and nothing else:\n\
{\"score\": <integer 0-100>, \"explanation\": \"<3 clear sentences in English>\", \"verdict\": \"VERDICT: <short conclusion>\"}\n";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewsSnippet, NO_NEWS_PLACEHOLDER};

    fn request(cargo: Option<&str>) -> AnalysisRequest {
        AnalysisRequest::new("Shanghai", "Le Havre", cargo).expect("valid request")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
    }

    #[test]
    fn search_query_embeds_route_and_risk_terms() {
        assert_eq!(
            build_search_query(&request(None)),
            "maritime shipping risk news Shanghai to Le Havre delays conflict weather storm"
        );
    }

    #[test]
    fn prompt_includes_date_route_and_default_cargo() {
        let prompt = build_prompt(
            &request(None),
            &NewsContext::default(),
            today(),
            OutputMode::Delimited,
            RiskProfile::General,
        );
        assert!(prompt.contains("Date: 2026-10-18."));
        assert!(prompt.contains("Route: Shanghai to Le Havre."));
        assert!(prompt.contains("Cargo: general cargo."));
        assert!(prompt.contains(NO_NEWS_PLACEHOLDER));
    }

    #[test]
    fn prompt_includes_cargo_and_news_lines() {
        let news = NewsContext::new(vec![NewsSnippet {
            published_date: "2026-10-10".to_string(),
            content: "Storm warning in the Bay of Biscay".to_string(),
        }]);
        let prompt = build_prompt(
            &request(Some("christmas toys")),
            &news,
            today(),
            OutputMode::Delimited,
            RiskProfile::General,
        );
        assert!(prompt.contains("Cargo: christmas toys."));
        assert!(prompt.contains("[2026-10-10] Storm warning in the Bay of Biscay"));
        assert!(!prompt.contains(NO_NEWS_PLACEHOLDER));
    }

    #[test]
    fn prompt_lists_all_four_bands() {
        let prompt = build_prompt(
            &request(None),
            &NewsContext::default(),
            today(),
            OutputMode::Delimited,
            RiskProfile::General,
        );
        for band in ["0-10:", "11-40:", "41-70:", "71-100:"] {
            assert!(prompt.contains(band), "missing band {band}");
        }
    }

    #[test]
    fn delimited_mode_asks_for_pipe_format() {
        let prompt = build_prompt(
            &request(None),
            &NewsContext::default(),
            today(),
            OutputMode::Delimited,
            RiskProfile::General,
        );
        assert!(prompt.contains("SCORE|EXPLANATION|VERDICT"));
        assert!(prompt.contains("\"VERDICT:\""));
        assert!(!prompt.contains("JSON"));
    }

    #[test]
    fn structured_mode_asks_for_json_keys() {
        let prompt = build_prompt(
            &request(None),
            &NewsContext::default(),
            today(),
            OutputMode::Structured,
            RiskProfile::General,
        );
        assert!(prompt.contains("JSON object"));
        for key in ["\"score\"", "\"explanation\"", "\"verdict\""] {
            assert!(prompt.contains(key), "missing key {key}");
        }
        assert!(!prompt.contains("SCORE|EXPLANATION|VERDICT"));
    }

    #[test]
    fn business_profile_adds_reasoning_steps() {
        let general = build_prompt(
            &request(None),
            &NewsContext::default(),
            today(),
            OutputMode::Delimited,
            RiskProfile::General,
        );
        let business = build_prompt(
            &request(Some("fresh strawberries")),
            &NewsContext::default(),
            today(),
            OutputMode::Delimited,
            RiskProfile::BusinessImpact,
        );
        assert!(!general.contains("BUSINESS IMPACT"));
        assert!(business.contains("BUSINESS IMPACT ANALYSIS"));
        assert!(business.contains("between 90 and 100"));
        assert!(business.contains("between 80 and 100"));
        assert!(business.contains("perishable"));
    }
}
