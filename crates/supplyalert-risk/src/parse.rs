//! Turning raw model text into a [`ModelVerdict`].

use serde::Deserialize;

use crate::error::RiskError;
use crate::types::ModelVerdict;

/// Score used when the delimited score segment carries no digits.
pub const NEUTRAL_SCORE: u8 = 50;

/// Score used when a delimited answer has no structure at all.
pub const UNPARSED_SCORE: u8 = 0;

const MAX_SCORE: u8 = 100;

/// Outcome of parsing a delimited (`SCORE|EXPLANATION|VERDICT`) answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelimitedAnswer {
    /// At least two `|`-separated parts were present.
    Parsed(ModelVerdict),
    /// Fewer than two parts; the raw text is kept verbatim.
    Unstructured(String),
}

/// Parse a delimited answer.
///
/// Splits on `|`. Part 0 has every non-digit removed before parsing; no
/// digits at all yields [`NEUTRAL_SCORE`]. Part 1 is the explanation and
/// part 2, when present, the verdict. Anything after part 2 is ignored.
#[must_use]
pub fn parse_delimited(raw: &str) -> DelimitedAnswer {
    let parts: Vec<&str> = raw.split('|').collect();
    if parts.len() < 2 {
        return DelimitedAnswer::Unstructured(raw.to_string());
    }

    let score = parse_score_segment(parts[0]);
    let explanation = parts[1].trim().to_string();
    let verdict = parts.get(2).map(|p| p.trim().to_string()).unwrap_or_default();

    DelimitedAnswer::Parsed(ModelVerdict {
        score,
        explanation,
        verdict,
    })
}

fn parse_score_segment(segment: &str) -> u8 {
    let digits: String = segment.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return NEUTRAL_SCORE;
    }
    // All-digit strings only fail to parse on overflow, which is far above 100.
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    clamp_score(i128::from(value))
}

#[derive(Debug, Deserialize)]
struct StructuredAnswer {
    score: i64,
    explanation: String,
    verdict: String,
}

/// Parse a structured JSON answer with required `score`, `explanation` and
/// `verdict` keys.
///
/// # Errors
///
/// Returns [`RiskError::Parse`] if the text is not a JSON object or any key
/// is missing or of the wrong type.
pub fn parse_structured(raw: &str) -> Result<ModelVerdict, RiskError> {
    let answer: StructuredAnswer = serde_json::from_str(raw.trim())
        .map_err(|e| RiskError::Parse(format!("structured model answer: {e}")))?;

    Ok(ModelVerdict {
        score: clamp_score(i128::from(answer.score)),
        explanation: answer.explanation.trim().to_string(),
        verdict: answer.verdict.trim().to_string(),
    })
}

fn clamp_score(value: i128) -> u8 {
    u8::try_from(value.clamp(0, i128::from(MAX_SCORE))).unwrap_or(MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(raw: &str) -> ModelVerdict {
        match parse_delimited(raw) {
            DelimitedAnswer::Parsed(v) => v,
            DelimitedAnswer::Unstructured(text) => panic!("expected parsed answer, got {text:?}"),
        }
    }

    #[test]
    fn well_formed_answer_parses_all_fields() {
        let v = parsed("42| Congestion at Singapore. |  VERDICT: expect delays ");
        assert_eq!(v.score, 42);
        assert_eq!(v.explanation, "Congestion at Singapore.");
        assert_eq!(v.verdict, "VERDICT: expect delays");
    }

    #[test]
    fn missing_verdict_defaults_to_empty() {
        let v = parsed("15|Quiet week");
        assert_eq!(v.score, 15);
        assert_eq!(v.verdict, "");
    }

    #[test]
    fn single_part_is_unstructured() {
        let raw = "The route looks fine overall.";
        assert_eq!(
            parse_delimited(raw),
            DelimitedAnswer::Unstructured(raw.to_string())
        );
    }

    #[test]
    fn empty_answer_is_unstructured() {
        assert_eq!(
            parse_delimited(""),
            DelimitedAnswer::Unstructured(String::new())
        );
    }

    #[test]
    fn score_without_digits_is_neutral() {
        assert_eq!(parsed("high|Tension|VERDICT: watch").score, NEUTRAL_SCORE);
    }

    #[test]
    fn score_noise_is_stripped() {
        assert_eq!(parsed("SCORE: 85/|War risk|VERDICT: avoid").score, 85);
        assert_eq!(parsed("**7**|Calm|VERDICT: go").score, 7);
    }

    #[test]
    fn oversized_score_is_clamped() {
        assert_eq!(parsed("250|Odd|VERDICT: ?").score, 100);
        assert_eq!(parsed("99999999999999999999999|Odd|").score, 100);
    }

    #[test]
    fn extra_pipes_are_ignored_after_verdict() {
        let v = parsed("60|Strikes|VERDICT: delay|trailing");
        assert_eq!(v.verdict, "VERDICT: delay");
    }

    #[test]
    fn structured_answer_parses() {
        let v = parse_structured(
            r#"{"score": 64, "explanation": "Strike at Le Havre.", "verdict": "VERDICT: plan buffer"}"#,
        )
        .unwrap();
        assert_eq!(v.score, 64);
        assert_eq!(v.explanation, "Strike at Le Havre.");
        assert_eq!(v.verdict, "VERDICT: plan buffer");
    }

    #[test]
    fn structured_answer_missing_key_fails() {
        let err = parse_structured(r#"{"score": 64, "explanation": "Strike"}"#).unwrap_err();
        assert!(matches!(err, RiskError::Parse(ref m) if m.contains("verdict")));
    }

    #[test]
    fn structured_answer_with_text_score_fails() {
        let err = parse_structured(
            r#"{"score": "high", "explanation": "Strike", "verdict": "VERDICT: wait"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RiskError::Parse(_)));
    }

    #[test]
    fn structured_answer_rejects_delimited_text() {
        let err = parse_structured("30|Storm|VERDICT: wait").unwrap_err();
        assert!(matches!(err, RiskError::Parse(_)));
    }

    #[test]
    fn structured_score_is_clamped() {
        let v = parse_structured(r#"{"score": -5, "explanation": "x", "verdict": "VERDICT: y"}"#)
            .unwrap();
        assert_eq!(v.score, 0);
    }
}
