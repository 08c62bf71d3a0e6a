//! Typed wire shapes for the query endpoint.

use serde::{Deserialize, Serialize};

/// Number of results requested from the backend per query.
pub const RESULT_LIMIT: usize = 5;

/// A structured answer returned by the query service (or the offline
/// fallback): free-form answer text, the documents it was grounded on,
/// and a confidence score in `[0, 1]`.
///
/// Deserialized strictly from the backend's JSON body; a body that does
/// not match this shape is treated as a transport failure by the client,
/// never handed to rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    answer: String,
    sources: Vec<String>,
    confidence: f64,
}

impl AnswerResponse {
    /// Creates a response from its parts, clamping confidence into `[0, 1]`.
    pub fn new(answer: impl Into<String>, sources: Vec<String>, confidence: f64) -> Self {
        Self {
            answer: answer.into(),
            sources,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Returns the answer text. May contain markdown.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Returns the source document identifiers, in backend order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Returns the confidence score (0.0-1.0).
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Returns the confidence as a rounded whole percentage.
    pub fn confidence_percent(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (self.confidence * 100.0).round() as u8;
        percent
    }

    /// Formats the results-count label shown above the results surface,
    /// e.g. `"2 sources"` or `"0 sources"`.
    pub fn source_count_label(&self) -> String {
        format!("{} sources", self.sources.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_well_formed_body() {
        let body = r#"{"answer": "text", "sources": ["a.md", "b.md"], "confidence": 0.9}"#;
        let response: AnswerResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.answer(), "text");
        assert_eq!(response.sources(), ["a.md", "b.md"]);
        assert_eq!(response.confidence(), 0.9);
    }

    #[test]
    fn rejects_body_missing_fields() {
        // No "confidence" field - must fail at the decode boundary rather
        // than reach rendering with a partial shape.
        let body = r#"{"answer": "text", "sources": []}"#;
        let result = serde_json::from_str::<AnswerResponse>(body);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_object_body() {
        assert!(serde_json::from_str::<AnswerResponse>("[1, 2, 3]").is_err());
        assert!(serde_json::from_str::<AnswerResponse>("not json").is_err());
    }

    #[test]
    fn confidence_is_clamped_on_construction() {
        assert_eq!(AnswerResponse::new("a", vec![], 1.5).confidence(), 1.0);
        assert_eq!(AnswerResponse::new("a", vec![], -0.5).confidence(), 0.0);
    }

    #[test]
    fn confidence_percent_rounds() {
        assert_eq!(AnswerResponse::new("a", vec![], 0.95).confidence_percent(), 95);
        assert_eq!(AnswerResponse::new("a", vec![], 0.888).confidence_percent(), 89);
        assert_eq!(AnswerResponse::new("a", vec![], 0.0).confidence_percent(), 0);
        assert_eq!(AnswerResponse::new("a", vec![], 1.0).confidence_percent(), 100);
    }

    #[test]
    fn source_count_label_formats() {
        let none = AnswerResponse::new("a", vec![], 0.5);
        assert_eq!(none.source_count_label(), "0 sources");

        let two = AnswerResponse::new("a", vec!["x.md".into(), "y.md".into()], 0.5);
        assert_eq!(two.source_count_label(), "2 sources");
    }
}
