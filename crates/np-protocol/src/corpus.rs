use serde::{Deserialize, Serialize};

/// A known question and the device command that answers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    /// Natural-language question as stored in the corpus.
    pub question: String,
    /// Device command to run for this question.
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Best corpus match for a query, with its similarity score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub pair: QaPair,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qa_pair_from_csv_shaped_json() {
        let json = r#"{"question": "show interfaces", "answer": "show ip int brief"}"#;
        let pair: QaPair = serde_json::from_str(json).unwrap();
        assert_eq!(pair, QaPair::new("show interfaces", "show ip int brief"));
    }
}
