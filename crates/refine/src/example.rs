//! Few-shot question/answer examples.

use promptsy_llm::ResponseSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A question/answer pair demonstrating the behavior a prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Example {
    pub question: String,
    pub answer: String,
}

impl Example {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Output schema for one generated example.
    ///
    /// With `labels`, the answer is constrained to one of them.
    pub fn schema(labels: &[String]) -> ResponseSchema {
        let mut answer = json!({ "type": "string" });
        if !labels.is_empty() {
            answer["enum"] = json!(labels);
        }

        ResponseSchema::new(
            "example",
            json!({
                "type": "object",
                "properties": {
                    "question": { "type": "string" },
                    "answer": answer,
                },
                "required": ["question", "answer"],
                "additionalProperties": false,
            }),
        )
    }
}
