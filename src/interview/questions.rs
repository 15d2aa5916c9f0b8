use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use super::TechStack;
use crate::config::BackendConfig;
use crate::ollama::{ChatBackend, ChatMessage, ChatRequest};
use crate::prompts::{build_question_prompt, QUESTION_GENERATOR_SYSTEM_PROMPT};

/// Where a question list came from.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    /// The response parsed as a JSON array.
    JsonArray,
    /// The response was not JSON; each non-empty line became a question.
    LineSplit,
    /// No usable text came back; the static list was used.
    Fallback,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct QuestionBatch {
    pub questions: Vec<String>,
    pub source: QuestionSource,
}

/// Two-stage parse of a generation response: strict JSON array first, then
/// the line-split fallback. Returns `None` when neither yields a question.
pub fn parse_generated_questions(raw: &str) -> Option<QuestionBatch> {
    let trimmed = raw.trim();

    if let Some(questions) = parse_json_array(trimmed) {
        if questions.is_empty() {
            // The whole response is an array with nothing to ask.
            return None;
        }
        return Some(QuestionBatch { questions, source: QuestionSource::JsonArray });
    }

    // A fenced array only counts when it yields at least one question.
    if let Some(questions) = fenced_block(trimmed).and_then(parse_json_array) {
        if !questions.is_empty() {
            return Some(QuestionBatch { questions, source: QuestionSource::JsonArray });
        }
    }

    let questions = split_lines_fallback(raw);
    if questions.is_empty() {
        None
    } else {
        Some(QuestionBatch { questions, source: QuestionSource::LineSplit })
    }
}

/// Strict parse of `text` as a JSON array. `None` when it is anything else.
fn parse_json_array(text: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(items.into_iter().filter_map(question_text).collect()),
        _ => None,
    }
}

fn question_text(item: Value) -> Option<String> {
    let text = match item {
        Value::String(s) => s,
        Value::Object(mut map) => match map.remove("question") {
            Some(Value::String(s)) => s,
            _ => return None,
        },
        _ => return None,
    };
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    // Skip a language tag such as ```json
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Named fallback for non-JSON output: one question per non-empty line.
pub fn split_lines_fallback(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct QuestionGenerator<'a> {
    backend: &'a dyn ChatBackend,
    config: &'a BackendConfig,
    fallback: &'a [String],
}

impl<'a> QuestionGenerator<'a> {
    pub fn new(backend: &'a dyn ChatBackend, config: &'a BackendConfig, fallback: &'a [String]) -> Self {
        Self { backend, config, fallback }
    }

    /// Asks the backend for questions covering `tech_stack`. Never returns an
    /// empty list: any failure substitutes the fallback questions.
    pub async fn generate(&self, tech_stack: &TechStack) -> QuestionBatch {
        info!("🤖 Generating technical questions for: {}", tech_stack.joined(", "));

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(QUESTION_GENERATOR_SYSTEM_PROMPT),
                ChatMessage::user(build_question_prompt(tech_stack)),
            ],
            max_tokens: self.config.question_max_tokens,
            temperature: self.config.question_temperature,
        };

        let batch = match self.backend.complete(request).await {
            Ok(raw) => parse_generated_questions(&raw).unwrap_or_else(|| {
                warn!("⚠️ Question generation returned no usable text, using fallback questions");
                self.fallback_batch()
            }),
            Err(e) => {
                warn!("⚠️ Question generation failed ({:?}): {}. Using fallback questions", e.kind(), e);
                self.fallback_batch()
            }
        };

        info!("✅ Prepared {} questions ({:?})", batch.questions.len(), batch.source);
        batch
    }

    fn fallback_batch(&self) -> QuestionBatch {
        QuestionBatch {
            questions: self.fallback.to_vec(),
            source: QuestionSource::Fallback,
        }
    }
}
