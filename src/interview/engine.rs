use chrono::NaiveDateTime;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::extract::{
    extract_email, extract_experience_years, extract_location, extract_name, extract_phone,
    extract_position, extract_tech_stack, find_exit_keyword, sanitize_input,
};
use super::{
    validate_candidate_info, CandidateField, CandidateRecord, QuestionGenerator, QuestionSource, Role,
    TechStack, Transcript, ValidationReport,
};
use crate::config::AppConfig;
use crate::ollama::{BackendError, ChatBackend, ChatMessage, ChatRequest};
use crate::prompts::{backend_failure_message, build_system_prompt, PromptContext, CLOSING_MESSAGE, WELCOME_MESSAGE};
use crate::session::{format_session_data, SessionSnapshot};

/// Conversation lifecycle. Strictly forward, one step at a time, except for
/// the exit-keyword jump straight to `Conclusion`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Greeting,
    CollectingInfo,
    CollectingTechStack,
    GeneratingQuestions,
    TechnicalAssessment,
    Conclusion,
}

impl ConversationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Greeting => "greeting",
            ConversationState::CollectingInfo => "collecting_info",
            ConversationState::CollectingTechStack => "collecting_tech_stack",
            ConversationState::GeneratingQuestions => "generating_questions",
            ConversationState::TechnicalAssessment => "technical_assessment",
            ConversationState::Conclusion => "conclusion",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversationState::Conclusion)
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one turn produced.
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub message: String,
    pub state: ConversationState,
    /// Set when the reply text is the apology for a failed backend call.
    pub backend_error: Option<BackendError>,
    pub ended_by_keyword: bool,
}

/// Read-only view of a session for hosts.
#[derive(Serialize, Debug, Clone)]
pub struct EngineStatus {
    pub state: ConversationState,
    pub candidate_info: CandidateRecord,
    pub tech_stack: TechStack,
    pub questions_count: usize,
    pub current_question_index: usize,
    pub question_source: Option<QuestionSource>,
    pub validation: ValidationReport,
}

/// One screening conversation. Owned by the host, one per candidate; every
/// turn goes through `respond` and is handled to completion before the next.
#[derive(Debug, Clone)]
pub struct InterviewEngine {
    config: Arc<AppConfig>,
    state: ConversationState,
    record: CandidateRecord,
    tech_stack: TechStack,
    questions: Vec<String>,
    question_source: Option<QuestionSource>,
    current_question_index: usize,
    transcript: Transcript,
}

impl InterviewEngine {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            state: ConversationState::Greeting,
            record: CandidateRecord::new(),
            tech_stack: TechStack::new(),
            questions: Vec::new(),
            question_source: None,
            current_question_index: 0,
            transcript: Transcript::new(),
        }
    }

    /// Opens the conversation with the welcome message. Only the first call
    /// records it.
    pub fn start(&mut self) -> &'static str {
        if self.transcript.is_empty() {
            self.transcript.push(Role::Assistant, WELCOME_MESSAGE);
        }
        WELCOME_MESSAGE
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn candidate_info(&self) -> &CandidateRecord {
        &self.record
    }

    pub fn tech_stack(&self) -> &TechStack {
        &self.tech_stack
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    /// The question the candidate is currently answering, if any.
    pub fn current_question(&self) -> Option<&str> {
        if self.state != ConversationState::TechnicalAssessment {
            return None;
        }
        self.questions.get(self.current_question_index).map(String::as_str)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn validation(&self) -> ValidationReport {
        validate_candidate_info(&self.record, &self.config.screening.required_fields)
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            state: self.state,
            candidate_info: self.record.clone(),
            tech_stack: self.tech_stack.clone(),
            questions_count: self.questions.len(),
            current_question_index: self.current_question_index,
            question_source: self.question_source,
            validation: self.validation(),
        }
    }

    pub fn snapshot(&self, now: NaiveDateTime) -> SessionSnapshot {
        format_session_data(&self.record, &self.tech_stack, &self.transcript, &self.questions, now)
    }

    /// Handles one candidate utterance: sanitize, exit check, extraction and
    /// transition, then reply synthesis. Both sides of the exchange are
    /// appended to the transcript.
    pub async fn respond(&mut self, backend: &dyn ChatBackend, utterance: &str) -> TurnReply {
        self.transcript.push(Role::User, utterance);

        let input = sanitize_input(utterance);
        let reply = self.reply_to(backend, &input).await;

        self.transcript.push(Role::Assistant, reply.message.clone());
        reply
    }

    /// Jumps to `Conclusion` from any state without touching collected data.
    pub fn end_conversation(&mut self) -> &'static str {
        if !self.state.is_terminal() {
            info!("🛑 Ending conversation from state {}", self.state);
            self.state = ConversationState::Conclusion;
        }
        CLOSING_MESSAGE
    }

    async fn reply_to(&mut self, backend: &dyn ChatBackend, input: &str) -> TurnReply {
        if let Some(keyword) = find_exit_keyword(input, &self.config.screening.exit_keywords) {
            debug!("Exit keyword '{}' detected", keyword);
            let message = self.end_conversation().to_string();
            return self.closing_reply(message, true);
        }

        if self.state.is_terminal() {
            return self.closing_reply(CLOSING_MESSAGE.to_string(), false);
        }

        self.advance(backend, input).await;

        if self.state.is_terminal() {
            info!("🏁 Technical assessment finished after {} answers", self.current_question_index);
            return self.closing_reply(CLOSING_MESSAGE.to_string(), false);
        }

        self.generate_reply(backend, input).await
    }

    /// Runs extraction for the current state and applies at most one
    /// forward transition.
    pub async fn advance(&mut self, backend: &dyn ChatBackend, input: &str) {
        match self.state {
            ConversationState::Greeting => {
                self.transition(ConversationState::CollectingInfo);
            }
            ConversationState::CollectingInfo => {
                self.collect_candidate_info(input);
                if self.record.has_all(&self.config.screening.required_fields) {
                    let report = self.validation();
                    for warning in &report.warnings {
                        warn!("⚠️ Candidate info warning: {}", warning);
                    }
                    self.transition(ConversationState::CollectingTechStack);
                }
            }
            ConversationState::CollectingTechStack => {
                let found = extract_tech_stack(input, &self.config.screening.tech_keywords);
                let added = self.tech_stack.extend_from(found);
                if added > 0 {
                    debug!("Tech stack now: {}", self.tech_stack.joined(", "));
                }
                if !self.tech_stack.is_empty() {
                    self.transition(ConversationState::GeneratingQuestions);
                    self.prepare_questions(backend).await;
                }
            }
            ConversationState::GeneratingQuestions => {
                self.transition(ConversationState::TechnicalAssessment);
            }
            ConversationState::TechnicalAssessment => {
                if self.current_question_index < self.questions.len() {
                    self.current_question_index += 1;
                }
                if self.current_question_index >= self.questions.len() {
                    self.transition(ConversationState::Conclusion);
                }
            }
            ConversationState::Conclusion => {}
        }
    }

    fn collect_candidate_info(&mut self, input: &str) {
        let extracted = [
            (CandidateField::Name, extract_name(input)),
            (CandidateField::Email, extract_email(input)),
            (CandidateField::Phone, extract_phone(input)),
            (CandidateField::Experience, extract_experience_years(input)),
            (CandidateField::Position, extract_position(input)),
            (CandidateField::Location, extract_location(input)),
        ];

        for (field, value) in extracted {
            if let Some(value) = value {
                if self.record.set(field, value) {
                    debug!("Captured candidate field: {}", field);
                }
            }
        }

        debug!("Candidate fields so far: {:?}", self.record.field_names());
    }

    /// Generates the question list once; later calls keep the first result.
    async fn prepare_questions(&mut self, backend: &dyn ChatBackend) {
        if !self.questions.is_empty() {
            return;
        }

        let config = Arc::clone(&self.config);
        let generator = QuestionGenerator::new(backend, &config.backend, &config.screening.fallback_questions);
        let batch = generator.generate(&self.tech_stack).await;

        self.questions = batch.questions;
        self.question_source = Some(batch.source);
        self.current_question_index = 0;
    }

    async fn generate_reply(&self, backend: &dyn ChatBackend, input: &str) -> TurnReply {
        let system_prompt = build_system_prompt(&PromptContext {
            state: self.state,
            record: &self.record,
            tech_stack: &self.tech_stack,
            questions: &self.questions,
            question_index: self.current_question_index,
        });

        let request = ChatRequest {
            model: self.config.backend.model.clone(),
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(input)],
            max_tokens: self.config.backend.max_tokens,
            temperature: self.config.backend.temperature,
        };

        match backend.complete(request).await {
            Ok(message) => TurnReply {
                message,
                state: self.state,
                backend_error: None,
                ended_by_keyword: false,
            },
            Err(e) => {
                warn!("❌ Reply generation failed ({:?}): {}", e.kind(), e);
                TurnReply {
                    message: backend_failure_message(&e.to_string()),
                    state: self.state,
                    backend_error: Some(e),
                    ended_by_keyword: false,
                }
            }
        }
    }

    fn closing_reply(&self, message: String, ended_by_keyword: bool) -> TurnReply {
        TurnReply {
            message,
            state: self.state,
            backend_error: None,
            ended_by_keyword,
        }
    }

    fn transition(&mut self, next: ConversationState) {
        debug_assert!(next > self.state, "state machine only moves forward");
        info!("🔄 State transition: {} -> {}", self.state, next);
        self.state = next;
    }
}
