use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use talentscout_lib::config::{AppConfig, BackendConfig};
use talentscout_lib::interview::{CandidateField, ConversationState, InterviewEngine, QuestionSource};
use talentscout_lib::ollama::{BackendError, BackendErrorKind, ChatBackend, ChatRequest, OllamaClient};
use talentscout_lib::prompts::{CLOSING_MESSAGE, QUESTION_GENERATOR_SYSTEM_PROMPT, WELCOME_MESSAGE};
use talentscout_lib::run_chat;

const INFO_TURN: &str = "My name is John Smith, email john.smith@example.com, phone 555-123-4567, \
    5 years experience, developer, based in Seattle.";

/// Answers question-generation requests with a fixed JSON list and
/// everything else with a short acknowledgement.
struct ScriptedBackend {
    questions: &'static str,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    fn new(questions: &'static str) -> Self {
        Self { questions, requests: Mutex::new(Vec::new()) }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, request: ChatRequest) -> Result<String, BackendError> {
        let is_generation = request.messages[0].content == QUESTION_GENERATOR_SYSTEM_PROMPT;
        self.requests.lock().unwrap().push(request);
        if is_generation {
            Ok(self.questions.to_string())
        } else {
            Ok("Noted.".to_string())
        }
    }
}

fn unreachable_client() -> OllamaClient {
    let config = BackendConfig {
        base_url: "http://127.0.0.1:9/v1".to_string(),
        health_url: "http://127.0.0.1:9/api/tags".to_string(),
        ..BackendConfig::default()
    };
    OllamaClient::new(&config).unwrap()
}

#[tokio::test]
async fn unreachable_backend_still_reaches_question_generation_with_fallback() {
    let config = Arc::new(AppConfig::default());
    let backend = unreachable_client();
    let mut engine = InterviewEngine::new(Arc::clone(&config));
    engine.start();

    let reply = engine.respond(&backend, "Hi there").await;
    assert_eq!(engine.state(), ConversationState::CollectingInfo);
    assert!(reply.message.starts_with("I apologize, but I'm experiencing technical difficulties."));
    assert!(matches!(
        reply.backend_error.map(|e| e.kind()),
        Some(BackendErrorKind::Unreachable) | Some(BackendErrorKind::Timeout)
    ));

    engine.respond(&backend, INFO_TURN).await;
    assert_eq!(engine.state(), ConversationState::CollectingTechStack);
    assert!(engine.validation().is_complete);

    let reply = engine.respond(&backend, "I use Java, Spring, and MySQL").await;
    assert_eq!(reply.state, ConversationState::GeneratingQuestions);
    assert_eq!(engine.questions(), config.screening.fallback_questions.as_slice());
    assert_eq!(engine.questions().len(), 8);
    assert_eq!(engine.status().question_source, Some(QuestionSource::Fallback));
    assert_eq!(engine.tech_stack().joined(", "), "java, spring, mysql");
}

#[tokio::test]
async fn full_interview_walks_every_state_in_order() {
    let backend = ScriptedBackend::new(r#"["What is a trait object?", "When would you use Arc?"]"#);
    let mut engine = InterviewEngine::new(Arc::new(AppConfig::default()));
    assert_eq!(engine.start(), WELCOME_MESSAGE);

    let turns = [
        ("Hello", ConversationState::CollectingInfo),
        (INFO_TURN, ConversationState::CollectingTechStack),
        ("Mostly rust and docker", ConversationState::GeneratingQuestions),
        ("Ready", ConversationState::TechnicalAssessment),
        ("A boxed value with a vtable", ConversationState::TechnicalAssessment),
        ("Shared ownership across threads", ConversationState::Conclusion),
    ];

    for (utterance, expected) in turns {
        let reply = engine.respond(&backend, utterance).await;
        assert_eq!(reply.state, expected, "after {:?}", utterance);
    }

    assert_eq!(engine.questions().len(), 2);
    assert_eq!(engine.current_question_index(), 2);
    assert_eq!(engine.candidate_info().get(CandidateField::Name), Some("John Smith"));
    assert_eq!(engine.candidate_info().get(CandidateField::Location), Some("Seattle"));
    // One generation call plus one reply per turn, except the concluding turn.
    assert_eq!(backend.request_count(), 6);
    // Welcome plus a user/assistant pair per turn.
    assert_eq!(engine.transcript().len(), 13);
}

#[tokio::test]
async fn exit_keyword_concludes_without_touching_collected_data() {
    let backend = ScriptedBackend::new("[]");
    let mut engine = InterviewEngine::new(Arc::new(AppConfig::default()));
    engine.start();
    engine.respond(&backend, "Hello").await;
    engine.respond(&backend, "My email is grace@example.com").await;

    let before = engine.candidate_info().clone();
    let reply = engine.respond(&backend, "Thanks, goodbye. I am Grace Hopper, phone 555-000-1111").await;

    assert!(reply.ended_by_keyword);
    assert_eq!(reply.message, CLOSING_MESSAGE);
    assert_eq!(engine.state(), ConversationState::Conclusion);
    assert_eq!(engine.candidate_info(), &before);
    assert!(engine.tech_stack().is_empty());
}

#[tokio::test]
async fn independent_sessions_do_not_share_state() {
    let config = Arc::new(AppConfig::default());
    let backend = ScriptedBackend::new(r#"["Q?"]"#);
    let mut first = InterviewEngine::new(Arc::clone(&config));
    let mut second = InterviewEngine::new(Arc::clone(&config));

    let (a, b) = tokio::join!(first.respond(&backend, "Hello"), second.respond(&backend, "Goodbye"));

    assert_eq!(a.state, ConversationState::CollectingInfo);
    assert_eq!(b.state, ConversationState::Conclusion);
    assert_eq!(first.state(), ConversationState::CollectingInfo);
    assert_eq!(second.state(), ConversationState::Conclusion);
}

#[tokio::test]
async fn terminal_host_runs_to_conclusion_and_exports() {
    let backend = ScriptedBackend::new(r#"["Explain the borrow checker.", "What does Send mean?"]"#);
    let mut engine = InterviewEngine::new(Arc::new(AppConfig::default()));
    let dir = tempfile::tempdir().unwrap();

    let script = format!(
        "Hi\n/status\n\n{}\nI work with rust\n/summary\nReady\nIt tracks lifetimes\nSafe to move across threads\nnever read\n",
        INFO_TURN
    );
    let mut output: Vec<u8> = Vec::new();

    let paths = run_chat(&mut engine, &backend, script.as_bytes(), &mut output, dir.path())
        .await
        .unwrap()
        .expect("conversation should conclude");

    let printed = String::from_utf8(output).unwrap();
    assert!(printed.starts_with(&format!("TalentScout: {}", WELCOME_MESSAGE)));
    assert!(printed.contains("\"state\": \"collecting_info\""));
    assert!(printed.contains("Conversation Summary:"));
    assert!(printed.contains("Programming Languages: rust"));
    assert!(printed.contains(CLOSING_MESSAGE));
    assert!(!printed.contains("never read"));

    assert!(paths.json.exists());
    assert!(paths.csv.exists());
    assert_eq!(engine.state(), ConversationState::Conclusion);
}

#[tokio::test]
async fn terminal_host_returns_nothing_when_input_ends_early() {
    let backend = ScriptedBackend::new("[]");
    let mut engine = InterviewEngine::new(Arc::new(AppConfig::default()));
    let dir = tempfile::tempdir().unwrap();
    let mut output: Vec<u8> = Vec::new();

    let result = run_chat(&mut engine, &backend, "Hello\n".as_bytes(), &mut output, dir.path())
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(engine.state(), ConversationState::CollectingInfo);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
