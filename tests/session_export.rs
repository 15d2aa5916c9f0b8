use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use talentscout_lib::config::AppConfig;
use talentscout_lib::interview::InterviewEngine;
use talentscout_lib::ollama::{BackendError, ChatBackend, ChatRequest};
use talentscout_lib::session::{export_to_csv, export_to_json, generate_conversation_summary, SessionSnapshot};

struct EchoBackend;

#[async_trait]
impl ChatBackend for EchoBackend {
    async fn complete(&self, request: ChatRequest) -> Result<String, BackendError> {
        let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
        Ok(format!("You said: {}", last))
    }
}

async fn interviewed_engine() -> InterviewEngine {
    let mut engine = InterviewEngine::new(Arc::new(AppConfig::default()));
    engine.start();
    for utterance in [
        "Hola",
        "Me llamo... my name is Zoe Ortiz, email zoe@example.com, phone 212.555.0199",
        "10 years experience as an architect, I live in São Paulo",
    ] {
        engine.respond(&EchoBackend, utterance).await;
    }
    engine
}

#[tokio::test]
async fn snapshot_survives_json_round_trip() {
    let engine = interviewed_engine().await;
    let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(8, 15, 30).unwrap();
    let snapshot = engine.snapshot(now);

    let json = export_to_json(&snapshot).unwrap();
    let parsed: SessionSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);
    assert!(json.contains("São Paulo"));

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["session_id"], "session_20240601_081530");
    assert_eq!(value["timestamp"], "2024-06-01T08:15:30.000000");
    assert_eq!(value["candidate_info"]["position"], "architect");
    assert_eq!(value["conversation_summary"]["total_messages"], 7);
    assert_eq!(value["conversation_summary"]["user_messages"], 3);
    assert_eq!(value["conversation_summary"]["assistant_messages"], 4);
}

#[tokio::test]
async fn csv_row_flattens_candidate_fields() {
    let engine = interviewed_engine().await;
    let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(8, 15, 30).unwrap();
    let csv = export_to_csv(&engine.snapshot(now)).unwrap();

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);

    let column = |name: &str| {
        let idx = headers.iter().position(|h| h == name).unwrap();
        rows[0][idx].to_string()
    };
    assert_eq!(column("name"), "Zoe Ortiz");
    assert_eq!(column("email"), "zoe@example.com");
    assert_eq!(column("phone"), "212.555.0199");
    assert_eq!(column("experience"), "10");
    assert_eq!(column("location"), "São Paulo");
    assert_eq!(column("tech_stack"), "");
    assert_eq!(column("total_messages"), "7");
    assert_eq!(column("questions_count"), "0");
}

#[tokio::test]
async fn summary_reflects_the_conversation() {
    let engine = interviewed_engine().await;
    let summary = generate_conversation_summary(engine.transcript());
    assert!(summary.contains("- Total Messages: 7\n"));
    assert!(summary.contains("- Conversation Duration: 14 minutes (estimated)\n"));
    assert!(summary.contains("- Work Experience\n"));
}
