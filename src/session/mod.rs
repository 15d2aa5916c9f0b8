pub mod export;
pub mod summary;

pub use export::*;
pub use summary::*;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::interview::{CandidateRecord, Role, TechStack, Transcript};

/// ISO-8601 with fixed microsecond precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const SESSION_ID_FORMAT: &str = "session_%Y%m%d_%H%M%S";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationCounts {
    pub total_messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub tech_stack_count: usize,
    pub questions_count: usize,
}

/// Exportable picture of one session at a given moment.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub timestamp: String,
    pub session_id: String,
    pub candidate_info: CandidateRecord,
    pub tech_stack: TechStack,
    pub technical_questions: Vec<String>,
    pub conversation_messages: Transcript,
    pub conversation_summary: ConversationCounts,
}

/// Builds the export snapshot. The clock reading is an input, so identical
/// arguments always produce an identical snapshot.
pub fn format_session_data(
    record: &CandidateRecord,
    tech_stack: &TechStack,
    transcript: &Transcript,
    questions: &[String],
    now: NaiveDateTime,
) -> SessionSnapshot {
    SessionSnapshot {
        timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        session_id: now.format(SESSION_ID_FORMAT).to_string(),
        candidate_info: record.clone(),
        tech_stack: tech_stack.clone(),
        technical_questions: questions.to_vec(),
        conversation_messages: transcript.clone(),
        conversation_summary: ConversationCounts {
            total_messages: transcript.len(),
            user_messages: transcript.count(Role::User),
            assistant_messages: transcript.count(Role::Assistant),
            tech_stack_count: tech_stack.len(),
            questions_count: questions.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::CandidateField;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(h, m, s, micro)
            .unwrap()
    }

    #[test]
    fn test_snapshot_counts_and_ids() {
        let mut record = CandidateRecord::new();
        record.set(CandidateField::Name, "Ada Lovelace");
        let mut stack = TechStack::new();
        stack.extend_from(["rust", "go"]);
        let mut transcript = Transcript::new();
        transcript.push(Role::Assistant, "Hello!");
        transcript.push(Role::User, "Hi");
        transcript.push(Role::Assistant, "Your email?");
        let questions = vec!["Q1?".to_string()];

        let snapshot = format_session_data(&record, &stack, &transcript, &questions, at(14, 5, 9, 42));

        assert_eq!(snapshot.timestamp, "2024-03-09T14:05:09.000042");
        assert_eq!(snapshot.session_id, "session_20240309_140509");
        assert_eq!(
            snapshot.conversation_summary,
            ConversationCounts {
                total_messages: 3,
                user_messages: 1,
                assistant_messages: 2,
                tech_stack_count: 2,
                questions_count: 1,
            }
        );
        assert_eq!(snapshot.candidate_info, record);
    }

    #[test]
    fn test_snapshot_is_reproducible() {
        let record = CandidateRecord::new();
        let stack = TechStack::new();
        let transcript = Transcript::new();
        let now = at(9, 0, 0, 0);

        let a = format_session_data(&record, &stack, &transcript, &[], now);
        let b = format_session_data(&record, &stack, &transcript, &[], now);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert_eq!(a.timestamp, "2024-03-09T09:00:00.000000");
    }
}
