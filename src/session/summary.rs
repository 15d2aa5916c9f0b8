use crate::interview::{Role, Transcript};

const MINUTES_PER_MESSAGE: usize = 2;

/// Topic label and the words in a candidate message that suggest it.
const TOPICS: &[(&str, &[&str])] = &[
    ("Work Experience", &["experience", "years", "work"]),
    ("Technical Skills", &["python", "javascript", "java", "react", "django"]),
    ("Project Experience", &["project", "challenge", "problem"]),
];

/// Plain-text recap of a conversation for recruiters.
pub fn generate_conversation_summary(transcript: &Transcript) -> String {
    if transcript.is_empty() {
        return "No conversation data available.".to_string();
    }

    let mut topics: Vec<&str> = Vec::new();
    for message in transcript.messages_from(Role::User) {
        let lower = message.to_lowercase();
        for (topic, words) in TOPICS {
            if !topics.contains(topic) && words.iter().any(|w| lower.contains(w)) {
                topics.push(*topic);
            }
        }
    }

    let mut summary = format!(
        "Conversation Summary:\n\
         - Total Messages: {}\n\
         - User Messages: {}\n\
         - Assistant Messages: {}\n\
         - Conversation Duration: {} minutes (estimated)\n\
         \n\
         Key Topics Discussed:\n",
        transcript.len(),
        transcript.count(Role::User),
        transcript.count(Role::Assistant),
        transcript.len() * MINUTES_PER_MESSAGE,
    );

    for topic in topics {
        summary.push_str("- ");
        summary.push_str(topic);
        summary.push('\n');
    }

    summary
}
