use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
}

/// Append-only conversation log.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.entries.push(TranscriptEntry { role, content: content.into() });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, role: Role) -> usize {
        self.entries.iter().filter(|entry| entry.role == role).count()
    }

    pub fn messages_from(&self, role: Role) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |entry| entry.role == role)
            .map(|entry| entry.content.as_str())
    }
}

impl FromIterator<TranscriptEntry> for Transcript {
    fn from_iter<T: IntoIterator<Item = TranscriptEntry>>(iter: T) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_role() {
        let mut transcript = Transcript::new();
        transcript.push(Role::Assistant, "Hello!");
        transcript.push(Role::User, "Hi");
        transcript.push(Role::Assistant, "Your name?");

        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.count(Role::User), 1);
        assert_eq!(transcript.count(Role::Assistant), 2);
        assert_eq!(transcript.messages_from(Role::User).collect::<Vec<_>>(), vec!["Hi"]);
    }

    #[test]
    fn test_serializes_role_content_pairs() {
        let mut transcript = Transcript::new();
        transcript.push(Role::User, "Hello");
        assert_eq!(
            serde_json::to_value(&transcript).unwrap(),
            serde_json::json!([{"role": "user", "content": "Hello"}])
        );
    }
}
