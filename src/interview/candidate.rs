use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the structured fields pulled out of candidate utterances.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CandidateField {
    Name,
    Email,
    Phone,
    Experience,
    Position,
    Location,
}

impl CandidateField {
    pub const ALL: [CandidateField; 6] = [
        CandidateField::Name,
        CandidateField::Email,
        CandidateField::Phone,
        CandidateField::Experience,
        CandidateField::Position,
        CandidateField::Location,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateField::Name => "name",
            CandidateField::Email => "email",
            CandidateField::Phone => "phone",
            CandidateField::Experience => "experience",
            CandidateField::Position => "position",
            CandidateField::Location => "location",
        }
    }
}

impl fmt::Display for CandidateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name -> extracted value. Values are only ever set or overwritten,
/// never removed.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct CandidateRecord {
    fields: IndexMap<CandidateField, String>,
}

impl CandidateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` for `field`. Empty values are ignored so a field that
    /// was present stays present.
    pub fn set(&mut self, field: CandidateField, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        self.fields.insert(field, value);
        true
    }

    pub fn get(&self, field: CandidateField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Present and non-empty.
    pub fn has(&self, field: CandidateField) -> bool {
        self.get(field).map_or(false, |v| !v.is_empty())
    }

    pub fn has_all(&self, required: &[CandidateField]) -> bool {
        required.iter().all(|field| self.has(*field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CandidateField, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Field names only, for log lines.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.keys().map(CandidateField::as_str).collect()
    }
}

impl FromIterator<(CandidateField, String)> for CandidateRecord {
    fn from_iter<T: IntoIterator<Item = (CandidateField, String)>>(iter: T) -> Self {
        let mut record = CandidateRecord::new();
        for (field, value) in iter {
            record.set(field, value);
        }
        record
    }
}
