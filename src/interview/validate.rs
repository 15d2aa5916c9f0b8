use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::num::IntErrorKind;

use super::candidate::{CandidateField, CandidateRecord};

static STRICT_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

static STRICT_PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3}[-.]?\d{3}[-.]?\d{4}$").unwrap());

const MAX_EXPERIENCE_YEARS: i64 = 50;

/// Advisory result of checking a candidate record. Warnings never block
/// progression.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_complete: bool,
    pub missing_fields: Vec<CandidateField>,
    pub warnings: Vec<String>,
}

pub fn validate_candidate_info(record: &CandidateRecord, required: &[CandidateField]) -> ValidationReport {
    let missing_fields: Vec<CandidateField> = required
        .iter()
        .copied()
        .filter(|field| !record.has(*field))
        .collect();

    let mut warnings = Vec::new();

    if let Some(email) = record.get(CandidateField::Email).filter(|v| !v.is_empty()) {
        if !STRICT_EMAIL.is_match(email) {
            warnings.push("Invalid email format".to_string());
        }
    }

    if let Some(phone) = record.get(CandidateField::Phone).filter(|v| !v.is_empty()) {
        if !STRICT_PHONE.is_match(phone) {
            warnings.push("Invalid phone format".to_string());
        }
    }

    if let Some(experience) = record.get(CandidateField::Experience).filter(|v| !v.is_empty()) {
        match experience.trim().parse::<i64>() {
            Ok(years) if !(0..=MAX_EXPERIENCE_YEARS).contains(&years) => {
                warnings.push("Experience years seem unrealistic".to_string());
            }
            Ok(_) => {}
            // Too many digits for i64 is still a number, just a huge one.
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                warnings.push("Experience years seem unrealistic".to_string());
            }
            Err(_) => warnings.push("Experience should be a number".to_string()),
        }
    }

    ValidationReport {
        is_complete: missing_fields.is_empty(),
        missing_fields,
        warnings,
    }
}
