use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::SessionSnapshot;
use crate::interview::CandidateField;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to serialize session to JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write session CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// Column order of the flattened CSV row.
pub const CSV_HEADERS: [&str; 11] = [
    "timestamp",
    "session_id",
    "name",
    "email",
    "phone",
    "experience",
    "position",
    "location",
    "tech_stack",
    "total_messages",
    "questions_count",
];

/// Pretty-printed UTF-8 JSON. Non-ASCII text is written as-is.
pub fn export_to_json(snapshot: &SessionSnapshot) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Bare header row followed by one fully quoted data row.
pub fn export_to_csv(snapshot: &SessionSnapshot) -> Result<String, ExportError> {
    let field = |f: CandidateField| snapshot.candidate_info.get(f).unwrap_or_default().to_string();
    let row = [
        snapshot.timestamp.clone(),
        snapshot.session_id.clone(),
        field(CandidateField::Name),
        field(CandidateField::Email),
        field(CandidateField::Phone),
        field(CandidateField::Experience),
        field(CandidateField::Position),
        field(CandidateField::Location),
        snapshot.tech_stack.joined(", "),
        snapshot.conversation_summary.total_messages.to_string(),
        snapshot.conversation_summary.questions_count.to_string(),
    ];

    let mut buf = Vec::new();
    {
        let mut header = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut buf);
        header.write_record(CSV_HEADERS)?;
        header.flush()?;
    }
    {
        let mut data = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut buf);
        data.write_record(&row)?;
        data.flush()?;
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// `talent_scout_session_YYYYMMDD_HHMMSS.<ext>`, stamped from the snapshot.
pub fn export_file_name(snapshot: &SessionSnapshot, extension: &str) -> String {
    format!("talent_scout_{}.{}", snapshot.session_id, extension)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// Writes both export formats into `dir`.
pub fn write_exports(dir: &Path, snapshot: &SessionSnapshot) -> Result<ExportPaths, ExportError> {
    let json_path = dir.join(export_file_name(snapshot, "json"));
    let csv_path = dir.join(export_file_name(snapshot, "csv"));

    fs::write(&json_path, export_to_json(snapshot)?)?;
    fs::write(&csv_path, export_to_csv(snapshot)?)?;

    info!("💾 Exported {} to {}", snapshot.session_id, dir.display());
    Ok(ExportPaths { json: json_path, csv: csv_path })
}
