use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::ical::{build_calendar, can_export, CALENDAR_MIME_TYPE};
use crate::model::tournament::Tournament;

/// Receives a finished file for the user.
pub trait FileSink {
    fn save(&mut self, filename: &str, mime_type: &str, content: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: String,
    pub content: String,
}

/// Keeps saved files in memory, e.g. to return them in a response.
#[derive(Debug, Clone, Default)]
pub struct Capture {
    pub files: Vec<Attachment>,
}

impl FileSink for Capture {
    fn save(&mut self, filename: &str, mime_type: &str, content: &str) -> Result<(), String> {
        self.files.push(Attachment {
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }
}

/// Writes saved files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }
}

impl FileSink for DirectorySink {
    fn save(&mut self, filename: &str, mime_type: &str, content: &str) -> Result<(), String> {
        // Keep the file inside the target directory.
        let name = filename.replace(['/', '\\'], "_");
        let path = self.dir.join(name);
        match fs::write(&path, content) {
            Ok(()) => {
                info!(path = %path.display(), mime_type, bytes = content.len(), "Saved file");
                Ok(())
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to save file");
                Err(format!("Failed to write {}: {}", path.display(), e))
            }
        }
    }
}

/// Build the tournament calendar and hand it to `sink` once.
///
/// Returns `Ok(false)` without touching the sink when no tournament has a
/// usable start date, since an empty calendar is never offered.
pub fn export_tournaments(
    sink: &mut dyn FileSink,
    tournaments: &[Tournament],
    schedule_title: Option<&str>,
    generated_at: DateTime<Utc>,
) -> Result<bool, String> {
    if !can_export(tournaments) {
        info!("No tournaments with a start date; export not offered");
        return Ok(false);
    }
    let export = build_calendar(tournaments, schedule_title, generated_at);
    sink.save(&export.filename, CALENDAR_MIME_TYPE, &export.document)?;
    Ok(true)
}
