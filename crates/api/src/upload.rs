//! Multipart form collection and field parsing for upload endpoints.

use std::collections::HashMap;

use axum::extract::Multipart;
use campus_common::{AppError, AppResult};
use campus_db::entities::Visibility;
use chrono::{DateTime, NaiveDate, Utc};

/// A file part pulled out of a multipart body.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Multipart field name (`image`, `video`, `video_file`, ...).
    pub field: String,
    /// Client-supplied file name.
    pub file_name: String,
    /// Raw bytes.
    pub data: Vec<u8>,
}

/// A fully collected multipart form: text fields plus file parts.
#[derive(Debug, Default)]
pub struct CollectedForm {
    fields: HashMap<String, String>,
    files: Vec<FilePart>,
}

impl CollectedForm {
    /// Drain a multipart body into memory.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(file_name) = field.file_name() {
                let file_name = file_name.to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
                form.files.push(FilePart {
                    field: name,
                    file_name,
                    data: data.to_vec(),
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field: {e}")))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// A text field, if present and non-empty.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Remove and return the first file uploaded under a field name.
    pub fn take_file(&mut self, name: &str) -> Option<FilePart> {
        let idx = self.files.iter().position(|f| f.field == name)?;
        Some(self.files.remove(idx))
    }
}

/// Parse a boolean form field (`true`/`false`, `1`/`0`).
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "true" | "TRUE" | "True" | "1")
}

/// Parse a `show`/`hide` status field.
pub fn parse_status(value: &str) -> AppResult<Visibility> {
    match value.trim() {
        "show" => Ok(Visibility::Show),
        "hide" => Ok(Visibility::Hide),
        other => Err(AppError::BadRequest(format!("Invalid status: {other}"))),
    }
}

/// Parse a datetime field: RFC 3339, or a bare `YYYY-MM-DD` date taken as
/// midnight UTC.
pub fn parse_datetime(value: &str) -> AppResult<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        && let Some(dt) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(dt.and_utc());
    }

    Err(AppError::BadRequest(format!("Invalid date: {value}")))
}

/// Parse an integer form field.
pub fn parse_i32(value: &str) -> AppResult<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid number: {value}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
        assert!(!parse_bool("yes"));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("show").unwrap(), Visibility::Show);
        assert_eq!(parse_status(" hide ").unwrap(), Visibility::Hide);
        assert!(parse_status("visible").is_err());
    }

    #[test]
    fn test_parse_datetime_rfc3339() {
        let dt = parse_datetime("2025-06-01T10:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-01T10:30:00+00:00");
    }

    #[test]
    fn test_parse_datetime_bare_date() {
        let dt = parse_datetime("2025-06-01").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("yesterday").is_err());
    }
}
