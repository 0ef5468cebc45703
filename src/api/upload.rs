use std::collections::HashMap;

use actix_multipart::Multipart;
use futures_util::StreamExt;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// A file part of a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Text fields and file parts of a multipart form, by field name.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
}

impl UploadForm {
    /// Trimmed text field; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn take_file(&mut self, name: &str) -> AppResult<UploadedFile> {
        self.files
            .remove(name)
            .ok_or_else(|| AppError::BadRequest(format!("Missing multipart field `{name}`")))
    }
}

/// Buffer the whole form. Parts with a filename are files, the rest text.
/// The combined size may not exceed `max_bytes`.
pub async fn read_form(mut payload: Multipart, max_bytes: usize) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();
    let mut total = 0usize;

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?;

        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?;
            total += chunk.len();
            if total > max_bytes {
                return Err(AppError::BadRequest(format!(
                    "Upload exceeds the {max_bytes} byte limit"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        debug!(field = %name, size = bytes.len(), file = ?file_name, "Read multipart field");

        match file_name {
            Some(_) => {
                form.files.insert(
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    },
                );
            }
            None => {
                let text = String::from_utf8(bytes).map_err(|_| {
                    AppError::BadRequest(format!("Field `{name}` is not valid UTF-8"))
                })?;
                form.fields.insert(name, text);
            }
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_fields_count_as_absent() {
        let mut form = UploadForm::default();
        form.fields.insert("name".into(), "  Salary 2025 ".into());
        form.fields.insert("description".into(), "   ".into());
        assert_eq!(form.text("name").as_deref(), Some("Salary 2025"));
        assert_eq!(form.text("description"), None);
        assert!(matches!(form.take_file("file"), Err(AppError::BadRequest(_))));
    }
}
