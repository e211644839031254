//! Multipart form reading and stored-file downloads

use axum::{
    extract::Multipart,
    http::header,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::io::ErrorKind;

use crate::common::FormData;
use crate::kernel::{sanitize_file_name, FileStore, StorageError, StoredFile, Upload};
use crate::server::error::AppError;

/// A multipart body split into text fields and file parts
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: FormData,
    pub files: HashMap<String, Upload>,
}

impl MultipartForm {
    /// The named file part, unless the input was left empty
    pub fn file(&self, name: &str) -> Option<&Upload> {
        self.files.get(name).filter(|u| !u.is_blank())
    }
}

pub async fn read_multipart(mut multipart: Multipart) -> Result<MultipartForm, AppError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                form.files.insert(
                    name,
                    Upload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                );
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

/// Respond with a stored file as an attachment
pub async fn download(files: &FileStore, file: &StoredFile) -> Result<Response, AppError> {
    let bytes = match files.read(&file.storage_key).await {
        Ok(bytes) => bytes,
        Err(StorageError::InvalidKey(_)) => return Err(AppError::NotFound),
        Err(StorageError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(storage_key = %file.storage_key, "Stored file is missing on disk");
            return Err(AppError::NotFound);
        }
        Err(e) => return Err(AppError::Internal(e.into())),
    };

    // Header values must be visible ASCII.
    let filename: String = sanitize_file_name(&file.original_name)
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .collect();
    let disposition = format!("attachment; filename=\"{filename}\"");

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.clone()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
