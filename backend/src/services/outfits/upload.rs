use crate::error::{AppError, Result};
use crate::naming::{display_timestamp, extension_of, stamped_name, stored_name};
use crate::state::{AppState, UploadDir};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use common::model::outfit::OutfitRecord;
use common::responses::MessageResponse;
use futures_util::StreamExt;
use log::{info, warn};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

/// Name of the multipart field that carries the image.
const IMAGE_FIELD: &str = "image";

/// An image read completely from the request, not yet validated.
struct ImagePart {
    filename: String,
    bytes: Vec<u8>,
}

/// HTTP handler for `POST /upload`.
///
/// - On success: `200 OK` with `{"message": "Uploaded successfully!"}`.
/// - On failure: `400` for invalid input, `500` otherwise, with `{"error"}`.
pub async fn process(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
    let record = upload_outfit(&state, payload).await?;
    info!("Stored outfit {}", record.filename);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Uploaded successfully!")))
}

/// Reads, validates and stores one uploaded image, then appends its record.
///
/// Every check runs before anything touches the disk, so a rejected upload
/// leaves no file and no record behind.
pub async fn upload_outfit(state: &AppState, payload: Multipart) -> Result<OutfitRecord> {
    let part = read_image_part(payload, state.uploads.max_bytes).await?;
    let (part, ext) = validate(&state.uploads, part)?;

    let (filename, path) = write_image(&state.uploads, &part.filename, &ext, &part.bytes)?;
    let record = OutfitRecord::uploaded(filename, display_timestamp());

    let _guard = state.records_lock.write().await;
    let appended = state.store.load().and_then(|mut records| {
        records.push(record.clone());
        state.store.save(&records)
    });
    if let Err(e) = appended {
        if let Err(cleanup) = fs::remove_file(&path) {
            warn!("Could not remove {} after failed upload: {}", path.display(), cleanup);
        }
        return Err(e);
    }

    Ok(record)
}

/// Collects the `image` field. Other fields are drained and ignored.
async fn read_image_part(mut payload: Multipart, max_bytes: usize) -> Result<Option<ImagePart>> {
    let mut image: Option<ImagePart> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::Upload(e.to_string()))?;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if field_name.as_deref() != Some(IMAGE_FIELD) || image.is_some() {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| AppError::Upload(e.to_string()))?;
            }
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::Upload(e.to_string()))?;
            if bytes.len() + chunk.len() > max_bytes {
                return Err(AppError::validation(format!(
                    "Image exceeds the {} byte upload limit",
                    max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        image = Some(ImagePart { filename, bytes });
    }

    Ok(image)
}

/// Applies the upload rules in order; yields the part and its lowercased
/// extension.
fn validate(uploads: &UploadDir, part: Option<ImagePart>) -> Result<(ImagePart, String)> {
    let part = part.ok_or_else(|| AppError::validation("No image uploaded"))?;
    if part.filename.is_empty() {
        return Err(AppError::validation("Empty filename"));
    }
    if part.bytes.is_empty() {
        return Err(AppError::validation("Empty image payload"));
    }
    match extension_of(&part.filename) {
        Some(ext) if uploads.is_allowed_extension(&ext) => Ok((part, ext)),
        _ => Err(AppError::validation("Invalid file type")),
    }
}

/// Writes the bytes under a fresh stamped name and returns that name.
///
/// The file is opened with `create_new`, so a name left over from an earlier
/// run is never overwritten; the next stamp is tried instead.
fn write_image(
    uploads: &UploadDir,
    original: &str,
    ext: &str,
    bytes: &[u8],
) -> Result<(String, PathBuf)> {
    let stored = stored_name(original, ext);
    loop {
        let filename = stamped_name(uploads.stamps.next(), &stored);
        let path = uploads.dir.join(&filename);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(AppError::persistence(
                    format!("Failed to save {}", path.display()),
                    e,
                ))
            }
        };
        if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
            let _ = fs::remove_file(&path);
            return Err(AppError::persistence(
                format!("Failed to save {}", path.display()),
                e,
            ));
        }
        return Ok((filename, path));
    }
}
