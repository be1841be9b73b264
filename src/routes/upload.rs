use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use actix_web::{HttpResponse, Responder, post, web};

use crate::dto::api::UploadResponse;
use crate::models::auth::AuthenticatedUser;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::upload::{self as upload_service, UploadedImage};
use crate::storage::LocalObjectStorage;

/// Per-image size is checked against [`upload_service::MAX_IMAGE_BYTES`]
/// by the service; the multipart layer only bounds the whole request.
#[derive(MultipartForm)]
pub struct UploadImagesForm {
    pub images: Vec<TempFile>,
}

fn buffer(file: TempFile) -> std::io::Result<UploadedImage> {
    let bytes = std::fs::read(file.file.path())?;
    Ok(UploadedImage {
        file_name: file.file_name.unwrap_or_else(|| "image".to_string()),
        content_type: file.content_type.map(|mime| mime.essence_str().to_string()),
        bytes,
    })
}

#[post("/upload")]
pub async fn upload_images(
    _user: AuthenticatedUser,
    storage: web::Data<LocalObjectStorage>,
    MultipartForm(form): MultipartForm<UploadImagesForm>,
) -> impl Responder {
    let images = match form
        .images
        .into_iter()
        .map(buffer)
        .collect::<std::io::Result<Vec<_>>>()
    {
        Ok(images) => images,
        Err(err) => {
            log::error!("Failed to read uploaded file: {err}");
            return error_response(ServiceError::Internal);
        }
    };

    match upload_service::upload_images(storage.get_ref(), images) {
        Ok(urls) => HttpResponse::Ok().json(UploadResponse { urls }),
        Err(err) => error_response(err),
    }
}
