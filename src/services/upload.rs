//! Image uploads for listings and avatars.

use crate::domain::listing::MAX_LISTING_IMAGES;
use crate::services::{ServiceError, ServiceResult};
use crate::storage::{ObjectStorage, object_name};

/// Per-image size limit.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// An image received from the client, fully buffered.
#[derive(Clone, Debug)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

fn check_image(image: &UploadedImage) -> ServiceResult<()> {
    if image.bytes.len() > MAX_IMAGE_BYTES {
        return Err(ServiceError::Form(
            "Image upload failed (2 mb max per image)".to_string(),
        ));
    }
    let is_image = image
        .content_type
        .as_deref()
        .is_some_and(|mime| mime.starts_with("image/"));
    if !is_image {
        return Err(ServiceError::Form(format!(
            "{} is not an image",
            image.file_name
        )));
    }
    Ok(())
}

/// Validates the batch, then stores every image and returns their URLs in
/// upload order. Nothing is stored when any image is rejected.
pub fn upload_images<S>(storage: &S, images: Vec<UploadedImage>) -> ServiceResult<Vec<String>>
where
    S: ObjectStorage + ?Sized,
{
    if images.is_empty() || images.len() > MAX_LISTING_IMAGES {
        return Err(ServiceError::Form(format!(
            "You can only upload between 1 and {MAX_LISTING_IMAGES} images per listing"
        )));
    }
    images.iter().try_for_each(check_image)?;

    let mut urls = Vec::with_capacity(images.len());
    for image in images {
        let name = object_name(&image.file_name);
        let url = storage
            .upload(&name, &image.bytes, &mut |progress| {
                log::debug!("Upload of {name} is {}% done", progress.percent());
            })
            .map_err(|err| {
                log::error!("Failed to store {}: {err}", image.file_name);
                ServiceError::Internal
            })?;
        urls.push(url);
    }
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::storage::{StorageError, UploadProgress};

    #[derive(Default)]
    struct MemoryStorage {
        stored: Mutex<Vec<String>>,
    }

    impl ObjectStorage for MemoryStorage {
        fn upload(
            &self,
            name: &str,
            data: &[u8],
            progress: &mut dyn FnMut(UploadProgress),
        ) -> Result<String, StorageError> {
            progress(UploadProgress {
                bytes_transferred: data.len() as u64,
                total_bytes: data.len() as u64,
            });
            self.stored.lock().unwrap().push(name.to_string());
            Ok(format!("memory://{name}"))
        }
    }

    fn png(name: &str, size: usize) -> UploadedImage {
        UploadedImage {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0; size],
        }
    }

    #[test]
    fn stores_images_in_order() {
        let storage = MemoryStorage::default();
        let urls = upload_images(&storage, vec![png("a.png", 10), png("b.png", 10)]).unwrap();

        assert_eq!(urls.len(), 2);
        assert!(urls[0].ends_with("-a.png"));
        assert!(urls[1].ends_with("-b.png"));
        assert_eq!(storage.stored.lock().unwrap().len(), 2);
    }

    #[test]
    fn too_many_images_are_rejected() {
        let storage = MemoryStorage::default();
        let images = (0..7).map(|i| png(&format!("{i}.png"), 1)).collect();

        assert!(matches!(
            upload_images(&storage, images),
            Err(ServiceError::Form(_))
        ));
        assert!(storage.stored.lock().unwrap().is_empty());
    }

    #[test]
    fn oversized_image_rejects_the_batch() {
        let storage = MemoryStorage::default();
        let images = vec![png("ok.png", 1), png("big.png", MAX_IMAGE_BYTES + 1)];

        let result = upload_images(&storage, images);
        assert!(
            matches!(result, Err(ServiceError::Form(message)) if message == "Image upload failed (2 mb max per image)")
        );
        assert!(storage.stored.lock().unwrap().is_empty());
    }

    #[test]
    fn non_images_are_rejected() {
        let storage = MemoryStorage::default();
        let mut doc = png("notes.txt", 1);
        doc.content_type = Some("text/plain".to_string());

        assert!(matches!(
            upload_images(&storage, vec![doc]),
            Err(ServiceError::Form(_))
        ));
    }
}
