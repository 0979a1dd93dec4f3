/// Grid thumbnails
///
/// Images are decoded and shrunk on a blocking thread, never upscaled.
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;
use tokio::task;

use crate::error::Result;
use crate::state::ImageRef;

/// Decoded, downscaled RGBA thumbnail ready for upload
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode `image` and shrink it to fit a `size` x `size` box.
/// Runs on a blocking thread because decoding is CPU-bound.
pub async fn load_thumbnail(image: ImageRef, size: u32) -> Result<Thumbnail> {
    task::spawn_blocking(move || load_thumbnail_blocking(image.path(), size)).await?
}

fn load_thumbnail_blocking(path: &Path, size: u32) -> Result<Thumbnail> {
    let img = image::open(path)?;
    let thumbnail = shrink_to_fit(img, size).to_rgba8();

    log::debug!(
        "thumbnail for {}: {}x{}",
        path.display(),
        thumbnail.width(),
        thumbnail.height()
    );

    Ok(Thumbnail {
        width: thumbnail.width(),
        height: thumbnail.height(),
        pixels: thumbnail.into_raw(),
    })
}

/// Downscale so the longest edge is at most `size`; never upscale.
fn shrink_to_fit(img: DynamicImage, size: u32) -> DynamicImage {
    if img.width() <= size && img.height() <= size {
        img
    } else {
        img.resize(size, size, FilterType::Triangle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn write_png(name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("image-gallery-thumb-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        ImageBuffer::from_pixel(width, height, Rgba([200u8, 10, 10, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[tokio::test]
    async fn test_thumbnail_keeps_aspect_ratio() {
        let path = write_png("wide.png", 400, 200);
        let thumb = load_thumbnail(ImageRef::new(path), 100).await.unwrap();

        assert_eq!((thumb.width, thumb.height), (100, 50));
        assert_eq!(thumb.pixels.len(), (100 * 50 * 4) as usize);
    }

    #[tokio::test]
    async fn test_small_images_are_not_upscaled() {
        let path = write_png("tiny.png", 20, 10);
        let thumb = load_thumbnail(ImageRef::new(path), 100).await.unwrap();

        assert_eq!((thumb.width, thumb.height), (20, 10));
    }

    #[tokio::test]
    async fn test_undecodable_file_is_an_error() {
        let dir = std::env::temp_dir().join(format!("image-gallery-thumb-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("garbage.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(load_thumbnail(ImageRef::new(path), 100).await.is_err());
    }
}
