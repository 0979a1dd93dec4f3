/// Full-resolution image loading for the detail viewer
///
/// The image is decoded once into RGBA on a blocking thread; the viewer keeps
/// the pixels in a renderer handle and scales them on the GPU while zooming.
use std::path::Path;
use tokio::task;

use crate::error::Result;
use crate::state::ImageRef;

/// Decoded image and its pixel size
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode `image` at full resolution
pub async fn load_full(image: ImageRef) -> Result<LoadedImage> {
    task::spawn_blocking(move || load_full_blocking(image.path())).await?
}

fn load_full_blocking(path: &Path) -> Result<LoadedImage> {
    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();

    log::info!("loaded {} ({}x{})", path.display(), width, height);

    Ok(LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_full_keeps_resolution() {
        let dir = std::env::temp_dir().join(format!("image-gallery-load-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("big.png");
        image::RgbaImage::from_pixel(640, 480, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let loaded = load_full(ImageRef::new(path)).await.unwrap();
        assert_eq!((loaded.width, loaded.height), (640, 480));
        assert_eq!(loaded.pixels.len(), 640 * 480 * 4);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let result = load_full(ImageRef::new("/nonexistent/path.png")).await;
        assert!(result.is_err());
    }
}
