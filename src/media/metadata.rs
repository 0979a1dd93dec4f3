/// Display name and size lookup for a picked image
use crate::state::{ImageInfo, ImageRef};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Format a byte count the way the viewer caption shows it.
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

/// Resolve the caption for `image`.
///
/// Never fails: a missing or unreadable file degrades to an empty size label,
/// and the name falls back to the last path segment.
pub async fn resolve(image: ImageRef) -> ImageInfo {
    let display_name = image.display_fallback();

    let size_label = match tokio::fs::metadata(image.path()).await {
        Ok(meta) if meta.is_file() => format_size(meta.len()),
        Ok(_) => {
            log::debug!("{} is not a regular file, no size shown", image);
            String::new()
        }
        Err(e) => {
            log::debug!("metadata lookup failed for {}: {}", image, e);
            String::new()
        }
    };

    ImageInfo {
        display_name,
        size_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5_242_880), "5.0 MB");
    }

    #[tokio::test]
    async fn test_resolve_existing_file() {
        let dir = std::env::temp_dir().join(format!("image-gallery-meta-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sunset.jpg");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let info = resolve(ImageRef::new(&path)).await;
        assert_eq!(info.display_name, "sunset.jpg");
        assert_eq!(info.size_label, "2.0 KB");
    }

    #[tokio::test]
    async fn test_resolve_missing_file_degrades_to_empty_label() {
        let info = resolve(ImageRef::new("/definitely/not/here/photo.png")).await;
        assert_eq!(info.display_name, "photo.png");
        assert!(info.size_label.is_empty());
    }
}
