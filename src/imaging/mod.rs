//! Image decoding and tensor normalization.

mod decode;
mod normalize;

pub use decode::{SUPPORTED_FORMATS, decode_image};
pub use normalize::{NormalizedTensor, normalize};

use crate::constants::IMAGE_EXTENSIONS;
use std::path::Path;

/// Check whether an extension (without the dot) names a supported image type.
pub fn is_image_extension(extension: &str) -> bool {
    IMAGE_EXTENSIONS
        .iter()
        .any(|known| extension.eq_ignore_ascii_case(known))
}

/// Check if a file has a supported image extension.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(is_image_extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("photo.jpg")));
        assert!(is_image_file(Path::new("photo.JPEG")));
        assert!(is_image_file(Path::new("render.webp")));
        assert!(is_image_file(Path::new("scan.png")));
        assert!(!is_image_file(Path::new("clip.mp4")));
        assert!(!is_image_file(Path::new("README")));
    }

    #[test]
    fn test_is_image_file_with_unicode() {
        assert!(is_image_file(Path::new("kuva_äöå.jpg")));
        assert!(is_image_file(Path::new("写真.png")));
    }
}
