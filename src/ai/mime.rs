use base64::Engine as _;

/// Sniff the image type from magic bytes. Camera captures are JPEG, so that
/// is the fallback for anything unrecognised.
pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        [0x47, 0x49, 0x46, 0x38, ..] => "image/gif",
        _ => {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?}), sending as image/jpeg",
                &bytes[..bytes.len().min(4)]
            );
            "image/jpeg"
        }
    }
}

/// Encode raw image bytes as a `data:` URL for multimodal chat input.
pub fn image_data_url(bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", detect_image_mime(bytes), encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        assert_eq!(
            detect_image_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            "image/png"
        );
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(detect_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
    }

    #[test]
    fn test_detect_webp() {
        assert_eq!(
            detect_image_mime(&[
                0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50
            ]),
            "image/webp"
        );
    }

    #[test]
    fn test_detect_gif() {
        assert_eq!(detect_image_mime(b"GIF89a"), "image/gif");
    }

    #[test]
    fn test_unknown_falls_back_to_jpeg() {
        assert_eq!(detect_image_mime(&[0x00, 0x01, 0x02, 0x03]), "image/jpeg");
    }

    #[test]
    fn test_data_url_encodes_payload() {
        assert_eq!(
            image_data_url(&[0xFF, 0xD8, 0xFF]),
            "data:image/jpeg;base64,/9j/"
        );
    }
}
