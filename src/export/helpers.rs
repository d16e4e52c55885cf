use base64::Engine;
use std::fs;
use std::path::Path;

/// Image data with format metadata for export.
pub struct OptimizedImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

/// Re-encode raw image bytes as JPEG at `quality`. Falls back to the input
/// bytes (as PNG) when decoding or encoding fails.
pub fn to_jpeg(raw: &[u8], quality: u8) -> OptimizedImage {
    use image::ImageEncoder;
    if let Ok(img) = image::load_from_memory(raw) {
        // JPEG doesn't support alpha
        let rgb = img.to_rgb8();
        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
        if encoder
            .write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )
            .is_ok()
        {
            return OptimizedImage {
                bytes: buf.into_inner(),
                mime: "image/jpeg",
            };
        }
    }
    OptimizedImage {
        bytes: raw.to_vec(),
        mime: "image/png",
    }
}

/// Load a screenshot and return it as a `data:` URI, or `None` if the file
/// cannot be read.
pub fn load_image_data_uri(path: &Path, quality: u8) -> Option<String> {
    let raw = fs::read(path).ok()?;
    let img = to_jpeg(&raw, quality);
    Some(format!(
        "data:{};base64,{}",
        img.mime,
        base64::engine::general_purpose::STANDARD.encode(&img.bytes)
    ))
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn to_jpeg_reencodes_png() {
        let img = to_jpeg(&png_bytes(), 85);
        assert_eq!(img.mime, "image/jpeg");
        assert_eq!(&img.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn to_jpeg_falls_back_on_garbage() {
        let img = to_jpeg(b"not an image", 85);
        assert_eq!(img.mime, "image/png");
        assert_eq!(img.bytes, b"not an image");
    }

    #[test]
    fn data_uri_for_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        fs::write(&path, png_bytes()).unwrap();

        let uri = load_image_data_uri(&path, 70).unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
        assert!(load_image_data_uri(&dir.path().join("missing.png"), 70).is_none());
    }

    #[test]
    fn html_escape_special_chars() {
        assert_eq!(
            html_escape(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }
}
