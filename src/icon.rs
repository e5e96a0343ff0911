//! # Set Icon Loading
//!
//! Loads the optional user-supplied set icon and composites it into the
//! icon slot next to the type line.
//!
//! Accepted sources, sniffed in order: a `data:image/...;base64,` URI, or
//! a file path. PNG and JPEG payloads are decoded with the `image` crate
//! and converted to a premultiplied tiny-skia pixmap once, at startup.

use crate::error::ProxyError;
use crate::geometry::ICON_SIZE;
use base64::Engine;
use tiny_skia::{IntSize, Pixmap, PixmapPaint, Transform};

#[derive(Debug)]
pub struct SetIcon {
    pixmap: Pixmap,
}

impl SetIcon {
    pub fn load(source: &str) -> Result<SetIcon, ProxyError> {
        let bytes = read_source_bytes(source)?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| ProxyError::Icon(format!("cannot decode '{}': {}", source, e)))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut data = rgba.into_raw();
        // tiny-skia wants premultiplied alpha.
        for pixel in data.chunks_exact_mut(4) {
            let a = pixel[3] as u16;
            pixel[0] = (pixel[0] as u16 * a / 255) as u8;
            pixel[1] = (pixel[1] as u16 * a / 255) as u8;
            pixel[2] = (pixel[2] as u16 * a / 255) as u8;
        }
        let size = IntSize::from_wh(width, height)
            .ok_or_else(|| ProxyError::Icon(format!("empty image '{}'", source)))?;
        let pixmap = Pixmap::from_vec(data, size)
            .ok_or_else(|| ProxyError::Icon(format!("cannot read pixels of '{}'", source)))?;
        Ok(SetIcon { pixmap })
    }

    /// Paste the icon scaled into its fixed box, centered on `center`,
    /// under the face transform.
    pub fn paste(&self, target: &mut Pixmap, face_transform: Transform, center: (i32, i32)) {
        let w = self.pixmap.width() as f32;
        let h = self.pixmap.height() as f32;
        let scale = (ICON_SIZE as f32 / w).min(ICON_SIZE as f32 / h).min(1.0);
        let (scaled_w, scaled_h) = (w * scale, h * scale);
        let x = center.0 as f32 - scaled_w / 2.0;
        let y = center.1 as f32 - scaled_h / 2.0;

        let transform = face_transform
            .pre_concat(Transform::from_translate(x, y))
            .pre_concat(Transform::from_scale(scale, scale));
        let paint = PixmapPaint {
            quality: tiny_skia::FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        target.draw_pixmap(0, 0, self.pixmap.as_ref(), &paint, transform, None);
    }
}

fn read_source_bytes(source: &str) -> Result<Vec<u8>, ProxyError> {
    if source.starts_with("data:image/") {
        let comma = source
            .find(',')
            .ok_or_else(|| ProxyError::Icon("invalid data URI: missing comma".to_string()))?;
        return base64::engine::general_purpose::STANDARD
            .decode(&source[comma + 1..])
            .map_err(|e| ProxyError::Icon(format!("base64 decode error: {}", e)));
    }
    std::fs::read(source)
        .map_err(|e| ProxyError::Icon(format!("cannot read '{}': {}", source, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid 1x1 red PNG.
    fn tiny_png() -> Vec<u8> {
        let mut buffer = Vec::new();
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 0, 255]));
        image::DynamicImage::ImageRgba8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut buffer),
                image::ImageOutputFormat::Png,
            )
            .unwrap();
        buffer
    }

    #[test]
    fn loads_from_a_data_uri() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(tiny_png());
        let icon = SetIcon::load(&format!("data:image/png;base64,{}", encoded)).unwrap();
        assert_eq!(icon.pixmap.width(), 1);
    }

    #[test]
    fn rejects_garbage() {
        let err = SetIcon::load("data:image/png;base64,!!!").unwrap_err();
        assert!(matches!(err, ProxyError::Icon(_)));
    }

    #[test]
    fn paste_lands_inside_the_icon_box() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(tiny_png());
        let icon = SetIcon::load(&format!("data:image/png;base64,{}", encoded)).unwrap();
        let mut target = Pixmap::new(100, 100).unwrap();
        icon.paste(&mut target, Transform::identity(), (50, 50));
        let ix = (50 * 100 + 50) * 4;
        let data = target.data();
        assert!(data[ix] > 0, "red pixel pasted at the center");
    }
}
