use std::path::Path;

use anyhow::Context as _;

use crate::error::{MorphError, MorphResult};

/// A decoded silhouette: straight RGBA8 pixels with known dimensions. Only
/// the alpha channel drives point sampling.
#[derive(Clone, Debug)]
pub struct SilhouetteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode a raster image. Failure names the offending asset and aborts
/// initialization; there is no fallback silhouette.
pub fn decode_image(name: &str, bytes: &[u8]) -> MorphResult<SilhouetteImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| MorphError::asset(format!("decode image '{name}': {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(SilhouetteImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Rasterize an SVG silhouette into RGBA8, scaled to fit `target_size`
/// preserving aspect ratio. The pixmap alpha is what sampling reads, so a
/// target near the sample grid size avoids resampling the mask twice.
pub fn render_svg(name: &str, bytes: &[u8], target_size: u32) -> MorphResult<SilhouetteImage> {
    if target_size == 0 {
        return Err(MorphError::validation("svg raster size must be > 0"));
    }

    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| MorphError::asset(format!("parse svg '{name}': {e}")))?;

    let size = tree.size();
    if !size.width().is_finite() || size.width() <= 0.0 || size.height() <= 0.0 {
        return Err(MorphError::asset(format!(
            "svg '{name}' has invalid width/height"
        )));
    }

    let r = (target_size as f32 / size.width()).min(target_size as f32 / size.height());
    let width = (size.width() * r).round().max(1.0) as u32;
    let height = (size.height() * r).round().max(1.0) as u32;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| MorphError::asset(format!("allocate pixmap for svg '{name}'")))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    Ok(SilhouetteImage {
        width,
        height,
        rgba: pixmap.take(),
    })
}

/// Read a silhouette from disk, dispatching on the `svg` extension. All IO is
/// front-loaded here; nothing downstream of construction touches the disk.
pub fn load_silhouette(path: &Path, sample_size: u32) -> MorphResult<SilhouetteImage> {
    let name = path.display().to_string();
    let bytes = std::fs::read(path).with_context(|| format!("read silhouette '{name}'"))?;

    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    if is_svg {
        render_svg(&name, &bytes, sample_size)
    } else {
        decode_image(&name, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decode_image_keeps_alpha() {
        let img = image::RgbaImage::from_raw(1, 1, vec![100, 50, 200, 128]).unwrap();
        let decoded = decode_image("probe.png", &png_bytes(img)).unwrap();
        assert_eq!(decoded.width, 1);
        assert_eq!(decoded.height, 1);
        assert_eq!(decoded.rgba[3], 128);
    }

    #[test]
    fn decode_failure_names_the_asset() {
        let err = decode_image("logo-a.png", b"not an image").unwrap_err();
        assert!(err.to_string().contains("logo-a.png"));
    }

    #[test]
    fn render_svg_fits_target_preserving_aspect() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="1"></svg>"#;
        let img = render_svg("wide.svg", svg, 512).unwrap();
        assert_eq!((img.width, img.height), (512, 256));
        assert_eq!(img.rgba.len(), 512 * 256 * 4);
    }

    #[test]
    fn render_svg_rejects_malformed_input() {
        let err = render_svg("bad.svg", br#"<svg"#, 512).unwrap_err();
        assert!(err.to_string().contains("bad.svg"));
    }
}
