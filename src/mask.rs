use crate::{
    assets::SilhouetteImage,
    error::{MorphError, MorphResult},
};

/// Square grid of 8-bit alpha, built once per silhouette by letterboxing the
/// source image's alpha channel into a `size` x `size` canvas. Immutable
/// after creation.
#[derive(Clone, Debug)]
pub struct AlphaMask {
    size: u32,
    data: Vec<u8>,
}

impl AlphaMask {
    /// Letterbox `img` into the square canvas, preserving aspect ratio and
    /// centering. Pixels outside the drawn region stay fully transparent.
    /// Resampling uses a triangle filter, so thin antialiased strokes keep
    /// fractional alpha instead of dropping out.
    pub fn from_silhouette(img: &SilhouetteImage, size: u32) -> MorphResult<Self> {
        if size == 0 {
            return Err(MorphError::validation("mask size must be > 0"));
        }
        let expected = (img.width as usize) * (img.height as usize) * 4;
        if img.width == 0 || img.height == 0 || img.rgba.len() != expected {
            return Err(MorphError::validation(
                "silhouette dimensions do not match its pixel buffer",
            ));
        }

        let alpha: Vec<u8> = img.rgba.iter().skip(3).step_by(4).copied().collect();
        let gray = image::GrayImage::from_raw(img.width, img.height, alpha)
            .ok_or_else(|| MorphError::validation("alpha plane does not fit its dimensions"))?;

        let r = (size as f32 / img.width as f32).min(size as f32 / img.height as f32);
        let w = ((img.width as f32 * r).round() as u32).clamp(1, size);
        let h = ((img.height as f32 * r).round() as u32).clamp(1, size);
        let x0 = (size - w) / 2;
        let y0 = (size - h) / 2;

        let scaled = image::imageops::resize(&gray, w, h, image::imageops::FilterType::Triangle);

        let mut data = vec![0u8; (size as usize) * (size as usize)];
        for y in 0..h {
            let row = ((y0 + y) as usize) * (size as usize) + x0 as usize;
            for x in 0..w {
                data[row + x as usize] = scaled.get_pixel(x, y).0[0];
            }
        }

        Ok(Self { size, data })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.data[(y as usize) * (self.size as usize) + x as usize]
    }

    /// Maximum alpha over the 3x3 neighborhood of `(x, y)`, clipped at mask
    /// edges. The dilation keeps sparse antialiased strokes emitting points.
    pub fn neighborhood_max(&self, x: u32, y: u32) -> u8 {
        let size = i64::from(self.size);
        let mut max = 0u8;
        for oy in -1..=1i64 {
            let sy = i64::from(y) + oy;
            if sy < 0 || sy >= size {
                continue;
            }
            for ox in -1..=1i64 {
                let sx = i64::from(x) + ox;
                if sx < 0 || sx >= size {
                    continue;
                }
                let v = self.data[(sy * size + sx) as usize];
                if v > max {
                    max = v;
                }
            }
        }
        max
    }
}
