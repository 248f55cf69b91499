//! The crate's configuration surface: compile-time constants mirroring the
//! reference visual, and the parameter structs that default to them. Nothing
//! here is parsed at runtime; embedders construct the structs directly.

use crate::{
    ease::Ease,
    error::{MorphError, MorphResult},
};

/// Fixed number of points in every cloud buffer.
pub const PARTICLE_COUNT: usize = 15_000;

/// Side of the square working canvas the silhouette is letterboxed into.
pub const SAMPLE_SIZE: u32 = 512;

/// Grid stride in mask pixels when walking for candidate points.
pub const SAMPLE_STEP: u32 = 2;

/// Cells whose 3x3 neighborhood max alpha is <= this are rejected.
pub const ALPHA_THRESHOLD: u8 = 6;

/// Per-axis jitter applied to accepted cells, in mask pixels.
pub const JITTER_RADIUS_PX: f32 = 0.85;

/// Shrink factor on normalized coordinates, leaving a margin at the edges.
pub const OUTPUT_SCALE: f32 = 0.96;

/// Base point sprite size before per-point jitter and depth attenuation.
pub const POINT_SIZE: f32 = 0.015;

/// Magnitude of the flow displacement field.
pub const SPREAD: f32 = 0.26;

/// Fraction of points given the energetic secondary "dust" motion.
pub const DUST_RATIO: f32 = 0.12;

/// Scroll ratio at which the morph begins.
pub const MORPH_START_RATIO: f64 = 0.72;

/// Scroll ratio window over which the morph completes.
pub const MORPH_RANGE_RATIO: f64 = 0.5;

/// Vertical anchor at scroll 0.
pub const BASE_Y_START: f64 = -0.4;

/// Vertical anchor at full scroll.
pub const BASE_Y_END: f64 = 1.8;

/// Extra vertical offset blended in as the morph progresses.
pub const MORPH_DROP_Y: f64 = -1.2;

/// Rate constant of the scroll low-pass filter (1/seconds).
pub const SCROLL_SMOOTHING: f64 = 2.6;

/// Rate constant of the morph low-pass filter (1/seconds).
pub const MORPH_SMOOTHING: f64 = 2.4;

/// Raw scroll offset at which the progress ramp starts.
pub const SCROLL_START: f64 = 0.0;

/// Scroll distance over which progress reaches 1, in viewport heights.
pub const SCROLL_RANGE_VIEWPORTS: f64 = 2.4;

/// Viewport height assumed when none is supplied.
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 1080.0;

/// Clear color behind the cloud.
pub const BACKGROUND_COLOR: [f32; 3] = rgb(0x02030A);

/// Base color of every point before per-point shading.
pub const GRAIN_COLOR: [f32; 3] = rgb(0x33D8FF);

const fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

/// How a silhouette image is turned into a raw point set.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct ShapeSampleConfig {
    pub size: u32,
    pub step: u32,
    pub alpha_threshold: u8,
    pub jitter_radius: f32,
    pub output_scale: f32,
}

impl Default for ShapeSampleConfig {
    fn default() -> Self {
        Self {
            size: SAMPLE_SIZE,
            step: SAMPLE_STEP,
            alpha_threshold: ALPHA_THRESHOLD,
            jitter_radius: JITTER_RADIUS_PX,
            output_scale: OUTPUT_SCALE,
        }
    }
}

impl ShapeSampleConfig {
    pub fn validate(&self) -> MorphResult<()> {
        if self.size == 0 {
            return Err(MorphError::validation("sample size must be > 0"));
        }
        if self.step == 0 || self.step > self.size {
            return Err(MorphError::validation(
                "sample step must be in 1..=size",
            ));
        }
        if !self.jitter_radius.is_finite() || self.jitter_radius < 0.0 {
            return Err(MorphError::validation("jitter radius must be >= 0"));
        }
        if !self.output_scale.is_finite() || self.output_scale <= 0.0 {
            return Err(MorphError::validation("output scale must be > 0"));
        }
        Ok(())
    }
}

/// How the raw scroll signal maps to filtered progress and vertical motion.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct AnimationParams {
    pub scroll_start: f64,
    pub scroll_range: f64,
    pub scroll_smoothing: f64,
    pub morph_smoothing: f64,
    pub morph_start_ratio: f64,
    pub morph_range_ratio: f64,
    pub morph_ease: Ease,
    pub base_y_start: f64,
    pub base_y_end: f64,
    pub drop_y: f64,
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self::for_viewport(DEFAULT_VIEWPORT_HEIGHT)
    }
}

impl AnimationParams {
    /// Defaults with the scroll range derived from the given viewport height.
    pub fn for_viewport(viewport_height: f64) -> Self {
        Self {
            scroll_start: SCROLL_START,
            scroll_range: SCROLL_RANGE_VIEWPORTS * viewport_height,
            scroll_smoothing: SCROLL_SMOOTHING,
            morph_smoothing: MORPH_SMOOTHING,
            morph_start_ratio: MORPH_START_RATIO,
            morph_range_ratio: MORPH_RANGE_RATIO,
            morph_ease: Ease::OutCubic,
            base_y_start: BASE_Y_START,
            base_y_end: BASE_Y_END,
            drop_y: MORPH_DROP_Y,
        }
    }

    pub fn validate(&self) -> MorphResult<()> {
        if !self.scroll_range.is_finite() || self.scroll_range <= 0.0 {
            return Err(MorphError::validation("scroll range must be > 0"));
        }
        if !self.scroll_start.is_finite() {
            return Err(MorphError::validation("scroll start must be finite"));
        }
        if !self.scroll_smoothing.is_finite() || self.scroll_smoothing <= 0.0 {
            return Err(MorphError::validation("scroll smoothing must be > 0"));
        }
        if !self.morph_smoothing.is_finite() || self.morph_smoothing <= 0.0 {
            return Err(MorphError::validation("morph smoothing must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.morph_start_ratio) {
            return Err(MorphError::validation(
                "morph start ratio must be in [0, 1]",
            ));
        }
        if !self.morph_range_ratio.is_finite() || self.morph_range_ratio <= 0.0 {
            return Err(MorphError::validation("morph range ratio must be > 0"));
        }
        for v in [self.base_y_start, self.base_y_end, self.drop_y] {
            if !v.is_finite() {
                return Err(MorphError::validation(
                    "vertical anchors must be finite",
                ));
            }
        }
        Ok(())
    }
}

/// Scalar inputs of the displacement and shading model.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct FlowParams {
    pub spread: f32,
    pub dust_ratio: f32,
    pub point_size: f32,
    pub base_color: [f32; 3],
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            spread: SPREAD,
            dust_ratio: DUST_RATIO,
            point_size: POINT_SIZE,
            base_color: GRAIN_COLOR,
        }
    }
}

impl FlowParams {
    pub fn validate(&self) -> MorphResult<()> {
        if !self.spread.is_finite() || self.spread < 0.0 {
            return Err(MorphError::validation("spread must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.dust_ratio) {
            return Err(MorphError::validation("dust ratio must be in [0, 1]"));
        }
        if !self.point_size.is_finite() || self.point_size <= 0.0 {
            return Err(MorphError::validation("point size must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        ShapeSampleConfig::default().validate().unwrap();
        AnimationParams::default().validate().unwrap();
        FlowParams::default().validate().unwrap();
    }

    #[test]
    fn for_viewport_scales_scroll_range() {
        let p = AnimationParams::for_viewport(800.0);
        assert_eq!(p.scroll_range, 2.4 * 800.0);
    }

    #[test]
    fn validate_rejects_bad_sample_config() {
        let mut cfg = ShapeSampleConfig::default();
        cfg.step = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ShapeSampleConfig::default();
        cfg.step = cfg.size + 1;
        assert!(cfg.validate().is_err());

        let mut cfg = ShapeSampleConfig::default();
        cfg.jitter_radius = f32::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_animation_params() {
        let mut p = AnimationParams::default();
        p.scroll_range = 0.0;
        assert!(p.validate().is_err());

        let mut p = AnimationParams::default();
        p.morph_range_ratio = -0.5;
        assert!(p.validate().is_err());

        let mut p = AnimationParams::default();
        p.morph_start_ratio = 1.5;
        assert!(p.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_flow_params() {
        let mut p = FlowParams::default();
        p.dust_ratio = 2.0;
        assert!(p.validate().is_err());

        let mut p = FlowParams::default();
        p.point_size = 0.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn grain_color_decodes_hex() {
        assert!((GRAIN_COLOR[0] - 0x33 as f32 / 255.0).abs() < 1e-6);
        assert!((GRAIN_COLOR[1] - 0xD8 as f32 / 255.0).abs() < 1e-6);
        assert!((GRAIN_COLOR[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn json_roundtrip() {
        let cfg = ShapeSampleConfig::default();
        let s = serde_json::to_string(&cfg).unwrap();
        let de: ShapeSampleConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(de.size, cfg.size);

        let p = AnimationParams::default();
        let s = serde_json::to_string(&p).unwrap();
        let de: AnimationParams = serde_json::from_str(&s).unwrap();
        assert_eq!(de.morph_ease, Ease::OutCubic);
    }
}
