use crate::{
    assets::SilhouetteImage,
    config::{FlowParams, ShapeSampleConfig},
    controller::MorphController,
    error::{MorphError, MorphResult},
    flow::FrameUniforms,
    math::stable_hash64,
    points::{PointTransform, per_point_randoms, resample_cyclic, transform_points},
    sampler::sample_silhouette,
};

/// The two fixed-length position buffers plus the per-point random identity.
/// Built once from the decoded silhouettes; immutable for the lifetime of
/// the animation.
#[derive(Clone, Debug)]
pub struct MorphCloud {
    start: Vec<f32>,
    target: Vec<f32>,
    randoms: Vec<f32>,
}

impl MorphCloud {
    /// Sample both silhouettes, resample each onto exactly `target_count`
    /// points, apply the two placements independently, and fix the per-point
    /// randoms. Construction is deterministic in `seed`.
    ///
    /// A degenerate silhouette (no accepted cells) contributes an all-zero
    /// buffer, collapsing that shape to the origin rather than failing.
    #[tracing::instrument(skip(start_img, target_img, start_placement, target_placement, cfg))]
    pub fn build(
        start_img: &SilhouetteImage,
        start_placement: PointTransform,
        target_img: &SilhouetteImage,
        target_placement: PointTransform,
        cfg: &ShapeSampleConfig,
        target_count: usize,
        seed: u64,
    ) -> MorphResult<Self> {
        if target_count == 0 {
            return Err(MorphError::validation("target point count must be > 0"));
        }

        let raw = sample_silhouette(start_img, cfg, stable_hash64(seed, "start"))?;
        let mut start = resample_cyclic(&raw, target_count);
        transform_points(&mut start, start_placement);

        let raw = sample_silhouette(target_img, cfg, stable_hash64(seed, "target"))?;
        let mut target = resample_cyclic(&raw, target_count);
        transform_points(&mut target, target_placement);

        let randoms = per_point_randoms(target_count, stable_hash64(seed, "randoms"));

        tracing::debug!(points = target_count, "built morph cloud");
        Ok(Self {
            start,
            target,
            randoms,
        })
    }

    pub fn len(&self) -> usize {
        self.randoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.randoms.is_empty()
    }

    pub fn start_positions(&self) -> &[f32] {
        &self.start
    }

    pub fn target_positions(&self) -> &[f32] {
        &self.target
    }

    pub fn randoms(&self) -> &[f32] {
        &self.randoms
    }
}

/// Everything a render backend needs for one frame: the cloud's buffers by
/// reference and the scalar uniforms of this tick. A backend retains no
/// state between frames beyond what this carries.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs<'a> {
    pub positions: &'a [f32],
    pub targets: &'a [f32],
    pub randoms: &'a [f32],
    pub uniforms: FrameUniforms,
    /// Vertical anchor of the whole cloud.
    pub offset_y: f32,
    /// Base sprite size before per-point jitter and depth attenuation.
    pub point_size: f32,
}

/// The external rasterizer boundary. Implementations draw the frame from
/// `FrameInputs` and nothing else; pacing (vsync) is their concern.
pub trait RenderBackend {
    fn draw_frame(&mut self, inputs: &FrameInputs<'_>) -> MorphResult<()>;
}

/// A cloud, its controller, and the flow parameters; one [`advance`] per
/// rendered frame turns the live scroll offset into `FrameInputs`.
///
/// [`advance`]: MorphScene::advance
#[derive(Clone, Debug)]
pub struct MorphScene {
    cloud: MorphCloud,
    controller: MorphController,
    flow: FlowParams,
}

impl MorphScene {
    pub fn new(
        cloud: MorphCloud,
        controller: MorphController,
        flow: FlowParams,
    ) -> MorphResult<Self> {
        flow.validate()?;
        Ok(Self {
            cloud,
            controller,
            flow,
        })
    }

    pub fn cloud(&self) -> &MorphCloud {
        &self.cloud
    }

    pub fn controller(&self) -> &MorphController {
        &self.controller
    }

    /// Tick the controller and assemble this frame's backend inputs.
    pub fn advance(&mut self, dt_seconds: f64, scroll_y: f64) -> FrameInputs<'_> {
        let motion = self.controller.tick(dt_seconds, scroll_y);
        FrameInputs {
            positions: &self.cloud.start,
            targets: &self.cloud.target,
            randoms: &self.cloud.randoms,
            uniforms: FrameUniforms {
                time: motion.flow_time as f32,
                progress: motion.progress as f32,
                spread: self.flow.spread,
                dust_ratio: self.flow.dust_ratio,
                base_color: self.flow.base_color,
            },
            offset_y: motion.offset_y as f32,
            point_size: self.flow.point_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnimationParams;

    fn solid(size: u32, alpha: u8) -> SilhouetteImage {
        SilhouetteImage {
            width: size,
            height: size,
            rgba: [255, 255, 255, alpha].repeat((size * size) as usize),
        }
    }

    fn small_cfg() -> ShapeSampleConfig {
        ShapeSampleConfig {
            size: 16,
            step: 2,
            ..ShapeSampleConfig::default()
        }
    }

    fn cloud(count: usize, seed: u64) -> MorphCloud {
        MorphCloud::build(
            &solid(16, 255),
            PointTransform::default(),
            &solid(16, 255),
            PointTransform {
                scale: crate::points::Scale::Uniform(0.78),
                offset: [-1.1, -1.0, 0.0],
            },
            &small_cfg(),
            count,
            seed,
        )
        .unwrap()
    }

    #[test]
    fn build_produces_fixed_length_buffers() {
        let c = cloud(100, 1);
        assert_eq!(c.len(), 100);
        assert_eq!(c.start_positions().len(), 300);
        assert_eq!(c.target_positions().len(), 300);
        assert_eq!(c.randoms().len(), 100);
    }

    #[test]
    fn build_is_deterministic_in_seed() {
        let a = cloud(50, 7);
        let b = cloud(50, 7);
        assert_eq!(a.start_positions(), b.start_positions());
        assert_eq!(a.target_positions(), b.target_positions());
        assert_eq!(a.randoms(), b.randoms());
    }

    #[test]
    fn zero_target_count_fails_fast() {
        let err = MorphCloud::build(
            &solid(16, 255),
            PointTransform::default(),
            &solid(16, 255),
            PointTransform::default(),
            &small_cfg(),
            0,
            1,
        )
        .unwrap_err();
        assert!(err.to_string().contains("validation"));
    }

    #[test]
    fn degenerate_target_silhouette_collapses_to_origin() {
        let c = MorphCloud::build(
            &solid(16, 255),
            PointTransform::default(),
            &solid(16, 0),
            PointTransform::default(),
            &small_cfg(),
            40,
            1,
        )
        .unwrap();
        assert!(c.target_positions().iter().all(|&v| v == 0.0));
        assert!(c.start_positions().iter().any(|&v| v != 0.0));
    }

    #[test]
    fn advance_exposes_tick_as_uniforms() {
        let controller = MorphController::new(AnimationParams {
            scroll_start: 0.0,
            scroll_range: 1000.0,
            ..AnimationParams::default()
        })
        .unwrap();
        let mut scene = MorphScene::new(cloud(10, 1), controller, FlowParams::default()).unwrap();

        let first = scene.advance(0.016, 0.0);
        assert_eq!(first.uniforms.progress, 0.0);
        assert_eq!(first.uniforms.time, 0.0);
        assert_eq!(first.positions.len(), 30);
        assert_eq!(first.point_size, FlowParams::default().point_size);

        // Scrolling far enough eventually raises progress.
        let mut progress = 0.0;
        for _ in 0..2_000 {
            progress = scene.advance(0.016, 1e9).uniforms.progress;
        }
        assert!(progress > 0.5);
    }
}
