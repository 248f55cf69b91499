use crate::{
    assets::SilhouetteImage,
    config::ShapeSampleConfig,
    error::MorphResult,
    mask::AlphaMask,
    math::SplitMix64,
};

/// Walk the letterboxed alpha mask of `img` on a grid of stride `cfg.step`
/// and emit one jittered, normalized point per accepted cell. Returns a flat
/// xyz buffer of variable length; a fully transparent image returns an empty
/// buffer, never an error.
///
/// The accept decision reads un-jittered grid coordinates; jitter only moves
/// the emitted point. Same seed, same image, same output.
#[tracing::instrument(skip(img, cfg), fields(width = img.width, height = img.height))]
pub fn sample_silhouette(
    img: &SilhouetteImage,
    cfg: &ShapeSampleConfig,
    seed: u64,
) -> MorphResult<Vec<f32>> {
    cfg.validate()?;
    let mask = AlphaMask::from_silhouette(img, cfg.size)?;

    let mut rng = SplitMix64::new(seed);
    let size_f = cfg.size as f32;
    let mut pts = Vec::new();

    for yy in (0..cfg.size).step_by(cfg.step as usize) {
        for xx in (0..cfg.size).step_by(cfg.step as usize) {
            if mask.neighborhood_max(xx, yy) <= cfg.alpha_threshold {
                continue;
            }

            let px = (xx as f32 + rng.next_symmetric_f32() * cfg.jitter_radius)
                .clamp(0.0, size_f - 1.0);
            let py = (yy as f32 + rng.next_symmetric_f32() * cfg.jitter_radius)
                .clamp(0.0, size_f - 1.0);

            let nx = (px / size_f) * 2.0 - 1.0;
            let ny = 1.0 - (py / size_f) * 2.0;
            pts.extend_from_slice(&[nx * cfg.output_scale, ny * cfg.output_scale, 0.0]);
        }
    }

    if pts.is_empty() {
        tracing::warn!("silhouette produced no points; its cloud collapses to the origin");
    } else {
        tracing::debug!(points = pts.len() / 3, "sampled silhouette");
    }
    Ok(pts)
}
