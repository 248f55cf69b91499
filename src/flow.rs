//! The per-point displacement and shading model. Everything here is a pure
//! function of (position, per-point random, flow time, progress) with no
//! state of its own, so the same math can run in a vertex/fragment stage or
//! on the host over the same buffers; [`displace_buffer`] is the host-side
//! reference used by tests and CPU backends.

use std::f32::consts::PI;

use glam::Vec3;

use crate::math::{fract, lerp_f32, smoothstep};

// Sprite footprint radii: fully solid inside, discarded at and beyond.
const FOOTPRINT_SOLID_RADIUS: f32 = 0.30;
const FOOTPRINT_DISCARD_RADIUS: f32 = 0.48;

/// Scalar uniforms shared by every point of a frame.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct FrameUniforms {
    /// Accumulated flow-field time in seconds.
    pub time: f32,
    /// Eased morph progress in [0, 1].
    pub progress: f32,
    /// Displacement magnitude.
    pub spread: f32,
    /// Fraction of points in the energetic dust subset.
    pub dust_ratio: f32,
    /// Color of every point before per-point shading.
    pub base_color: [f32; 3],
}

/// Primary flow field: sinusoids of the position, phase-shifted by the flow
/// clock and the point's random identity.
pub fn flow_vector(p: Vec3, r: f32, time: f32) -> Vec3 {
    let t = time * 0.6 + r * 10.0;
    Vec3::new(
        (p.y * 1.25 + t).sin(),
        (p.x * 1.20 + t * 1.05).sin(),
        (p.y * 1.10 + t * 0.95).sin(),
    ) * 0.14
}

/// Dust membership: a deterministic per-point test on the stored random,
/// never resampled per frame.
pub fn is_dust(r: f32, dust_ratio: f32) -> bool {
    r >= 1.0 - dust_ratio
}

/// Final position of one point for the current frame.
///
/// The base position blends start to target with a smoothstep of progress;
/// the flow offset is scaled by `sin(pi * progress)`, an envelope that is
/// zero at both rest states. Dust points get a faster, denser second pass.
pub fn displace(start: Vec3, target: Vec3, r: f32, u: &FrameUniforms) -> Vec3 {
    let p = smoothstep(0.0, 1.0, u.progress);
    let mut pos = start.lerp(target, p);

    let envelope = (p * PI).sin();
    pos += flow_vector(pos, r, u.time) * u.spread * envelope;
    if is_dust(r, u.dust_ratio) {
        pos += flow_vector(pos * 1.7, r * 1.3, u.time) * u.spread * 1.6 * envelope;
    }
    pos
}

/// Stable per-point shading, hashed twice from the point's random so that a
/// point keeps its sparkle for the whole animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointShade {
    /// Re-hashed random driving size jitter.
    pub grain: f32,
    /// Sprite size multiplier in [0.65, 1.25].
    pub size_jitter: f32,
    /// Brightness multiplier in [0.78, 1.08].
    pub shade: f32,
    /// Opacity multiplier in [0.65, 1.0].
    pub alpha: f32,
}

pub fn point_shade(r: f32) -> PointShade {
    let grain = fract((r * 43758.5453).sin() * 43758.5453);
    let sparkle = fract((grain * 91.7).sin() * 43758.5453);
    PointShade {
        grain,
        size_jitter: lerp_f32(0.65, 1.25, grain),
        shade: lerp_f32(0.78, 1.08, sparkle),
        alpha: lerp_f32(0.65, 1.0, sparkle),
    }
}

/// Radial falloff of a point sprite's footprint. `uv` lies in [0, 1]^2 with
/// the point center at (0.5, 0.5); returns 1 over the solid core, fades to
/// exactly 0 at the discard radius and stays 0 beyond it.
pub fn footprint_alpha(uv: [f32; 2]) -> f32 {
    let d = ((uv[0] - 0.5).powi(2) + (uv[1] - 0.5).powi(2)).sqrt();
    1.0 - smoothstep(FOOTPRINT_SOLID_RADIUS, FOOTPRINT_DISCARD_RADIUS, d)
}

/// Evaluate [`displace`] over whole buffers on the host. Matches a GPU
/// evaluation of the same math within floating-point tolerance.
pub fn displace_buffer(
    start: &[f32],
    target: &[f32],
    randoms: &[f32],
    uniforms: &FrameUniforms,
) -> Vec<f32> {
    debug_assert_eq!(start.len(), target.len());
    debug_assert_eq!(start.len(), randoms.len() * 3);

    let mut out = Vec::with_capacity(start.len());
    for ((s, t), &r) in start
        .chunks_exact(3)
        .zip(target.chunks_exact(3))
        .zip(randoms)
    {
        let v = displace(Vec3::from_slice(s), Vec3::from_slice(t), r, uniforms);
        out.extend_from_slice(&v.to_array());
    }
    out
}
