use crate::{
    error::{MorphError, MorphResult},
    math::SplitMix64,
};

/// Map a raw point set onto a fixed-cardinality buffer by cyclic repetition:
/// output point `i` copies raw point `i mod S`. Deterministic, preserves the
/// source silhouette's local density patterns, and allocates nothing beyond
/// the output buffer. An empty raw set yields an all-zero buffer.
pub fn resample_cyclic(raw: &[f32], target_count: usize) -> Vec<f32> {
    debug_assert_eq!(raw.len() % 3, 0, "raw point set must be xyz triples");

    let mut out = vec![0.0f32; target_count * 3];
    let src_count = raw.len() / 3;
    if src_count == 0 {
        return out;
    }
    for (i, chunk) in out.chunks_exact_mut(3).enumerate() {
        let j = (i % src_count) * 3;
        chunk.copy_from_slice(&raw[j..j + 3]);
    }
    out
}

/// Scale factor of a [`PointTransform`]: one factor for all axes, or one per
/// axis.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Scale {
    Uniform(f32),
    PerAxis([f32; 3]),
}

impl Default for Scale {
    fn default() -> Self {
        Self::Uniform(1.0)
    }
}

impl Scale {
    /// Build from one to three components. A missing y falls back to x and a
    /// missing z to y; an empty slice is a caller error.
    pub fn from_components(components: &[f32]) -> MorphResult<Self> {
        match *components {
            [] => Err(MorphError::validation(
                "scale needs at least one component",
            )),
            [s] => Ok(Self::Uniform(s)),
            [x, y] => Ok(Self::PerAxis([x, y, y])),
            [x, y, z] => Ok(Self::PerAxis([x, y, z])),
            _ => Err(MorphError::validation(
                "scale takes at most three components",
            )),
        }
    }

    fn factors(self) -> [f32; 3] {
        match self {
            Self::Uniform(s) => [s; 3],
            Self::PerAxis(f) => f,
        }
    }
}

/// Affine adjustment `p' = p * scale + offset`, used to size and place one
/// silhouette's buffer relative to the other.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointTransform {
    pub scale: Scale,
    pub offset: [f32; 3],
}

/// Apply `transform` to every point of the buffer in place.
pub fn transform_points(buffer: &mut [f32], transform: PointTransform) {
    let [sx, sy, sz] = transform.scale.factors();
    let [ox, oy, oz] = transform.offset;
    for p in buffer.chunks_exact_mut(3) {
        p[0] = p[0] * sx + ox;
        p[1] = p[1] * sy + oy;
        p[2] = p[2] * sz + oz;
    }
}

/// One persistent pseudo-random scalar in [0, 1) per point index. Generated
/// once at cloud construction; both dust membership and shading derive from
/// it, so a point's stylistic identity is stable for the whole animation.
pub fn per_point_randoms(count: usize, seed: u64) -> Vec<f32> {
    let mut rng = SplitMix64::new(seed);
    (0..count).map(|_| rng.next_unit_f32()).collect()
}
