//! Morphgrain renders an animated point cloud that morphs between two image
//! silhouettes, driven by continuous scroll input. The crate owns the
//! algorithmic core and hands pixels to an external render backend.
//!
//! # Pipeline overview
//!
//! 1. **Prepare**: [`assets`] decodes the two silhouettes (raster or SVG)
//!    up front; no IO happens after construction.
//! 2. **Build**: each silhouette is letterboxed into an alpha mask, sampled
//!    into a raw point set, resampled onto a fixed count, and placed,
//!    yielding a [`MorphCloud`] with per-point random identity.
//! 3. **Tick**: [`MorphController`] integrates the raw scroll offset into
//!    filtered progress values once per frame; [`MorphScene::advance`]
//!    packages them with the buffers as [`FrameInputs`].
//! 4. **Draw**: a [`RenderBackend`] rasterizes the frame. The per-point
//!    displacement and shading math lives in [`flow`] as pure functions, so
//!    a GPU stage and the host-side reference evaluation agree.
//!
//! Construction is deterministic for a given seed, evaluation owns no IO,
//! and `unsafe` is forbidden.

#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod controller;
pub mod driver;
pub mod ease;
mod error;
pub mod flow;
pub mod mask;
mod math;
pub mod points;
pub mod sampler;
pub mod scene;

pub use assets::{SilhouetteImage, decode_image, load_silhouette, render_svg};
pub use config::{AnimationParams, FlowParams, ShapeSampleConfig};
pub use controller::{AnimationState, FrameMotion, MorphController};
pub use driver::{ScrollSource, StopHandle, run_frame_loop};
pub use ease::Ease;
pub use error::{MorphError, MorphResult};
pub use flow::{
    FrameUniforms, PointShade, displace, displace_buffer, flow_vector, footprint_alpha, is_dust,
    point_shade,
};
pub use mask::AlphaMask;
pub use points::{PointTransform, Scale, per_point_randoms, resample_cyclic, transform_points};
pub use sampler::sample_silhouette;
pub use scene::{FrameInputs, MorphCloud, MorphScene, RenderBackend};
