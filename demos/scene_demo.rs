//! Headless end-to-end run over two procedural silhouettes: a disc morphing
//! into a ring while a scripted scroll position ramps down the page. Logs
//! the uniforms a render backend would receive.
//!
//! Run with: `cargo run --example scene_demo`

use morphgrain::{
    AnimationParams, FlowParams, FrameInputs, MorphCloud, MorphController, MorphResult,
    MorphScene, PointTransform, RenderBackend, Scale, ShapeSampleConfig, SilhouetteImage,
    StopHandle, run_frame_loop,
};

fn disc(size: u32, inner_radius: f32, outer_radius: f32) -> SilhouetteImage {
    let mut rgba = vec![0u8; (size * size * 4) as usize];
    let c = size as f32 / 2.0;
    for y in 0..size {
        for x in 0..size {
            let d = ((x as f32 + 0.5 - c).powi(2) + (y as f32 + 0.5 - c).powi(2)).sqrt();
            if d >= inner_radius && d <= outer_radius {
                let i = ((y * size + x) * 4) as usize;
                rgba[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
            }
        }
    }
    SilhouetteImage {
        width: size,
        height: size,
        rgba,
    }
}

struct LoggingBackend {
    frame: usize,
    stop: StopHandle,
}

impl RenderBackend for LoggingBackend {
    fn draw_frame(&mut self, inputs: &FrameInputs<'_>) -> MorphResult<()> {
        if self.frame % 30 == 0 {
            tracing::info!(
                frame = self.frame,
                progress = inputs.uniforms.progress,
                flow_time = inputs.uniforms.time,
                offset_y = inputs.offset_y,
                "frame"
            );
        }
        self.frame += 1;
        if self.frame >= 300 {
            self.stop.stop();
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let cfg = ShapeSampleConfig {
        size: 128,
        ..ShapeSampleConfig::default()
    };
    let cloud = MorphCloud::build(
        &disc(128, 0.0, 52.0),
        PointTransform::default(),
        &disc(128, 34.0, 52.0),
        PointTransform {
            scale: Scale::Uniform(0.78),
            offset: [-1.1, -1.0, 0.0],
        },
        &cfg,
        4_000,
        0xC0FFEE,
    )?;

    let controller = MorphController::new(AnimationParams::for_viewport(900.0))?;
    let mut scene = MorphScene::new(cloud, controller, FlowParams::default())?;

    let stop = StopHandle::new();
    let mut backend = LoggingBackend {
        frame: 0,
        stop: stop.clone(),
    };

    let mut position = 0.0;
    let mut scroll = move || {
        position += 12.0;
        position
    };

    run_frame_loop(&mut scene, &mut scroll, &mut backend, &stop)?;
    Ok(())
}
