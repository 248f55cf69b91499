use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Instant,
};

use crate::{
    error::MorphResult,
    scene::{MorphScene, RenderBackend},
};

/// The live scroll signal, sampled once per frame. Closures implement it
/// directly: `&mut || window.scroll_y()`.
pub trait ScrollSource {
    fn scroll_y(&mut self) -> f64;
}

impl<F: FnMut() -> f64> ScrollSource for F {
    fn scroll_y(&mut self) -> f64 {
        self()
    }
}

/// Clonable handle that ends the frame loop before its next tick. Each tick
/// is complete by the time it returns, so stopping never aborts in-flight
/// work.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

/// Drive the scene until stopped: measure the wall-clock delta, sample the
/// scroll source, tick, draw. Frame pacing is the backend's concern (a real
/// backend blocks on present); a backend error ends the loop.
pub fn run_frame_loop(
    scene: &mut MorphScene,
    scroll: &mut dyn ScrollSource,
    backend: &mut dyn RenderBackend,
    stop: &StopHandle,
) -> MorphResult<()> {
    let mut prev = Instant::now();
    while !stop.is_stopped() {
        let now = Instant::now();
        let dt = now.duration_since(prev).as_secs_f64();
        prev = now;

        let scroll_y = scroll.scroll_y();
        let inputs = scene.advance(dt, scroll_y);
        backend.draw_frame(&inputs)?;
    }
    Ok(())
}
