use crate::{
    config::AnimationParams,
    error::MorphResult,
    math::{clamp01, lerp},
};

// The flow field is frozen at both rest states; its clock only advances while
// the eased progress is strictly inside this window.
const FLOW_ACTIVE_MIN: f64 = 0.001;
const FLOW_ACTIVE_MAX: f64 = 0.999;

// Floor on the wall-clock delta, so a paused or clamped timer cannot zero the
// exponential blend.
const MIN_TICK_SECONDS: f64 = 1e-4;

// Floor on the morph window width used as a divisor.
const MIN_MORPH_RANGE: f64 = 1e-4;

/// Filtered animation state. One instance per controller, mutated once per
/// rendered frame, never reset after creation.
///
/// `scroll_filtered` and `morph_filtered` are low-pass-filtered views of the
/// instantaneous target ratios and never leave [0, 1]; `flow_time` is
/// monotonically non-decreasing.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct AnimationState {
    pub scroll_filtered: f64,
    pub morph_filtered: f64,
    pub flow_time: f64,
}

/// Scalar outputs of one tick, consumed by the render backend as uniforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMotion {
    /// Eased morph progress in [0, 1].
    pub progress: f64,
    /// Accumulated flow-field time in seconds.
    pub flow_time: f64,
    /// Vertical anchor of the whole cloud.
    pub offset_y: f64,
}

/// Integrates the raw scroll signal into smoothed progress values, one tick
/// per rendered frame. Owns its state; independent instances can be driven
/// with injected `dt`/`scroll_y` sequences.
#[derive(Clone, Debug)]
pub struct MorphController {
    params: AnimationParams,
    state: AnimationState,
}

impl MorphController {
    pub fn new(params: AnimationParams) -> MorphResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            state: AnimationState::default(),
        })
    }

    pub fn params(&self) -> &AnimationParams {
        &self.params
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Advance by one frame given the wall-clock delta and the live scroll
    /// offset. Each tick recomputes its targets from the raw signal, so the
    /// filters are self-correcting; there are no error states.
    pub fn tick(&mut self, dt_seconds: f64, scroll_y: f64) -> FrameMotion {
        let dt = dt_seconds.max(MIN_TICK_SECONDS);
        let p = self.params;

        let target_scroll = clamp01((scroll_y - p.scroll_start) / p.scroll_range);
        let scroll_blend = 1.0 - (-p.scroll_smoothing * dt).exp();
        self.state.scroll_filtered += (target_scroll - self.state.scroll_filtered) * scroll_blend;

        let target_morph = morph_target(&p, target_scroll);
        let morph_blend = 1.0 - (-p.morph_smoothing * dt).exp();
        self.state.morph_filtered += (target_morph - self.state.morph_filtered) * morph_blend;

        let progress = p.morph_ease.apply(self.state.morph_filtered);

        if progress > FLOW_ACTIVE_MIN && progress < FLOW_ACTIVE_MAX {
            self.state.flow_time += dt;
        }

        let base_y = lerp(p.base_y_start, p.base_y_end, self.state.scroll_filtered);
        let drop_y = lerp(0.0, p.drop_y, progress);

        FrameMotion {
            progress,
            flow_time: self.state.flow_time,
            offset_y: base_y + drop_y,
        }
    }
}

/// The morph ramp: zero until the scroll ratio passes the start threshold,
/// then linear over the range window, clamped to [0, 1].
fn morph_target(params: &AnimationParams, scroll_ratio: f64) -> f64 {
    clamp01((scroll_ratio - params.morph_start_ratio) / params.morph_range_ratio.max(MIN_MORPH_RANGE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(scroll_range: f64) -> AnimationParams {
        AnimationParams {
            scroll_start: 0.0,
            scroll_range,
            ..AnimationParams::default()
        }
    }

    #[test]
    fn scroll_filter_converges_without_overshoot() {
        let mut c = MorphController::new(params(1000.0)).unwrap();
        let mut prev = 0.0;
        for _ in 0..500 {
            c.tick(0.016, 500.0);
            let s = c.state().scroll_filtered;
            assert!(s >= prev, "filter must approach the target monotonically");
            assert!(s <= 0.5 + 1e-12, "filter must not overshoot the target");
            prev = s;
        }
        assert!((c.state().scroll_filtered - 0.5).abs() < 1e-3);
    }

    #[test]
    fn filters_stay_in_unit_interval() {
        let mut c = MorphController::new(params(100.0)).unwrap();
        let scrolls = [0.0, 1e6, -50.0, 240.0, 1e9, 0.0, 77.0];
        let dts = [0.001, 0.016, 3.0, 0.0, 0.25];
        for (i, &scroll) in scrolls.iter().cycle().take(200).enumerate() {
            c.tick(dts[i % dts.len()], scroll);
            let s = c.state();
            assert!((0.0..=1.0).contains(&s.scroll_filtered));
            assert!((0.0..=1.0).contains(&s.morph_filtered));
        }
    }

    #[test]
    fn morph_target_ramp_matches_thresholds() {
        let p = AnimationParams {
            morph_start_ratio: 0.72,
            morph_range_ratio: 0.5,
            ..AnimationParams::default()
        };
        assert_eq!(morph_target(&p, 0.72), 0.0);
        assert!((morph_target(&p, 0.97) - 0.5).abs() < 1e-12);
        assert_eq!(morph_target(&p, 1.22), 1.0);
        assert_eq!(morph_target(&p, 0.1), 0.0);
    }

    #[test]
    fn flow_clock_is_frozen_at_rest() {
        let mut c = MorphController::new(params(1000.0)).unwrap();
        // No scroll: progress stays at 0 and the clock must not run.
        for _ in 0..100 {
            let m = c.tick(0.016, 0.0);
            assert!(m.progress <= FLOW_ACTIVE_MIN);
        }
        assert_eq!(c.state().flow_time, 0.0);
    }

    #[test]
    fn flow_clock_runs_mid_transition() {
        let mut p = params(1000.0);
        p.morph_start_ratio = 0.0;
        p.morph_range_ratio = 1.0;
        let mut c = MorphController::new(p).unwrap();
        for _ in 0..50 {
            c.tick(0.016, 500.0);
        }
        let mid = c.state().flow_time;
        assert!(mid > 0.0);

        // flow_time never decreases, whatever the input does next.
        c.tick(0.016, 0.0);
        assert!(c.state().flow_time >= mid);
    }

    #[test]
    fn vertical_offset_tracks_scroll_and_drop() {
        let p = params(1000.0);
        let mut c = MorphController::new(p).unwrap();
        let first = c.tick(0.016, 0.0);
        // At rest the anchor sits at the start height with no drop.
        assert!((first.offset_y - p.base_y_start).abs() < 1e-9);

        // Converged at full scroll and full morph, the anchor lands on
        // end + drop.
        let mut c = MorphController::new(AnimationParams {
            morph_start_ratio: 0.0,
            morph_range_ratio: 0.5,
            ..p
        })
        .unwrap();
        let mut last = first;
        for _ in 0..5_000 {
            last = c.tick(0.016, 1e9);
        }
        assert!((last.offset_y - (p.base_y_end + p.drop_y)).abs() < 1e-3);
    }

    #[test]
    fn zero_dt_is_floored_not_fatal() {
        let mut c = MorphController::new(params(1000.0)).unwrap();
        let m = c.tick(0.0, 500.0);
        assert!(m.progress.is_finite());
        assert!(c.state().scroll_filtered > 0.0);
    }

    #[test]
    fn rejects_invalid_params() {
        assert!(MorphController::new(params(0.0)).is_err());
    }
}
