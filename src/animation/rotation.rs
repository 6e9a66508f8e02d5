use serde::Serialize;

use crate::config::AnimationConfig;
use crate::foundation::core::finite_or;

/// Duration of one turn when the configured one is unusable.
const DEFAULT_TURN_MS: f64 = 5000.0;

/// One full-turn run submitted to the host scheduler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationRequest {
    /// Animation name; re-used across runs so the scheduler treats a restart as a
    /// continuation.
    pub name: String,
    /// Angle at progress 0, in degrees.
    pub from_deg: f64,
    /// Angle at progress 1, in degrees.
    pub to_deg: f64,
    /// Run duration in milliseconds.
    pub duration_ms: f64,
}

impl RotationRequest {
    /// Angle at `progress` in `[0, 1]` (clamped).
    pub fn angle_at(&self, progress: f64) -> f64 {
        let t = finite_or(progress, 0.0).clamp(0.0, 1.0);
        self.from_deg + (self.to_deg - self.from_deg) * t
    }
}

/// Host animation scheduler.
///
/// Running a request under a name that is already running supersedes the earlier run. The
/// host reports completion through
/// [`OverlayLayer::on_animation_finished`](crate::overlay::OverlayLayer::on_animation_finished)
/// and per-tick progress through
/// [`OverlayLayer::animation_step`](crate::overlay::OverlayLayer::animation_step).
pub trait AnimationScheduler {
    /// Start (or supersede) the named run.
    fn run_animation(&mut self, request: &RotationRequest);

    /// Cancel the named run. Cancelling an unknown name is a no-op.
    fn cancel(&mut self, name: &str);
}

/// Animator state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnimationState {
    /// Nothing scheduled.
    #[default]
    Idle,
    /// A run is in flight.
    Running {
        /// Scheduler name of the run.
        name: String,
        /// Direction of the run.
        clockwise: bool,
    },
}

/// Self-chaining indefinite rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationAnimator {
    name: String,
    state: AnimationState,
    current: Option<RotationRequest>,
}

impl RotationAnimator {
    /// Idle animator that will schedule runs under `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: AnimationState::Idle,
            current: None,
        }
    }

    /// Scheduler name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state.
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    /// Whether a run is in flight.
    pub fn is_running(&self) -> bool {
        matches!(self.state, AnimationState::Running { .. })
    }

    /// Request of the in-flight run.
    pub fn current(&self) -> Option<&RotationRequest> {
        self.current.as_ref()
    }

    /// Start a full turn from `from_deg`, superseding any run in flight.
    pub fn start(
        &mut self,
        scheduler: &mut dyn AnimationScheduler,
        config: &AnimationConfig,
        from_deg: f64,
    ) {
        let turn = if config.clockwise { 360.0 } else { -360.0 };
        let from_deg = finite_or(from_deg, 0.0);
        let duration_ms = if config.duration.is_finite() && config.duration > 0.0 {
            config.duration
        } else {
            DEFAULT_TURN_MS
        };
        let request = RotationRequest {
            name: self.name.clone(),
            from_deg,
            to_deg: from_deg + turn,
            duration_ms,
        };
        tracing::debug!(
            animation = %self.name,
            from = request.from_deg,
            to = request.to_deg,
            duration_ms,
            "rotation run scheduled"
        );
        scheduler.run_animation(&request);
        self.state = AnimationState::Running {
            name: self.name.clone(),
            clockwise: config.clockwise,
        };
        self.current = Some(request);
    }

    /// Cancel the run in flight, if any.
    pub fn stop(&mut self, scheduler: &mut dyn AnimationScheduler) {
        if self.is_running() {
            scheduler.cancel(&self.name);
            tracing::debug!(animation = %self.name, "rotation stopped");
        }
        self.state = AnimationState::Idle;
        self.current = None;
    }

    /// Handle the end of a run. A completed run re-issues the next turn when rotation is still
    /// configured; returns whether a new run was scheduled.
    pub fn on_finished(
        &mut self,
        scheduler: &mut dyn AnimationScheduler,
        config: &AnimationConfig,
        completed: bool,
    ) -> bool {
        if !completed || !self.is_running() {
            return false;
        }
        if !config.rotate {
            self.state = AnimationState::Idle;
            self.current = None;
            return false;
        }
        let from = self.current.as_ref().map_or(0.0, |r| r.to_deg);
        self.start(scheduler, config, from);
        true
    }

    /// Angle of the run in flight at `progress`.
    pub fn step(&self, progress: f64) -> Option<f64> {
        self.current.as_ref().map(|r| r.angle_at(progress))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/rotation.rs"]
mod tests;
