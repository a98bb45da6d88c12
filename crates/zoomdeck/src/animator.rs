//! Eased camera transitions.
//!
//! The interpolation itself is the pure [`pose_at`]. [`Animator`] wraps it
//! with a single in-flight slot. Starting or cancelling an animation
//! replaces that slot and bumps a generation counter, so a superseded
//! animation can never write again and callers can tell that it was
//! superseded by comparing generations.

use crate::camera::CameraPose;

pub const DEFAULT_DURATION_MS: f32 = 350.0;

/// Cubic ease-out: fast start, gentle landing.
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Raw (un-eased) progress in `[0, 1]`.
pub fn progress(elapsed_ms: f32, duration_ms: f32) -> f32 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0)
}

/// Pose reached `elapsed_ms` into a transition from `start` to `target`.
pub fn pose_at(
    start: &CameraPose,
    target: &CameraPose,
    elapsed_ms: f32,
    duration_ms: f32,
) -> CameraPose {
    let t = progress(elapsed_ms, duration_ms);
    if t >= 1.0 {
        return *target;
    }
    start.lerp(target, ease_out_cubic(t))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveAnimation {
    pub generation: u64,
    pub start: CameraPose,
    pub target: CameraPose,
    pub elapsed_ms: f32,
}

#[derive(Debug, Clone)]
pub struct Animator {
    generation: u64,
    active: Option<ActiveAnimation>,
    duration_ms: f32,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MS)
    }
}

impl Animator {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            generation: 0,
            active: None,
            duration_ms: duration_ms.max(0.0),
        }
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn active(&self) -> Option<&ActiveAnimation> {
        self.active.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Start animating from `start` to `target`, superseding anything in flight.
    pub fn animate(&mut self, start: CameraPose, target: CameraPose) -> u64 {
        self.generation += 1;
        self.active = Some(ActiveAnimation {
            generation: self.generation,
            start,
            target,
            elapsed_ms: 0.0,
        });
        self.generation
    }

    /// Invalidate the in-flight animation, if any.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.active = None;
    }

    /// Advance by `dt_ms` and return the pose to write, or `None` when there
    /// is nothing current to write.
    pub fn tick(&mut self, dt_ms: f32) -> Option<CameraPose> {
        let anim = self.active.as_mut()?;
        anim.elapsed_ms += dt_ms.max(0.0);
        let pose = pose_at(&anim.start, &anim.target, anim.elapsed_ms, self.duration_ms);
        if progress(anim.elapsed_ms, self.duration_ms) >= 1.0 {
            self.active = None;
        }
        Some(pose)
    }
}
