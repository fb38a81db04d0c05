//! Fade-out schedule for the background loop
//!
//! The schedule only computes volumes. The controller applies one step per
//! timer tick so the fade never sleeps on the event loop.

/// Equal decrements from a start gain down to exactly 0.0
#[derive(Debug, Clone)]
pub struct FadeOut {
    start: f32,
    steps: u8,
    taken: u8,
}

impl FadeOut {
    pub fn new(start: f32, steps: u8) -> Self {
        Self {
            start: start.clamp(0.0, 1.0),
            steps: steps.max(1),
            taken: 0,
        }
    }

    /// Volume for the next step, `None` once silence was reached
    pub fn next_volume(&mut self) -> Option<f32> {
        if self.is_finished() {
            return None;
        }
        self.taken += 1;
        let remaining = self.steps - self.taken;
        Some(self.start * f32::from(remaining) / f32::from(self.steps))
    }

    pub fn is_finished(&self) -> bool {
        self.taken >= self.steps
    }

    pub fn steps(&self) -> u8 {
        self.steps
    }
}
