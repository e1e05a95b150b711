/// Damped spring used for selection animations.

/// One-dimensional spring easing `value` toward `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub value: f32,
    pub velocity: f32,
    pub target: f32,
    pub stiffness: f32,
    pub damping: f32,
}

const MAX_STEP: f32 = 1.0 / 120.0;
const REST_EPSILON: f32 = 1e-3;

impl Spring {
    /// Spring at rest on `value`
    pub fn new(value: f32) -> Self {
        Self { value, velocity: 0.0, target: value, stiffness: 170.0, damping: 26.0 }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to the target (reduced motion)
    pub fn snap(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
    }

    /// Advance by `dt` seconds using fixed sub-steps
    pub fn step(&mut self, dt: f32) {
        let mut remaining = dt.clamp(0.0, 1.0);
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP);
            let force = -self.stiffness * (self.value - self.target) - self.damping * self.velocity;
            self.velocity += force * h;
            self.value += self.velocity * h;
            remaining -= h;
        }
        if self.is_settled() {
            self.snap();
        }
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < REST_EPSILON && self.velocity.abs() < REST_EPSILON
    }
}
