//! Configuration for the string physics engine

/// Points per connector polyline, endpoints included. Indices 0 and
/// `POINTS_COUNT - 1` stay pinned to the live anchors; the rest are free.
pub const POINTS_COUNT: usize = 9;

/// Hard ceiling on simultaneously registered connectors. The strand arena is
/// sized for this many slots; registrations past it are dropped.
pub const MAX_CONNECTIONS: usize = 2000;

/// Tunable simulation parameters. The defaults are the board's behavioral
/// contract; overrides exist for tests and experimentation.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsConfig {
    /// Constant downward acceleration applied to free points each frame
    pub gravity: f64,

    /// Rest length of each of the 8 segments
    pub segment_length: f64,

    /// Constraint-relaxation passes per frame
    pub relaxation_passes: u32,

    /// Verlet velocity retention per frame
    pub damping: f64,

    /// A connector whose summed absolute point velocity drops below this in
    /// one frame falls asleep
    pub sleep_threshold: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            segment_length: 18.0,
            relaxation_passes: 3,
            damping: 0.90,
            sleep_threshold: 0.1,
        }
    }
}

impl PhysicsConfig {
    /// Create a configuration with the contract defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-frame gravity
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the segment rest length
    pub fn with_segment_length(mut self, length: f64) -> Self {
        self.segment_length = length;
        self
    }

    /// Set the number of relaxation passes per frame
    pub fn with_relaxation_passes(mut self, passes: u32) -> Self {
        self.relaxation_passes = passes;
        self
    }

    /// Set the Verlet damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the sleep threshold
    pub fn with_sleep_threshold(mut self, threshold: f64) -> Self {
        self.sleep_threshold = threshold;
        self
    }
}
