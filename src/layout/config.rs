//! Configuration for the cluster layout engine

/// Tunable layout parameters. Defaults are the board's behavioral contract.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Horizontal grid pitch; ring positions snap to it
    pub spacing_x: f64,

    /// Vertical grid pitch
    pub spacing_y: f64,

    /// Spiral attempts before a node placement is accepted as-is
    pub node_place_attempts: u32,

    /// Spiral attempts before a satellite cluster falls back to the fixed
    /// offset
    pub satellite_attempts: u32,

    /// Clearance added around node rectangles for all collision checks
    pub collision_padding: f64,

    /// Radius gained per spiral attempt
    pub spiral_radius_step: f64,

    /// Rotation per spiral attempt, in radians
    pub spiral_angle_step: f64,

    /// Offset from the main cluster used when a satellite exhausts its
    /// spiral search
    pub satellite_fallback_offset: (f64, f64),
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing_x: 350.0,
            spacing_y: 250.0,
            node_place_attempts: 200,
            satellite_attempts: 100,
            collision_padding: 40.0,
            spiral_radius_step: 45.0,
            spiral_angle_step: 0.7,
            satellite_fallback_offset: (3500.0, 0.0),
        }
    }
}

impl LayoutConfig {
    /// Create a configuration with the contract defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Ring pitch: the radius gained per BFS layer
    pub fn ring_step(&self) -> f64 {
        self.spacing_x.max(self.spacing_y)
    }

    /// Set both grid pitches
    pub fn with_spacing(mut self, x: f64, y: f64) -> Self {
        self.spacing_x = x;
        self.spacing_y = y;
        self
    }

    /// Set the collision clearance
    pub fn with_collision_padding(mut self, padding: f64) -> Self {
        self.collision_padding = padding;
        self
    }

    /// Set the node placement retry cap
    pub fn with_node_place_attempts(mut self, attempts: u32) -> Self {
        self.node_place_attempts = attempts;
        self
    }

    /// Set the satellite placement retry cap
    pub fn with_satellite_attempts(mut self, attempts: u32) -> Self {
        self.satellite_attempts = attempts;
        self
    }
}
