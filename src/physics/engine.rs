//! The string physics engine
//!
//! Each registered connector owns one strand: a 9-point polyline whose
//! endpoints are pinned to the live anchors of its nodes and whose interior
//! points move under damped Verlet integration with gravity, corrected by a
//! few distance-constraint passes per frame. Settled strands sleep and are
//! skipped until an endpoint node moves.
//!
//! Strands live in a fixed-capacity arena: one contiguous `Vec` of
//! fixed-size slots, a connector-id → slot index, and a free list. At the
//! 2000-connector ceiling that keeps the per-frame loop walking one flat
//! allocation instead of chasing per-connector boxes.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::anchor::Anchor;
use crate::board::{Connector, NodeBoxes};
use crate::geometry::{point_segment_distance, Point};

use super::config::{PhysicsConfig, MAX_CONNECTIONS, POINTS_COUNT};

/// Result of a registration attempt. Registration never fails loudly; this
/// is the optional signal for callers that want to notice the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered,
    /// The arena is full; the connector will not be simulated
    CapacityExhausted,
}

/// One simulated point: current position plus the previous position the
/// Verlet step derives velocity from
#[derive(Debug, Clone, Copy, Default)]
struct PointState {
    x: f64,
    y: f64,
    px: f64,
    py: f64,
}

/// Snapshot of one strand for rendering or hit-testing
#[derive(Debug, Clone, Copy)]
pub struct StrandView {
    pub points: [Point; POINTS_COUNT],
    /// Maximum constraint violation observed in the strand's last simulated
    /// frame; zero at rest
    pub stress: f64,
}

/// One arena slot
#[derive(Debug, Clone, Default)]
struct Strand {
    id: String,
    from: String,
    to: String,
    from_anchor: Anchor,
    to_anchor: Anchor,
    points: [PointState; POINTS_COUNT],
    stress: f64,
    awake: bool,
    /// False until the strand has been laid out between two resolved anchors
    seeded: bool,
    /// False for slots parked on the free list
    live: bool,
}

impl Strand {
    /// Straight-line seeding between two anchor points: zero velocity, zero
    /// stress, as on registration
    fn seed(&mut self, start: Point, end: Point) {
        let last = (POINTS_COUNT - 1) as f64;
        for (i, p) in self.points.iter_mut().enumerate() {
            let at = start.lerp(end, i as f64 / last);
            *p = PointState {
                x: at.x,
                y: at.y,
                px: at.x,
                py: at.y,
            };
        }
        self.stress = 0.0;
        self.seeded = true;
    }
}

/// The engine. Owns the strand arena, the connector index, and the
/// node → strands adjacency used for wake-on-move; borrows the live node-box
/// table from the host on every call that needs geometry.
#[derive(Debug, Default)]
pub struct StringPhysics {
    strands: Vec<Strand>,
    index: HashMap<String, usize>,
    adjacency: HashMap<String, Vec<usize>>,
    free: Vec<usize>,
    config: PhysicsConfig,
}

impl StringPhysics {
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            strands: Vec::new(),
            index: HashMap::new(),
            adjacency: HashMap::new(),
            free: Vec::new(),
            config,
        }
    }

    /// Number of registered connectors
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Arena slots still available
    pub fn remaining_capacity(&self) -> usize {
        MAX_CONNECTIONS - self.index.len()
    }

    pub fn contains(&self, connector_id: &str) -> bool {
        self.index.contains_key(connector_id)
    }

    /// Register a connector for simulation.
    ///
    /// Allocates a strand slot, seeds the polyline as a straight line between
    /// the two resolved anchors (or defers seeding until both boxes become
    /// available), wakes the strand, and indexes it under both endpoint
    /// nodes. Registering an id that is already present reseeds it in place.
    ///
    /// At capacity the registration is dropped; the returned outcome is the
    /// only trace.
    pub fn register(&mut self, connector: &Connector, boxes: &NodeBoxes) -> RegisterOutcome {
        if let Some(&slot) = self.index.get(&connector.id) {
            self.reseed_slot(slot, boxes);
            return RegisterOutcome::Registered;
        }

        if self.index.len() >= MAX_CONNECTIONS {
            warn!(
                connector = %connector.id,
                capacity = MAX_CONNECTIONS,
                "connector capacity exhausted, registration dropped"
            );
            return RegisterOutcome::CapacityExhausted;
        }

        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.strands.push(Strand::default());
                self.strands.len() - 1
            }
        };

        let strand = &mut self.strands[slot];
        *strand = Strand {
            id: connector.id.clone(),
            from: connector.from.clone(),
            to: connector.to.clone(),
            from_anchor: Anchor::parse(&connector.from_port),
            to_anchor: Anchor::parse(&connector.to_port),
            awake: true,
            live: true,
            ..Strand::default()
        };

        if let (Some(from_rect), Some(to_rect)) =
            (boxes.get(&connector.from), boxes.get(&connector.to))
        {
            let start = strand.from_anchor.resolve(&from_rect);
            let end = strand.to_anchor.resolve(&to_rect);
            strand.seed(start, end);
        }

        self.index.insert(connector.id.clone(), slot);
        self.adjacency
            .entry(connector.from.clone())
            .or_default()
            .push(slot);
        self.adjacency
            .entry(connector.to.clone())
            .or_default()
            .push(slot);

        RegisterOutcome::Registered
    }

    /// Remove a connector from the simulation, returning its slot to the
    /// free list. Unknown ids are ignored.
    pub fn unregister(&mut self, connector_id: &str) {
        let Some(slot) = self.index.remove(connector_id) else {
            return;
        };

        let strand = &mut self.strands[slot];
        for node in [strand.from.clone(), strand.to.clone()] {
            if let Some(slots) = self.adjacency.get_mut(&node) {
                slots.retain(|&s| s != slot);
                if slots.is_empty() {
                    self.adjacency.remove(&node);
                }
            }
        }

        self.strands[slot] = Strand::default();
        self.free.push(slot);
    }

    /// Wake every connector incident to a node. Called by the host whenever
    /// the node's box changes.
    pub fn wake(&mut self, node_id: &str) {
        if let Some(slots) = self.adjacency.get(node_id) {
            for &slot in slots {
                self.strands[slot].awake = true;
            }
        }
    }

    /// Whether a connector is currently being simulated
    pub fn is_awake(&self, connector_id: &str) -> bool {
        self.index
            .get(connector_id)
            .map(|&slot| self.strands[slot].awake)
            .unwrap_or(false)
    }

    /// Snapshot a connector's polyline and stress
    pub fn polyline(&self, connector_id: &str) -> Option<StrandView> {
        let &slot = self.index.get(connector_id)?;
        let strand = &self.strands[slot];
        if !strand.seeded {
            return None;
        }

        let mut points = [Point::default(); POINTS_COUNT];
        for (out, p) in points.iter_mut().zip(strand.points.iter()) {
            *out = Point::new(p.x, p.y);
        }
        Some(StrandView {
            points,
            stress: strand.stress,
        })
    }

    /// Re-lay a connector as a straight line with zero velocity and zero
    /// stress, exactly as on registration, and wake it. The caller invokes
    /// this after applying a layout result and re-optimizing ports.
    pub fn reseed(&mut self, connector_id: &str, boxes: &NodeBoxes) {
        if let Some(&slot) = self.index.get(connector_id) {
            self.reseed_slot(slot, boxes);
        }
    }

    /// Update a connector's ports (e.g. after `closest_pair`) without
    /// touching its geometry; takes effect at the next pin or reseed.
    pub fn set_ports(&mut self, connector_id: &str, from: Anchor, to: Anchor) {
        if let Some(&slot) = self.index.get(connector_id) {
            let strand = &mut self.strands[slot];
            strand.from_anchor = from;
            strand.to_anchor = to;
            strand.awake = true;
        }
    }

    fn reseed_slot(&mut self, slot: usize, boxes: &NodeBoxes) {
        let strand = &mut self.strands[slot];
        strand.awake = true;
        match (boxes.get(&strand.from), boxes.get(&strand.to)) {
            (Some(from_rect), Some(to_rect)) => {
                let start = strand.from_anchor.resolve(&from_rect);
                let end = strand.to_anchor.resolve(&to_rect);
                strand.seed(start, end);
            }
            // Box data missing: fall back to deferred seeding
            _ => strand.seeded = false,
        }
    }

    /// Advance every awake strand by one frame: re-pin endpoints, integrate
    /// the interior points, relax the distance constraints, record stress,
    /// and put settled strands to sleep.
    ///
    /// A strand whose endpoint box is unavailable is skipped this frame and
    /// picks up again once the box resolves.
    pub fn step(&mut self, boxes: &NodeBoxes) {
        let PhysicsConfig {
            gravity,
            segment_length,
            relaxation_passes,
            damping,
            sleep_threshold,
        } = self.config;
        let last = POINTS_COUNT - 1;

        for strand in &mut self.strands {
            if !strand.live || !strand.awake {
                continue;
            }

            let (Some(from_rect), Some(to_rect)) =
                (boxes.get(&strand.from), boxes.get(&strand.to))
            else {
                continue;
            };
            let start = strand.from_anchor.resolve(&from_rect);
            let end = strand.to_anchor.resolve(&to_rect);

            if !strand.seeded {
                // Registered before its boxes existed; lay it out now
                strand.seed(start, end);
            }

            strand.points[0] = PointState {
                x: start.x,
                y: start.y,
                px: start.x,
                py: start.y,
            };
            strand.points[last] = PointState {
                x: end.x,
                y: end.y,
                px: end.x,
                py: end.y,
            };

            for p in &mut strand.points[1..last] {
                let vx = (p.x - p.px) * damping;
                let vy = (p.y - p.py) * damping;
                p.px = p.x;
                p.py = p.y;
                p.x += vx;
                p.y += vy + gravity;
            }

            let mut max_stress = 0.0f64;
            for _ in 0..relaxation_passes {
                for i in 0..last {
                    let dx = strand.points[i + 1].x - strand.points[i].x;
                    let dy = strand.points[i + 1].y - strand.points[i].y;
                    let dist = (dx * dx + dy * dy).sqrt();
                    if dist == 0.0 {
                        continue;
                    }

                    let diff = dist - segment_length;
                    if diff > max_stress {
                        max_stress = diff;
                    }

                    // Each free endpoint takes half the correction; pinned
                    // endpoints never move
                    let shift_x = dx / dist * diff * 0.5;
                    let shift_y = dy / dist * diff * 0.5;
                    if i != 0 {
                        strand.points[i].x += shift_x;
                        strand.points[i].y += shift_y;
                    }
                    if i + 1 != last {
                        strand.points[i + 1].x -= shift_x;
                        strand.points[i + 1].y -= shift_y;
                    }
                }
            }
            strand.stress = max_stress;

            // Motion is the frame's net displacement (the velocity the next
            // frame would see). Measuring before relaxation would read zero
            // on a freshly seeded strand and put it to sleep mid-sag.
            let total_motion: f64 = strand.points[1..last]
                .iter()
                .map(|p| (p.x - p.px).abs() + (p.y - p.py).abs())
                .sum();
            if total_motion < sleep_threshold {
                strand.awake = false;
                debug!(connector = %strand.id, "strand settled, sleeping");
            }
        }
    }

    /// Find the connector whose polyline passes closest to `point`, within
    /// `tolerance`. Ties keep the earliest slot. This is the hit-test the
    /// host uses to select a thread under the cursor.
    pub fn pick(&self, point: Point, tolerance: f64) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;

        for strand in &self.strands {
            if !strand.live || !strand.seeded {
                continue;
            }
            for i in 0..POINTS_COUNT - 1 {
                let a = Point::new(strand.points[i].x, strand.points[i].y);
                let b = Point::new(strand.points[i + 1].x, strand.points[i + 1].y);
                let dist = point_segment_distance(point, a, b);
                if dist <= tolerance && best.map(|(_, d)| dist < d).unwrap_or(true) {
                    best = Some((&strand.id, dist));
                }
            }
        }

        best.map(|(id, _)| id)
    }
}
