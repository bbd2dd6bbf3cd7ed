//! Cluster layout engine
//!
//! One-shot declutter around a focal node: the board graph is split into
//! connected components, the focal component is arranged as concentric
//! rings of increasing BFS distance, and the remaining components settle
//! around it without overlapping. The result is a proposal — a map of new
//! top-left positions the host applies to its nodes before reseeding the
//! affected connectors.
//!
//! The engine is deterministic for a given input order, never fails, and
//! never loops unboundedly: collision retries are capped and exhaustion
//! degrades to best-effort placement, reported through
//! [`LayoutOutcome::degraded_nodes`] and [`LayoutOutcome::satellite_fallbacks`].

pub mod components;
pub mod config;
mod rings;
mod satellites;

pub use components::{build_adjacency, connected_components};
pub use config::LayoutConfig;

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::board::{Connector, Node};
use crate::geometry::{Point, Rect};

use rings::ring_layout;
use satellites::place_satellites;

/// The result of a layout pass
#[derive(Debug, Clone, Default)]
pub struct LayoutOutcome {
    /// Proposed top-left position per node id
    pub positions: HashMap<String, Point>,
    /// Node placements accepted after exhausting their collision retries;
    /// these may overlap
    pub degraded_nodes: u32,
    /// Satellite clusters parked at the fallback offset
    pub satellite_fallbacks: u32,
}

impl LayoutOutcome {
    /// Whether every placement passed its collision checks
    pub fn is_clean(&self) -> bool {
        self.degraded_nodes == 0 && self.satellite_fallbacks == 0
    }
}

/// Lay out the board around `focal` with the default configuration
pub fn layout(nodes: &[Node], connectors: &[Connector], focal: &str) -> LayoutOutcome {
    layout_with_config(nodes, connectors, focal, &LayoutConfig::default())
}

/// Lay out the board around `focal`.
///
/// The focal node keeps its current position; everything reachable from it
/// is rearranged into rings around it, and disconnected clusters move to
/// clear space nearby. An unknown focal id yields an empty outcome.
pub fn layout_with_config(
    nodes: &[Node],
    connectors: &[Connector],
    focal: &str,
    config: &LayoutConfig,
) -> LayoutOutcome {
    let Some(focal_node) = nodes.iter().find(|n| n.id == focal) else {
        warn!(focal, "focal node not on the board, layout skipped");
        return LayoutOutcome::default();
    };
    let anchor = focal_node.rect().center();

    let adjacency = build_adjacency(nodes, connectors);
    let clusters = connected_components(nodes, &adjacency);
    // Every node is in exactly one component, so this always finds one
    let main_index = clusters
        .iter()
        .position(|c| c.iter().any(|&i| nodes[i].id == focal))
        .unwrap_or(0);

    let sizes: HashMap<&str, (f64, f64)> = nodes
        .iter()
        .map(|n| (n.id.as_str(), (n.w, n.h)))
        .collect();

    // Main cluster, anchored so the focal node keeps its world position
    let main_members: Vec<&Node> = clusters[main_index].iter().map(|&i| &nodes[i]).collect();
    let main_ring = ring_layout(&main_members, &adjacency, focal, config);
    let mut degraded_nodes = main_ring.degraded;

    let mut positions = HashMap::new();
    for (id, center) in &main_ring.positions {
        let world = Point::new(center.x + anchor.x, center.y + anchor.y);
        positions.insert(id.clone(), top_left(world, &sizes, id));
    }

    // Satellite clusters, each ring-laid from its first member
    let mut satellite_rings = Vec::new();
    for (index, cluster) in clusters.iter().enumerate() {
        if index == main_index {
            continue;
        }
        let members: Vec<&Node> = cluster.iter().map(|&i| &nodes[i]).collect();
        let ring = ring_layout(&members, &adjacency, &members[0].id, config);
        degraded_nodes += ring.degraded;
        satellite_rings.push(ring);
    }

    let main_bounds = Rect::new(
        main_ring.bounds.x + anchor.x,
        main_ring.bounds.y + anchor.y,
        main_ring.bounds.w,
        main_ring.bounds.h,
    );
    let (offsets, satellite_fallbacks) =
        place_satellites(&satellite_rings, anchor, main_bounds, config);

    for (ring, offset) in satellite_rings.iter().zip(&offsets) {
        for (id, center) in &ring.positions {
            let world = Point::new(center.x + offset.x, center.y + offset.y);
            positions.insert(id.clone(), top_left(world, &sizes, id));
        }
    }

    debug!(
        nodes = positions.len(),
        clusters = clusters.len(),
        degraded_nodes,
        satellite_fallbacks,
        "layout complete"
    );

    LayoutOutcome {
        positions,
        degraded_nodes,
        satellite_fallbacks,
    }
}

/// Convert a node center to the top-left corner the host stores
fn top_left(center: Point, sizes: &HashMap<&str, (f64, f64)>, id: &str) -> Point {
    let (w, h) = sizes.get(id).copied().unwrap_or((0.0, 0.0));
    Point::new(center.x - w / 2.0, center.y - h / 2.0)
}
