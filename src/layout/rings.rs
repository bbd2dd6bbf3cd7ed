//! Concentric-ring placement of one connected component
//!
//! Nodes are layered by BFS distance from the root and distributed around
//! grid-snapped rings, one ring per layer. Every placement is checked
//! against already-placed node rectangles and connector segments; failures
//! walk an outward spiral until a clear spot is found or the attempts run
//! out, in which case the last candidate is kept as a best effort.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::warn;

use crate::board::Node;
use crate::geometry::{segment_intersects_rect, Point, Rect};

use super::config::LayoutConfig;

/// One component laid out in local coordinates, root at the origin
#[derive(Debug, Clone)]
pub(crate) struct RingLayout {
    /// Node centers in placement order
    pub positions: Vec<(String, Point)>,
    /// Placements that exhausted their spiral attempts
    pub degraded: u32,
    /// Union of the padded node rectangles
    pub bounds: Rect,
}

/// Snap a coordinate to the grid pitch
fn snap(value: f64, grid: f64) -> f64 {
    (value / grid).round() * grid
}

/// Node rectangle (padded) for a node of size (w, h) centered at `center`
fn padded_rect_at(center: Point, w: f64, h: f64, padding: f64) -> Rect {
    Rect::new(center.x - w / 2.0, center.y - h / 2.0, w, h).padded(padding)
}

/// Lay out `members` as rings around `root`. `adjacency` may span the whole
/// board; traversal never leaves the member set.
pub(crate) fn ring_layout(
    members: &[&Node],
    adjacency: &HashMap<String, Vec<String>>,
    root: &str,
    config: &LayoutConfig,
) -> RingLayout {
    let member_set: HashSet<&str> = members.iter().map(|n| n.id.as_str()).collect();
    let sizes: HashMap<&str, (f64, f64)> = members
        .iter()
        .map(|n| (n.id.as_str(), (n.w, n.h)))
        .collect();

    // BFS layering from the root
    let mut depth: HashMap<String, usize> = HashMap::new();
    let mut layers: Vec<Vec<String>> = vec![vec![root.to_string()]];
    depth.insert(root.to_string(), 0);
    let mut queue: VecDeque<String> = VecDeque::new();
    queue.push_back(root.to_string());

    while let Some(id) = queue.pop_front() {
        let d = depth[&id];
        if let Some(neighbors) = adjacency.get(&id) {
            for neighbor in neighbors {
                if !member_set.contains(neighbor.as_str()) || depth.contains_key(neighbor) {
                    continue;
                }
                depth.insert(neighbor.clone(), d + 1);
                if layers.len() <= d + 1 {
                    layers.push(Vec::new());
                }
                layers[d + 1].push(neighbor.clone());
                queue.push_back(neighbor.clone());
            }
        }
    }

    let mut placed: HashMap<String, Point> = HashMap::new();
    let mut placed_rects: Vec<(String, Rect)> = Vec::new();
    let mut segments: Vec<(Point, Point)> = Vec::new();
    let mut positions: Vec<(String, Point)> = Vec::new();
    let mut degraded = 0u32;

    // Root sits at the local origin
    let (root_w, root_h) = sizes.get(root).copied().unwrap_or((0.0, 0.0));
    let origin = Point::new(0.0, 0.0);
    let mut bounds = padded_rect_at(origin, root_w, root_h, config.collision_padding);
    placed.insert(root.to_string(), origin);
    placed_rects.push((root.to_string(), bounds));
    positions.push((root.to_string(), origin));

    for d in 1..layers.len() {
        // Order the layer by the average polar angle of its placed parents
        // (ties keep discovery order)
        let mut ordered: Vec<(f64, &String)> = layers[d]
            .iter()
            .map(|id| (parent_angle(id, d, adjacency, &depth, &placed), id))
            .collect();
        ordered.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let count = ordered.len();
        let angle_step = std::f64::consts::TAU / count as f64;
        let base_radius = d as f64 * config.ring_step();

        for (slot, (_, id)) in ordered.iter().enumerate() {
            let (w, h) = sizes.get(id.as_str()).copied().unwrap_or((0.0, 0.0));
            let base_angle = slot as f64 * angle_step;

            let placed_neighbors: Vec<(String, Point)> = adjacency
                .get(id.as_str())
                .map(|neighbors| {
                    neighbors
                        .iter()
                        .filter_map(|n| placed.get(n).map(|&c| (n.clone(), c)))
                        .collect()
                })
                .unwrap_or_default();

            let mut accepted = None;
            let mut candidate = origin;
            for attempt in 0..config.node_place_attempts {
                let angle = base_angle + attempt as f64 * config.spiral_angle_step;
                let radius = base_radius + attempt as f64 * config.spiral_radius_step;
                candidate = Point::new(
                    snap(radius * angle.cos(), config.spacing_x),
                    snap(radius * angle.sin(), config.spacing_y),
                );
                let rect = padded_rect_at(candidate, w, h, config.collision_padding);

                if placement_ok(&rect, candidate, &placed_neighbors, &placed_rects, &segments) {
                    accepted = Some(candidate);
                    break;
                }
            }

            let center = accepted.unwrap_or_else(|| {
                // Retries exhausted: keep the last spiral candidate and
                // carry on rather than failing the layout
                degraded += 1;
                warn!(node = %id, "placement retries exhausted, accepting overlap");
                candidate
            });

            let rect = padded_rect_at(center, w, h, config.collision_padding);
            bounds = bounds.union(&rect);
            placed.insert((*id).clone(), center);
            placed_rects.push(((*id).clone(), rect));
            positions.push(((*id).clone(), center));
            for (_, neighbor_center) in &placed_neighbors {
                segments.push((center, *neighbor_center));
            }
        }
    }

    RingLayout {
        positions,
        degraded,
        bounds,
    }
}

/// Average polar angle of a node's already-placed parents in the previous
/// layer; zero when no parent has a meaningful angle
fn parent_angle(
    id: &str,
    layer: usize,
    adjacency: &HashMap<String, Vec<String>>,
    depth: &HashMap<String, usize>,
    placed: &HashMap<String, Point>,
) -> f64 {
    let Some(neighbors) = adjacency.get(id) else {
        return 0.0;
    };

    let mut sum = 0.0;
    let mut count = 0usize;
    for neighbor in neighbors {
        if depth.get(neighbor) == Some(&(layer - 1)) {
            if let Some(center) = placed.get(neighbor) {
                sum += center.y.atan2(center.x);
                count += 1;
            }
        }
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// The three collision checks for a candidate placement
fn placement_ok(
    rect: &Rect,
    center: Point,
    placed_neighbors: &[(String, Point)],
    placed_rects: &[(String, Rect)],
    segments: &[(Point, Point)],
) -> bool {
    // (i) no overlap with any placed node rectangle
    for (_, other) in placed_rects {
        if rect.intersects(other) {
            return false;
        }
    }

    // (ii) no placed connector segment through the rectangle
    for (a, b) in segments {
        if segment_intersects_rect(*a, *b, rect) {
            return false;
        }
    }

    // (iii) no new edge through another placed node's rectangle
    for (neighbor, neighbor_center) in placed_neighbors {
        for (other, other_rect) in placed_rects {
            if other == neighbor {
                continue;
            }
            if segment_intersects_rect(center, *neighbor_center, other_rect) {
                return false;
            }
        }
    }

    true
}
