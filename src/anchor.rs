//! Port resolution: named anchors on a node's bounding box
//!
//! Connectors attach to nodes at named ports (`top`, `bottom`, `left`,
//! `right`, `center`). Port names come from stored board data and are not
//! trusted: anything unrecognized resolves to the box center.

use crate::geometry::{Point, Rect};

/// A named attachment point on a node's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
    #[default]
    Center,
}

/// The four edge anchors, in the tie-break order used by `closest_pair`
const EDGE_ANCHORS: [Anchor; 4] = [Anchor::Top, Anchor::Bottom, Anchor::Left, Anchor::Right];

impl Anchor {
    /// Parse a port name. Unknown names (and `center`) fall back to `Center`;
    /// there is no failure mode.
    pub fn parse(name: &str) -> Anchor {
        match name {
            "top" => Anchor::Top,
            "bottom" => Anchor::Bottom,
            "left" => Anchor::Left,
            "right" => Anchor::Right,
            _ => Anchor::Center,
        }
    }

    /// World-space anchor point on `rect`
    pub fn resolve(&self, rect: &Rect) -> Point {
        match self {
            Anchor::Top => Point::new(rect.x + rect.w / 2.0, rect.y),
            Anchor::Bottom => Point::new(rect.x + rect.w / 2.0, rect.bottom()),
            Anchor::Left => Point::new(rect.x, rect.y + rect.h / 2.0),
            Anchor::Right => Point::new(rect.right(), rect.y + rect.h / 2.0),
            Anchor::Center => rect.center(),
        }
    }

    /// Canonical port name for serialization
    pub fn name(&self) -> &'static str {
        match self {
            Anchor::Top => "top",
            Anchor::Bottom => "bottom",
            Anchor::Left => "left",
            Anchor::Right => "right",
            Anchor::Center => "center",
        }
    }
}

/// Pick the pair of edge anchors minimizing the distance between the two
/// boxes. Used after a layout pass to re-point connectors at the nearest
/// faces of their freshly moved endpoints. Ties resolve to the first pair in
/// enumeration order, keeping the choice deterministic.
pub fn closest_pair(from: &Rect, to: &Rect) -> (Anchor, Anchor) {
    let mut best = (Anchor::Top, Anchor::Top);
    let mut best_dist = f64::INFINITY;

    for fa in EDGE_ANCHORS {
        let fp = fa.resolve(from);
        for ta in EDGE_ANCHORS {
            let dist = fp.distance(ta.resolve(to));
            if dist < best_dist {
                best_dist = dist;
                best = (fa, ta);
            }
        }
    }

    best
}
