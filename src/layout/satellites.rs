//! Placement of satellite clusters around the main cluster

use tracing::warn;

use crate::geometry::{Point, Rect};

use super::config::LayoutConfig;
use super::rings::RingLayout;

/// Choose a world offset for each satellite cluster, in cluster order, by an
/// outward spiral around `anchor` (the main cluster's world position). A
/// satellite that cannot find a clear spot within its allotted attempts
/// lands on the fixed fallback offset. Returns the offsets and the fallback
/// count.
pub(crate) fn place_satellites(
    satellites: &[RingLayout],
    anchor: Point,
    main_bounds: Rect,
    config: &LayoutConfig,
) -> (Vec<Point>, u32) {
    let mut placed_bounds = vec![main_bounds];
    let mut offsets = Vec::with_capacity(satellites.len());
    let mut fallbacks = 0u32;

    for (index, satellite) in satellites.iter().enumerate() {
        let mut chosen = None;

        for attempt in 0..config.satellite_attempts {
            let angle = attempt as f64 * config.spiral_angle_step;
            let radius = config.ring_step() + attempt as f64 * config.spiral_radius_step;
            let offset = Point::new(
                anchor.x + radius * angle.cos(),
                anchor.y + radius * angle.sin(),
            );
            let world = translate(satellite.bounds, offset);

            if placed_bounds.iter().all(|b| !b.intersects(&world)) {
                chosen = Some(offset);
                break;
            }
        }

        let offset = chosen.unwrap_or_else(|| {
            fallbacks += 1;
            warn!(satellite = index, "satellite spiral exhausted, using fallback offset");
            Point::new(
                anchor.x + config.satellite_fallback_offset.0,
                anchor.y + config.satellite_fallback_offset.1,
            )
        });

        placed_bounds.push(translate(satellite.bounds, offset));
        offsets.push(offset);
    }

    (offsets, fallbacks)
}

fn translate(rect: Rect, by: Point) -> Rect {
    Rect::new(rect.x + by.x, rect.y + by.y, rect.w, rect.h)
}
