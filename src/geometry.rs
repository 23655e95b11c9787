use eframe::egui::{Pos2, Vec2, vec2};

const MIN_LINK_LENGTH: f32 = 1e-4;

/// `ref_x` is the distance from the target's center to the arrow tip. It is
/// always derived from the node radius and arrow width so the two stay in
/// step when either changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowMarker {
    width: f32,
    ref_x: f32,
}

impl ArrowMarker {
    pub fn new(node_radius: f32, arrow_width: f32) -> Self {
        let width = arrow_width.max(0.0);
        Self {
            width,
            ref_x: node_radius.max(0.0) + width * 0.5,
        }
    }

    /// Tip, then the two back corners, of the arrowhead triangle. The tip
    /// sits `ref_x` short of `target` on the segment from `source`.
    pub fn triangle(&self, source: Pos2, target: Pos2) -> Option<[Pos2; 3]> {
        let direction = unit_direction(source, target)?;
        let tip = target - direction * self.ref_x;
        let back = tip - direction * self.width;
        let spread = perpendicular(direction) * (self.width * 0.5);
        Some([tip, back + spread, back - spread])
    }
}

/// Where a link's relationship label sits: the midpoint, pushed sideways by
/// `node_radius` along the link direction rotated by +90°.
///
/// Coincident endpoints have no direction, so the label stays on the midpoint.
pub fn label_position(source: Pos2, target: Pos2, node_radius: f32) -> Pos2 {
    let midpoint = source.lerp(target, 0.5);
    match unit_direction(source, target) {
        Some(direction) => midpoint + perpendicular(direction) * node_radius,
        None => midpoint,
    }
}

fn perpendicular(direction: Vec2) -> Vec2 {
    vec2(-direction.y, direction.x)
}

fn unit_direction(source: Pos2, target: Pos2) -> Option<Vec2> {
    let delta = target - source;
    let length = delta.length();
    (length > MIN_LINK_LENGTH).then(|| delta / length)
}
