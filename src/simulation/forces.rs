use eframe::egui::{Pos2, Vec2, vec2};

use crate::graph::Node;

use super::quadtree::Cell;

const DISTANCE_MIN_SQ: f32 = 1.0;

/// Deterministic source of the tiny offsets used to separate coincident
/// points, so identical inputs always produce identical layouts.
pub(super) struct Jiggle {
    state: u32,
}

impl Jiggle {
    pub(super) fn new() -> Self {
        Self { state: 1 }
    }

    fn next_unit(&mut self) -> f32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (self.state as f64 / 4_294_967_296.0) as f32
    }

    pub(super) fn sample(&mut self) -> f32 {
        (self.next_unit() - 0.5) * 1e-6
    }

    fn separate(&mut self, mut delta: Vec2) -> Vec2 {
        if delta.x == 0.0 {
            delta.x = self.sample();
        }
        if delta.y == 0.0 {
            delta.y = self.sample();
        }
        delta
    }
}

#[derive(Clone, Copy)]
pub(super) struct ManyBody {
    /// Charge already scaled by the current alpha.
    pub(super) strength: f32,
    pub(super) theta: f32,
}

/// Adds the repulsion every other point exerts on `index` to `velocity`,
/// approximating distant cells by their centroid.
pub(super) fn accumulate_many_body(
    cell: &Cell,
    index: usize,
    positions: &[Pos2],
    params: ManyBody,
    jiggle: &mut Jiggle,
    velocity: &mut Vec2,
) {
    if cell.count <= 0.0 {
        return;
    }

    let point = positions[index];

    if cell.is_leaf() {
        for &other in &cell.points {
            if other == index {
                continue;
            }
            let delta = jiggle.separate(positions[other] - point);
            *velocity += delta * (params.strength / softened_length_sq(delta));
        }
        return;
    }

    let delta = cell.centroid - point;
    let width = cell.bounds.width();
    let far_enough = width * width / (params.theta * params.theta) < delta.length_sq();
    if far_enough && !cell.bounds.contains(point) {
        let delta = jiggle.separate(delta);
        *velocity += delta * (params.strength * cell.count / softened_length_sq(delta));
        return;
    }

    for child in cell.children.iter().flatten() {
        accumulate_many_body(child, index, positions, params, jiggle, velocity);
    }
}

fn softened_length_sq(delta: Vec2) -> f32 {
    let length_sq = delta.length_sq();
    if length_sq < DISTANCE_MIN_SQ {
        (DISTANCE_MIN_SQ * length_sq).sqrt()
    } else {
        length_sq
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Spring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) stiffness: f32,
    /// Share of the correction applied to the target; the rest moves the source.
    pub(super) bias: f32,
}

pub(super) fn apply_springs(
    nodes: &mut [Node],
    springs: &[Spring],
    rest_length: f32,
    alpha: f32,
    jiggle: &mut Jiggle,
) {
    for spring in springs {
        if spring.source == spring.target || spring.stiffness == 0.0 {
            continue;
        }

        let source = &nodes[spring.source];
        let target = &nodes[spring.target];
        let delta = (target.position + target.velocity) - (source.position + source.velocity);
        let delta = if delta == Vec2::ZERO {
            vec2(jiggle.sample(), jiggle.sample())
        } else {
            delta
        };

        let length = delta.length();
        let correction = delta * ((length - rest_length) / length * alpha * spring.stiffness);

        nodes[spring.target].velocity -= correction * spring.bias;
        nodes[spring.source].velocity += correction * (1.0 - spring.bias);
    }
}

pub(super) fn apply_centering(nodes: &mut [Node], center: Pos2) {
    if nodes.is_empty() {
        return;
    }

    let mut sum = Vec2::ZERO;
    for node in nodes.iter() {
        sum += node.position.to_vec2();
    }
    let shift = (sum / nodes.len() as f32) - center.to_vec2();

    for node in nodes.iter_mut() {
        if !node.is_pinned() {
            node.position -= shift;
        }
    }
}
