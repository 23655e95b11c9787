use eframe::egui::{Pos2, Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct Square {
    pub(super) center: Pos2,
    pub(super) half_extent: f32,
}

impl Square {
    fn enclosing(points: &[Pos2]) -> Option<Self> {
        let mut min = Pos2::new(f32::INFINITY, f32::INFINITY);
        let mut max = Pos2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let span = (max - min).max_elem().max(1.0);
        Some(Self {
            center: min + (max - min) * 0.5,
            half_extent: span * 0.5 + 1.0,
        })
    }

    pub(super) fn contains(self, point: Pos2) -> bool {
        let offset = point - self.center;
        offset.x.abs() <= self.half_extent && offset.y.abs() <= self.half_extent
    }

    pub(super) fn width(self) -> f32 {
        self.half_extent * 2.0
    }

    fn quadrant(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let offset = match quadrant {
            0 => vec2(-quarter, -quarter),
            1 => vec2(quarter, -quarter),
            2 => vec2(-quarter, quarter),
            _ => vec2(quarter, quarter),
        };
        Self {
            center: self.center + offset,
            half_extent: quarter,
        }
    }

    fn quadrant_of(self, point: Pos2) -> usize {
        match (point.x >= self.center.x, point.y >= self.center.y) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }
}

pub(super) struct Cell {
    pub(super) bounds: Square,
    pub(super) centroid: Pos2,
    pub(super) count: f32,
    /// Point indices; only populated on leaves.
    pub(super) points: Vec<usize>,
    pub(super) children: [Option<Box<Cell>>; 4],
}

impl Cell {
    pub(super) fn build(points: &[Pos2]) -> Option<Self> {
        let bounds = Square::enclosing(points)?;
        Some(Self::build_cell(bounds, (0..points.len()).collect(), points, 0))
    }

    fn build_cell(bounds: Square, indices: Vec<usize>, points: &[Pos2], depth: usize) -> Self {
        let mut sum = Vec2::ZERO;
        for &index in &indices {
            sum += points[index].to_vec2();
        }
        let count = indices.len() as f32;
        let centroid = if count > 0.0 {
            (sum / count).to_pos2()
        } else {
            bounds.center
        };

        let mut cell = Self {
            bounds,
            centroid,
            count,
            points: indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= MAX_DEPTH || cell.points.len() <= LEAF_CAPACITY {
            return cell;
        }

        // Coincident points never separate; keep them in one leaf.
        let first = points[cell.points[0]];
        if cell.points.iter().all(|&index| points[index] == first) {
            return cell;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for &index in &cell.points {
            buckets[bounds.quadrant_of(points[index])].push(index);
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                cell.children[quadrant] = Some(Box::new(Self::build_cell(
                    bounds.quadrant(quadrant),
                    bucket,
                    points,
                    depth + 1,
                )));
            }
        }
        cell.points.clear();
        cell
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}
