use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy)]
pub(super) struct CellBounds {
    pub(super) center: Vec2,
    pub(super) extent: f32,
}

impl CellBounds {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);

        for point in points {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let span = (max.x - min.x).max(max.y - min.y).max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            extent: (span * 0.5) + 1.0,
        })
    }

    pub(super) fn encloses(self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.extent
            && (point.y - self.center.y).abs() <= self.extent
    }

    pub(super) fn side_length(self) -> f32 {
        self.extent * 2.0
    }

    pub(super) fn gap_sq_to(self, other: Self) -> f32 {
        let dx = ((self.center.x - other.center.x).abs() - (self.extent + other.extent)).max(0.0);
        let dy = ((self.center.y - other.center.y).abs() - (self.extent + other.extent)).max(0.0);
        (dx * dx) + (dy * dy)
    }

    fn quadrant_of(self, point: Vec2) -> usize {
        ((point.x >= self.center.x) as usize) | (((point.y >= self.center.y) as usize) << 1)
    }

    fn child_bounds(self, quadrant: usize) -> Self {
        let quarter = self.extent * 0.5;
        let x = if quadrant & 1 == 0 { -quarter } else { quarter };
        let y = if quadrant & 2 == 0 { -quarter } else { quarter };

        Self {
            center: self.center + vec2(x, y),
            extent: quarter,
        }
    }
}

pub(super) struct QuadNode {
    pub(super) bounds: CellBounds,
    pub(super) center_of_mass: Vec2,
    pub(super) mass: f32,
    pub(super) members: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let bounds = CellBounds::enclosing(positions)?;
        let members = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_cell(bounds, members, positions, 0))
    }

    fn build_cell(
        bounds: CellBounds,
        members: Vec<usize>,
        positions: &[Vec2],
        depth: usize,
    ) -> Self {
        let mass = members.len() as f32;
        let mut center_of_mass = Vec2::ZERO;
        for &index in &members {
            center_of_mass += positions[index];
        }
        if mass > 0.0 {
            center_of_mass /= mass;
        }

        let mut cell = Self {
            bounds,
            center_of_mass,
            mass,
            members,
            children: std::array::from_fn(|_| None),
        };

        if depth >= MAX_DEPTH || cell.members.len() <= LEAF_CAPACITY {
            return cell;
        }

        let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
        for &index in &cell.members {
            buckets[bounds.quadrant_of(positions[index])].push(index);
        }

        // All members on one corner: splitting further cannot separate them.
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return cell;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            cell.children[quadrant] = Some(Box::new(Self::build_cell(
                bounds.child_bounds(quadrant),
                bucket,
                positions,
                depth + 1,
            )));
        }
        cell.members.clear();
        cell
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }
}
