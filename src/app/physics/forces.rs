use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

const MIN_DISTANCE: f32 = 1.0;

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
    pub(super) margin: f32,
    pub(super) max_reach_sq: f32,
}

/// Deterministic separation axis for coincident points, so stacked nodes
/// break apart instead of sitting on a zero-length vector.
fn separation_axis(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

fn pair_repulsion(point: Vec2, other: Vec2, charge: f32) -> Vec2 {
    let delta = point - other;
    let distance = delta.length().max(MIN_DISTANCE);
    let direction = if delta.length_sq() > 0.0001 {
        delta / distance
    } else {
        vec2(1.0, 0.0)
    };
    // charge is negative for repulsion, matching the sign convention of the
    // many-body force this models.
    direction * (-charge / distance)
}

pub(super) fn accumulate_repulsion(
    cell: &QuadNode,
    index: usize,
    positions: &[Vec2],
    charge: f32,
    theta: f32,
    force: &mut Vec2,
) {
    if cell.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if cell.is_leaf() {
        for &other in &cell.members {
            if other == index {
                continue;
            }
            *force += pair_repulsion(point, positions[other], charge);
        }
        return;
    }

    let delta = point - cell.center_of_mass;
    let distance = delta.length().max(MIN_DISTANCE);
    let far_enough = !cell.bounds.encloses(point) && (cell.bounds.side_length() / distance) < theta;

    if far_enough {
        *force += (delta / distance) * (-charge * cell.mass / distance);
        return;
    }

    for child in cell.children.iter().flatten() {
        accumulate_repulsion(child, index, positions, charge, theta, force);
    }
}

fn collide_pair(
    from: usize,
    to: usize,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    forces: &mut [Vec2],
) {
    let delta = positions[from] - positions[to];
    let distance_sq = delta.length_sq();
    let exclusion = radii[from] + radii[to] + params.margin;
    if distance_sq >= exclusion * exclusion {
        return;
    }

    let distance = distance_sq.sqrt();
    let direction = if distance > 0.0001 {
        delta / distance
    } else {
        separation_axis(from, to)
    };

    let push = (exclusion - distance) * params.strength * 0.5;
    forces[from] += direction * push;
    forces[to] -= direction * push;
}

pub(super) fn accumulate_collisions(
    cell_a: &QuadNode,
    cell_b: &QuadNode,
    same_cell: bool,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    forces: &mut [Vec2],
) {
    if cell_a.bounds.gap_sq_to(cell_b.bounds) > params.max_reach_sq {
        return;
    }

    if cell_a.is_leaf() && cell_b.is_leaf() {
        if same_cell {
            for i in 0..cell_a.members.len() {
                for j in (i + 1)..cell_a.members.len() {
                    collide_pair(
                        cell_a.members[i],
                        cell_a.members[j],
                        positions,
                        radii,
                        params,
                        forces,
                    );
                }
            }
        } else {
            for &from in &cell_a.members {
                for &to in &cell_b.members {
                    collide_pair(from, to, positions, radii, params, forces);
                }
            }
        }
        return;
    }

    if same_cell {
        for first in 0..4 {
            let Some(child_a) = cell_a.children[first].as_ref() else {
                continue;
            };

            accumulate_collisions(child_a, child_a, true, positions, radii, params, forces);

            for second in (first + 1)..4 {
                let Some(child_b) = cell_a.children[second].as_ref() else {
                    continue;
                };
                accumulate_collisions(child_a, child_b, false, positions, radii, params, forces);
            }
        }
        return;
    }

    let split_a = if cell_a.is_leaf() {
        false
    } else if cell_b.is_leaf() {
        true
    } else {
        cell_a.bounds.extent >= cell_b.bounds.extent
    };

    if split_a {
        for child in cell_a.children.iter().flatten() {
            accumulate_collisions(child, cell_b, false, positions, radii, params, forces);
        }
    } else {
        for child in cell_b.children.iter().flatten() {
            accumulate_collisions(cell_a, child, false, positions, radii, params, forces);
        }
    }
}
