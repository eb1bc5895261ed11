mod forces;
mod quadtree;

use eframe::egui::Vec2;

use super::RenderGraph;
use forces::{CollisionParams, accumulate_collisions, accumulate_repulsion};
use quadtree::QuadNode;

const BARNES_HUT_THETA: f32 = 0.72;
const MAX_SPEED: f32 = 80.0;

/// Simulation temperature while a node is being dragged.
pub(in crate::app) const DRAG_ALPHA: f32 = 0.3;

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct SimulationConfig {
    pub link_distance: f32,
    pub link_strength: f32,
    pub charge: f32,
    pub center_strength: f32,
    pub collision_margin: f32,
    pub collision_strength: f32,
    pub velocity_decay: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            link_distance: 120.0,
            link_strength: 0.08,
            charge: -900.0,
            center_strength: 0.05,
            collision_margin: 10.0,
            collision_strength: 0.55,
            velocity_decay: 0.6,
            alpha_min: 0.001,
            // reaches alpha_min from 1.0 in ~300 ticks
            alpha_decay: 1.0 - 0.001_f32.powf(1.0 / 300.0),
        }
    }
}

/// Advances the layout by one tick. Returns whether the simulation is still
/// hot; `false` means it has settled and needs no further frames.
///
/// All four force passes read the positions committed by the previous tick;
/// positions only change in the final integration loop.
pub(in crate::app) fn step_simulation(cache: &mut RenderGraph, config: &SimulationConfig) -> bool {
    let node_count = cache.nodes.len();
    if node_count == 0 {
        return false;
    }

    if cache.sim.alpha < config.alpha_min && cache.sim.alpha_target < config.alpha_min {
        return false;
    }
    cache.sim.alpha += (cache.sim.alpha_target - cache.sim.alpha) * config.alpha_decay;
    let alpha = cache.sim.alpha;

    let scratch = &mut cache.physics_scratch;
    scratch.forces.clear();
    scratch.forces.resize(node_count, Vec2::ZERO);
    scratch.positions.clear();
    scratch.radii.clear();
    let mut max_radius = 0.0_f32;
    for node in &cache.nodes {
        scratch.positions.push(node.world_pos);
        scratch.radii.push(node.radius);
        max_radius = max_radius.max(node.radius);
    }

    let forces = &mut scratch.forces;
    let positions = &scratch.positions;
    let radii = &scratch.radii;

    for edge in &cache.edges {
        let (from, to) = (edge.source, edge.target);
        if from == to {
            continue;
        }

        let delta = positions[to] - positions[from];
        let distance = delta.length().max(1.0);
        let direction = delta / distance;
        let pull = (distance - config.link_distance) * config.link_strength;
        forces[from] += direction * pull;
        forces[to] -= direction * pull;
    }

    if let Some(tree) = QuadNode::build(positions) {
        for (index, force) in forces.iter_mut().enumerate() {
            accumulate_repulsion(
                &tree,
                index,
                positions,
                config.charge,
                BARNES_HUT_THETA,
                force,
            );
        }

        let reach = (max_radius * 2.0) + config.collision_margin;
        accumulate_collisions(
            &tree,
            &tree,
            true,
            positions,
            radii,
            CollisionParams {
                strength: config.collision_strength,
                margin: config.collision_margin,
                max_reach_sq: reach * reach,
            },
            forces,
        );
    }

    let mut centroid = Vec2::ZERO;
    for position in positions {
        centroid += *position;
    }
    centroid /= node_count as f32;
    let centering = centroid * config.center_strength;
    for force in forces.iter_mut() {
        *force -= centering;
    }

    for (index, node) in cache.nodes.iter_mut().enumerate() {
        if let Some(pin) = node.pinned {
            node.world_pos = pin;
            node.velocity = Vec2::ZERO;
            continue;
        }

        let mut velocity = (node.velocity + forces[index] * alpha) * config.velocity_decay;
        let speed_sq = velocity.length_sq();
        if speed_sq > MAX_SPEED * MAX_SPEED {
            velocity *= MAX_SPEED / speed_sq.sqrt();
        }

        node.velocity = velocity;
        node.world_pos += velocity;
    }

    true
}
