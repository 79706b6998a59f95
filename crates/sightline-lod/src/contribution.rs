//! Projected-size heuristic and the per-instance gain of a one-tier move.

use glam::Vec3;

use crate::scene::Scene;
use crate::tier::LodTier;

/// Distances below this are clamped so an instance at the camera position
/// still gets a finite contribution.
pub const MIN_DISTANCE: f32 = 1e-3;

/// Approximate on-screen footprint of an instance with bounding diagonal
/// `diagonal`, seen from `distance`, drawn at `tier`.
pub fn contribution(diagonal: f32, distance: f32, tier: LodTier) -> f32 {
    diagonal / (distance.max(MIN_DISTANCE) * tier.scale())
}

/// Change in contribution caused by moving one tier in either direction.
///
/// Larger values mean the move matters more. A direction that would leave
/// the tier range is `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContributionDelta {
    /// `contribution(tier) - contribution(tier + 1)`; `None` at the finest tier.
    pub up: Option<f32>,
    /// `contribution(tier) - contribution(tier - 1)`; `None` at the coarsest tier.
    pub down: Option<f32>,
}

impl ContributionDelta {
    /// Evaluate both directions for one instance.
    pub fn evaluate(diagonal: f32, distance: f32, tier: LodTier) -> Self {
        let current = contribution(diagonal, distance, tier);
        let delta = |other: LodTier| current - contribution(diagonal, distance, other);
        Self {
            up: tier.up().map(delta),
            down: tier.down().map(delta),
        }
    }
}

/// Evaluate every instance against the camera position.
///
/// The result is indexed like [`Scene::instances`]; static instances get
/// `None`.
pub fn evaluate_contributions(scene: &Scene, camera: Vec3) -> Vec<Option<ContributionDelta>> {
    scene
        .instances()
        .iter()
        .map(|instance| {
            let state = instance.lod?;
            let diagonal = scene.class(instance.class)?.scaled_diagonal()?;
            let distance = scene.world_position(instance).distance(camera);
            Some(ContributionDelta::evaluate(diagonal, distance, state.tier))
        })
        .collect()
}
