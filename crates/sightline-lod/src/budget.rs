//! Triangle-budget policy: pick at most one instance to promote or demote.

use crate::contribution::ContributionDelta;
use crate::scene::{InstanceId, Scene};
use crate::tier::LodTier;

/// Budget limits for the per-frame tier decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BudgetPolicy {
    /// Visible-triangle count at or above which instances are demoted.
    pub max_triangles: u64,
    /// Frames an instance must wait after a tier change.
    pub hysteresis_frames: u32,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            max_triangles: 120_000,
            hysteresis_frames: 100,
        }
    }
}

/// A single chosen tier move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierChange {
    /// The instance being moved.
    pub instance: InstanceId,
    /// Tier before the move.
    pub from: LodTier,
    /// Tier after the move; always adjacent to `from`.
    pub to: LodTier,
    /// The contribution delta that won the selection.
    pub priority: f32,
}

impl TierChange {
    /// Whether the move goes to a finer tier.
    pub fn is_promotion(&self) -> bool {
        self.to > self.from
    }
}

/// Sum of current-tier triangle counts over visible LoD instances.
pub fn scene_triangles(scene: &Scene) -> u64 {
    scene
        .instances()
        .iter()
        .filter(|instance| instance.visible)
        .filter_map(|instance| {
            let state = instance.lod?;
            let template = scene.class(instance.class)?.template()?;
            Some(u64::from(template.triangles_at(state.tier)))
        })
        .sum()
}

/// Choose this frame's tier move, if any.
///
/// Below the budget the visible, hysteresis-free instance with the largest
/// `up` delta is promoted; at or above it the one with the largest (least
/// negative) `down` delta is demoted. Ties go to the earliest instance.
/// `deltas` is indexed like [`Scene::instances`].
pub fn select_change(
    scene: &Scene,
    deltas: &[Option<ContributionDelta>],
    triangles: u64,
    policy: &BudgetPolicy,
) -> Option<TierChange> {
    let promote = triangles < policy.max_triangles;

    let mut best: Option<TierChange> = None;
    for (index, (instance, delta)) in scene.instances().iter().zip(deltas).enumerate() {
        let (Some(state), Some(delta)) = (instance.lod, delta) else {
            continue;
        };
        if !instance.visible || state.hysteresis > 0 {
            continue;
        }

        let (priority, target) = if promote {
            (delta.up, state.tier.up())
        } else {
            (delta.down, state.tier.down())
        };
        let (Some(priority), Some(to)) = (priority, target) else {
            continue;
        };
        if !priority.is_finite() {
            continue;
        }

        if best.is_none_or(|b| priority > b.priority) {
            best = Some(TierChange {
                instance: InstanceId(index),
                from: state.tier,
                to,
                priority,
            });
        }
    }
    best
}
