//! The per-frame driver and the renderer-facing query surface.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use sightline_pvs::PvsTable;
use tracing::{debug, info, trace};

use crate::budget::{BudgetPolicy, TierChange, scene_triangles, select_change};
use crate::contribution::evaluate_contributions;
use crate::scene::{ClassId, ClassKind, Instance, InstanceId, ObjectClass, Scene};
use crate::tier::LodTier;
use crate::visibility::compute_visibility;

/// Outcome of one [`LodManager::update`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// Frame number, starting at 1 for the first update.
    pub frame: u64,
    /// Visible triangles the budget decision was based on.
    pub scene_triangles: u64,
    /// The tier move made this frame, if any.
    pub change: Option<TierChange>,
    /// Instances visible after the update.
    pub visible: usize,
}

/// One instanced draw: a class, a tier for LoD classes, and the offsets to
/// draw.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawBucket {
    /// Class to draw.
    pub class: ClassId,
    /// Mesh tier; `None` for static classes.
    pub tier: Option<LodTier>,
    /// Per-instance offsets from the class anchor.
    pub offsets: Vec<Vec2>,
}

/// Owns the instance population and advances it one frame at a time.
pub struct LodManager {
    scene: Scene,
    pvs: Arc<PvsTable>,
    policy: BudgetPolicy,
    frame: u64,
}

impl LodManager {
    /// Take ownership of `scene` and compute visibility from the starting
    /// camera position.
    pub fn new(scene: Scene, pvs: Arc<PvsTable>, policy: BudgetPolicy, camera: Vec3) -> Self {
        let mut manager = Self {
            scene,
            pvs,
            policy,
            frame: 0,
        };
        manager.refresh_visibility(camera);
        info!(
            instances = manager.scene.instances().len(),
            lod_instances = manager.scene.lod_instance_count(),
            max_triangles = policy.max_triangles,
            hysteresis_frames = policy.hysteresis_frames,
            "LOD manager ready"
        );
        manager
    }

    /// Advance one frame with the camera at `camera`.
    ///
    /// In order: age hysteresis counters, evaluate contribution deltas, sum
    /// visible triangles, apply at most one tier move, recompute visibility.
    pub fn update(&mut self, camera: Vec3) -> FrameReport {
        self.frame += 1;

        for instance in self.scene.instances_mut() {
            if let Some(state) = instance.lod.as_mut() {
                state.hysteresis = state.hysteresis.saturating_sub(1);
            }
        }

        let deltas = evaluate_contributions(&self.scene, camera);
        let triangles = scene_triangles(&self.scene);
        let change = select_change(&self.scene, &deltas, triangles, &self.policy);
        trace!(
            frame = self.frame,
            triangles,
            over_budget = triangles >= self.policy.max_triangles,
            "Budget evaluated"
        );

        if let Some(change) = change {
            self.apply(change);
        }

        let visible = self.refresh_visibility(camera);

        FrameReport {
            frame: self.frame,
            scene_triangles: triangles,
            change,
            visible,
        }
    }

    fn apply(&mut self, change: TierChange) {
        let hysteresis = self.policy.hysteresis_frames;
        let instance = &mut self.scene.instances_mut()[change.instance.0];
        if let Some(state) = instance.lod.as_mut() {
            state.tier = change.to;
            state.hysteresis = hysteresis;
        }
        debug!(
            frame = self.frame,
            instance = change.instance.0,
            from = change.from.get(),
            to = change.to.get(),
            priority = change.priority,
            "{}",
            if change.is_promotion() { "Promoted instance" } else { "Demoted instance" }
        );
    }

    fn refresh_visibility(&mut self, camera: Vec3) -> usize {
        let visibility = compute_visibility(&self.scene, &self.pvs, camera);
        let mut count = 0;
        for (instance, visible) in self.scene.instances_mut().iter_mut().zip(visibility) {
            instance.visible = visible;
            count += usize::from(visible);
        }
        count
    }

    /// Every offset of `class`, visible or not. Used for static classes.
    pub fn offsets(&self, class: ClassId) -> Vec<Vec2> {
        self.scene
            .instances_of(class)
            .map(|(_, instance)| instance.offset)
            .collect()
    }

    /// Offsets of `class` instances currently at `tier`, optionally only the
    /// visible ones.
    pub fn offsets_at_tier(&self, class: ClassId, tier: LodTier, visible_only: bool) -> Vec<Vec2> {
        self.scene
            .instances_of(class)
            .filter(|(_, instance)| instance.lod.is_some_and(|state| state.tier == tier))
            .filter(|(_, instance)| !visible_only || instance.visible)
            .map(|(_, instance)| instance.offset)
            .collect()
    }

    /// The instanced draws needed this frame: every static class with
    /// instances, and every visible `(class, tier)` pair with instances.
    pub fn draw_buckets(&self) -> Vec<DrawBucket> {
        let mut buckets = Vec::new();
        for (index, class) in self.scene.classes().iter().enumerate() {
            let id = ClassId(index);
            match class.kind {
                ClassKind::Static => {
                    let offsets = self.offsets(id);
                    if !offsets.is_empty() {
                        buckets.push(DrawBucket {
                            class: id,
                            tier: None,
                            offsets,
                        });
                    }
                }
                ClassKind::Lod(_) => {
                    for tier in LodTier::all() {
                        let offsets = self.offsets_at_tier(id, tier, true);
                        if !offsets.is_empty() {
                            buckets.push(DrawBucket {
                                class: id,
                                tier: Some(tier),
                                offsets,
                            });
                        }
                    }
                }
            }
        }
        buckets
    }

    /// Visible triangles at the current tiers, after the last update.
    pub fn visible_triangles(&self) -> u64 {
        scene_triangles(&self.scene)
    }

    /// All classes.
    pub fn classes(&self) -> &[ObjectClass] {
        self.scene.classes()
    }

    /// Look up a class by name.
    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.scene.class_by_name(name)
    }

    /// All instances with their current state.
    pub fn instances(&self) -> &[Instance] {
        self.scene.instances()
    }

    /// A single instance.
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.scene.instance(id)
    }

    /// The owned scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The shared visibility table.
    pub fn pvs(&self) -> &Arc<PvsTable> {
        &self.pvs
    }

    /// Active budget policy.
    pub fn policy(&self) -> &BudgetPolicy {
        &self.policy
    }

    /// Number of updates run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::LodState;
    use crate::template::LodTemplate;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use sightline_grid::CellCoord;

    const TRIANGLES: [u32; 5] = [1_000, 2_000, 4_000, 8_000, 16_000];

    fn tier(t: u8) -> LodTier {
        LodTier::new(t).unwrap()
    }

    /// An 8x8 world where every cell sees every cell, with a static wall
    /// class and one LoD class.
    fn world() -> (Scene, ClassId, Arc<PvsTable>) {
        let mut scene = Scene::new();
        scene.add_class(ObjectClass::static_class("walls", Vec3::ZERO, 1.0));
        let pots = scene.add_class(ObjectClass::lod_class(
            Vec3::ZERO,
            1.0,
            LodTemplate::new("pot", TRIANGLES, 1.0),
        ));
        let mut pvs = PvsTable::new();
        for x in 0..8 {
            for y in 0..8 {
                for u in 0..8 {
                    for v in 0..8 {
                        pvs.insert(CellCoord::new(x, y).id(), CellCoord::new(u, v).id());
                    }
                }
            }
        }
        (scene, pots, Arc::new(pvs))
    }

    fn place(scene: &mut Scene, class: ClassId, cell: (u32, u32), t: u8) -> InstanceId {
        let id = scene.add_instance(class, CellCoord::new(cell.0, cell.1).center());
        scene.instances_mut()[id.0].lod = Some(LodState {
            tier: tier(t),
            hysteresis: 0,
        });
        id
    }

    fn camera() -> Vec3 {
        Vec3::new(0.5, 1.0, 0.5)
    }

    fn state(manager: &LodManager, id: InstanceId) -> LodState {
        manager.instance(id).unwrap().lod.unwrap()
    }

    #[test]
    fn test_construction_computes_visibility() {
        let (mut scene, pots, pvs) = world();
        let id = place(&mut scene, pots, (3, 3), 0);
        let manager = LodManager::new(scene, pvs, BudgetPolicy::default(), camera());
        assert!(manager.instance(id).unwrap().visible);
        assert_eq!(manager.frame(), 0);
    }

    #[test]
    fn test_single_visible_candidate_is_promoted() {
        let (mut scene, pots, pvs) = world();
        let id = place(&mut scene, pots, (2, 2), 2);
        let mut manager = LodManager::new(scene, pvs, BudgetPolicy::default(), camera());

        let report = manager.update(camera());
        assert_eq!(report.frame, 1);
        assert_eq!(report.scene_triangles, 4_000);
        assert_eq!(report.change.map(|c| c.instance), Some(id));
        assert_eq!(state(&manager, id), LodState { tier: tier(3), hysteresis: 100 });
    }

    #[test]
    fn test_over_budget_demotes_exactly_one() {
        let (mut scene, pots, pvs) = world();
        let near = place(&mut scene, pots, (1, 1), 3);
        let far = place(&mut scene, pots, (7, 7), 3);
        let mid = place(&mut scene, pots, (4, 4), 2);
        let policy = BudgetPolicy {
            max_triangles: 10_000,
            hysteresis_frames: 100,
        };
        let mut manager = LodManager::new(scene, pvs, policy, camera());

        let report = manager.update(camera());
        assert_eq!(report.scene_triangles, 20_000);
        assert_eq!(report.change.map(|c| c.instance), Some(far));
        assert_eq!(state(&manager, far), LodState { tier: tier(2), hysteresis: 100 });
        assert_eq!(state(&manager, near), LodState { tier: tier(3), hysteresis: 0 });
        assert_eq!(state(&manager, mid), LodState { tier: tier(2), hysteresis: 0 });
    }

    #[test]
    fn test_hysteresis_blocks_changes_until_it_expires() {
        let (mut scene, pots, pvs) = world();
        let id = place(&mut scene, pots, (2, 2), 0);
        let policy = BudgetPolicy {
            max_triangles: 120_000,
            hysteresis_frames: 3,
        };
        let mut manager = LodManager::new(scene, pvs, policy, camera());

        assert!(manager.update(camera()).change.is_some());
        assert_eq!(state(&manager, id), LodState { tier: tier(1), hysteresis: 3 });

        // Counter entering the update is 3, then 2, then 1: no change.
        for expected in [2, 1] {
            assert!(manager.update(camera()).change.is_none());
            assert_eq!(state(&manager, id), LodState { tier: tier(1), hysteresis: expected });
        }
        // Counter is 1 entering this update, decremented to 0, then eligible.
        let report = manager.update(camera());
        assert!(report.change.is_some());
        assert_eq!(state(&manager, id), LodState { tier: tier(2), hysteresis: 3 });
    }

    #[test]
    fn test_unknown_camera_cell_hides_everything() {
        let (mut scene, pots, pvs) = world();
        scene.add_instance(ClassId(0), Vec2::new(0.5, 0.5));
        place(&mut scene, pots, (2, 2), 0);
        let mut manager = LodManager::new(scene, pvs, BudgetPolicy::default(), camera());
        assert!(manager.instances().iter().all(|i| i.visible));

        let report = manager.update(Vec3::new(50.5, 1.0, 50.5));
        assert_eq!(report.visible, 0);
        assert!(manager.instances().iter().all(|i| !i.visible));
        assert_eq!(manager.visible_triangles(), 0);
    }

    #[test]
    fn test_invisible_instances_are_not_candidates() {
        let (mut scene, pots, _) = world();
        let id = place(&mut scene, pots, (2, 2), 0);
        let mut manager = LodManager::new(
            scene,
            Arc::new(PvsTable::new()),
            BudgetPolicy::default(),
            camera(),
        );
        for _ in 0..5 {
            let report = manager.update(camera());
            assert_eq!(report.scene_triangles, 0);
            assert!(report.change.is_none());
        }
        assert_eq!(state(&manager, id).tier, LodTier::MIN);
    }

    #[test]
    fn test_queries_partition_by_tier_and_visibility() {
        let (mut scene, pots, _) = world();
        let walls = ClassId(0);
        scene.add_instance(walls, Vec2::new(5.5, 5.5));
        place(&mut scene, pots, (0, 0), 1);
        place(&mut scene, pots, (1, 0), 1);
        place(&mut scene, pots, (2, 0), 3);
        let from = CellCoord::new(0, 0).id();
        let pvs: PvsTable = [(from, from), (from, CellCoord::new(2, 0).id())]
            .into_iter()
            .collect();
        let manager = LodManager::new(scene, Arc::new(pvs), BudgetPolicy::default(), camera());

        assert_eq!(manager.offsets(walls), vec![Vec2::new(5.5, 5.5)]);
        assert_eq!(manager.offsets(pots).len(), 3);
        assert_eq!(manager.offsets_at_tier(pots, tier(1), false).len(), 2);
        assert_eq!(
            manager.offsets_at_tier(pots, tier(1), true),
            vec![Vec2::new(0.5, 0.5)]
        );
        assert!(manager.offsets_at_tier(pots, tier(0), false).is_empty());

        let buckets = manager.draw_buckets();
        let summary: Vec<(ClassId, Option<u8>, usize)> = buckets
            .iter()
            .map(|b| (b.class, b.tier.map(LodTier::get), b.offsets.len()))
            .collect();
        assert_eq!(
            summary,
            vec![(walls, None, 1), (pots, Some(1), 1), (pots, Some(3), 1)]
        );
        assert_eq!(manager.visible_triangles(), 2_000 + 8_000);
    }

    #[test]
    fn test_random_walk_keeps_every_invariant() {
        let (mut scene, pots, pvs) = world();
        let mut rng = ChaCha8Rng::seed_from_u64(1234);
        for _ in 0..24 {
            let cell = (rng.random_range(0..8), rng.random_range(0..8));
            place(&mut scene, pots, cell, 0);
        }
        let policy = BudgetPolicy {
            max_triangles: 60_000,
            hysteresis_frames: 7,
        };
        let mut manager = LodManager::new(scene, pvs, policy, camera());

        for _ in 0..600 {
            let before: Vec<Option<LodState>> =
                manager.instances().iter().map(|i| i.lod).collect();
            let camera = Vec3::new(
                rng.random_range(-2.0..10.0),
                1.0,
                rng.random_range(-2.0..10.0),
            );
            let report = manager.update(camera);

            let mut changed = 0;
            for (index, (old, new)) in before.iter().zip(manager.instances()).enumerate() {
                let (Some(old), Some(new)) = (old, new.lod) else {
                    continue;
                };
                assert!(new.tier <= LodTier::MAX);
                if old.tier != new.tier {
                    changed += 1;
                    assert!(old.hysteresis <= 1, "instance {index} moved while waiting");
                    assert_eq!(new.hysteresis, policy.hysteresis_frames);
                    assert_eq!(old.tier.get().abs_diff(new.tier.get()), 1);
                    assert_eq!(report.change.map(|c| c.instance.0), Some(index));
                } else {
                    assert_eq!(new.hysteresis, old.hysteresis.saturating_sub(1));
                }
            }
            assert!(changed <= 1);
            assert_eq!(changed == 1, report.change.is_some());

            let expected = compute_visibility(manager.scene(), manager.pvs(), camera);
            let actual: Vec<bool> = manager.instances().iter().map(|i| i.visible).collect();
            assert_eq!(actual, expected);
        }
    }
}
