//! `sightline simulate`: fly a camera through a level and run the LOD manager
//! every frame.

use std::path::Path;
use std::sync::Arc;

use glam::Vec3;
use sightline_config::{CatalogConfig, Config};
use sightline_grid::GridMap;
use sightline_lod::{
    BudgetPolicy, CatalogEntry, LodManager, LodTemplate, LodTier, ObjectClass, Scene,
};
use sightline_pvs::PvsTable;
use tracing::{debug, info};

use crate::error::AppError;

/// What a simulation run ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationSummary {
    /// Frames simulated.
    pub frames: u64,
    /// Tier changes applied over the run.
    pub changes: u64,
    /// LOD instances at each tier after the last frame.
    pub tier_histogram: [usize; LodTier::COUNT],
    /// Visible triangles after the last frame.
    pub visible_triangles: u64,
}

/// Convert configured catalog entries into scene catalog entries.
pub fn catalog_from(config: &[CatalogConfig]) -> Vec<CatalogEntry> {
    config
        .iter()
        .map(|entry| CatalogEntry {
            map_value: entry.map_value,
            class: ObjectClass::lod_class(
                Vec3::from_array(entry.anchor),
                entry.scale,
                LodTemplate::new(entry.name.clone(), entry.triangles, entry.diagonal),
            ),
        })
        .collect()
}

/// Budget policy from the `lod` config section.
pub fn policy_from(config: &Config) -> BudgetPolicy {
    BudgetPolicy {
        max_triangles: config.lod.max_triangles,
        hysteresis_frames: config.lod.hysteresis_frames,
    }
}

/// Camera position on `frame` of `frames`, moving linearly from `start` to
/// `end`.
pub fn camera_at(start: Vec3, end: Vec3, frame: u32, frames: u32) -> Vec3 {
    if frames == 0 {
        return start;
    }
    start.lerp(end, frame as f32 / frames as f32)
}

/// Load the level and run `frames` updates.
pub fn run(map: &Path, pvs: &Path, frames: u32, config: &Config) -> Result<SimulationSummary, AppError> {
    let grid = GridMap::load(map)?;
    let table = PvsTable::load(pvs)?;
    info!(
        map = %map.display(),
        pvs = %pvs.display(),
        cells = table.len(),
        pairs = table.total_pairs(),
        "Loaded level"
    );

    let scene = Scene::from_grid(&grid, &catalog_from(&config.scene.catalog))?;
    let start = Vec3::from_array(config.scene.camera_start);
    let end = Vec3::from_array(config.scene.camera_end);
    let mut manager = LodManager::new(scene, Arc::new(table), policy_from(config), start);

    let mut changes = 0;
    for frame in 1..=frames {
        let camera = camera_at(start, end, frame, frames);
        let report = manager.update(camera);
        changes += u64::from(report.change.is_some());

        let buckets = manager.draw_buckets();
        debug!(
            frame = report.frame,
            camera = ?camera,
            visible = report.visible,
            triangles = report.scene_triangles,
            buckets = buckets.len(),
            draws = buckets.iter().map(|b| b.offsets.len()).sum::<usize>(),
            "Frame"
        );
    }

    let mut tier_histogram = [0; LodTier::COUNT];
    for state in manager.instances().iter().filter_map(|i| i.lod) {
        tier_histogram[state.tier.index()] += 1;
    }
    let summary = SimulationSummary {
        frames: manager.frame(),
        changes,
        tier_histogram,
        visible_triangles: manager.visible_triangles(),
    };
    info!(
        frames = summary.frames,
        changes = summary.changes,
        tiers = ?summary.tier_histogram,
        visible_triangles = summary.visible_triangles,
        "Simulation finished"
    );
    Ok(summary)
}
