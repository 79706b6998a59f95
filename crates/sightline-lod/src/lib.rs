//! Per-frame level-of-detail selection and PVS-driven visibility for placed
//! object instances.
//!
//! A [`Scene`] owns every instance placed at map-load time. Each frame the
//! [`LodManager`] ages hysteresis counters, measures how much each instance's
//! on-screen footprint would change with a one-tier move, promotes or demotes
//! at most one visible instance to stay inside the triangle budget, and then
//! recomputes visibility from the precomputed [`PvsTable`](sightline_pvs::PvsTable).

mod budget;
mod contribution;
mod error;
mod manager;
mod scene;
mod template;
mod tier;
mod visibility;

pub use budget::{BudgetPolicy, TierChange, scene_triangles, select_change};
pub use contribution::{
    ContributionDelta, MIN_DISTANCE, contribution, evaluate_contributions,
};
pub use error::LodError;
pub use manager::{DrawBucket, FrameReport, LodManager};
pub use scene::{
    CatalogEntry, ClassId, ClassKind, FLOOR_CLASS, Instance, InstanceId, LodState, ObjectClass,
    Scene, WALL_CLASS,
};
pub use template::{LodTemplate, MeshStats, REPRESENTATIVE_TIER, bounding_diagonal};
pub use tier::LodTier;
pub use visibility::compute_visibility;
