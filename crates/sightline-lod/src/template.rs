//! Per-class mesh statistics: triangle counts for every tier and the shared
//! bounding diagonal.

use glam::Vec3;

use crate::tier::LodTier;

/// Tier whose mesh is measured for the shared bounding diagonal. A middle
/// tier is close enough to every other tier's extent.
pub const REPRESENTATIVE_TIER: LodTier = LodTier::saturating(2);

/// What the runtime needs to know about one loaded mesh variant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshStats {
    /// Triangle count of the mesh.
    pub triangles: u32,
    /// Vertex positions in model space.
    pub positions: Vec<Vec3>,
}

/// Triangle counts and bounding diagonal for an LoD-capable object class.
#[derive(Clone, Debug, PartialEq)]
pub struct LodTemplate {
    /// Human-readable name, used in logs.
    pub name: String,
    /// Triangle count at each tier, coarsest first.
    pub triangles: [u32; LodTier::COUNT],
    /// Model-space bounding-box diagonal, before class scaling.
    pub diagonal: f32,
}

impl LodTemplate {
    /// Create a template from known triangle counts and diagonal.
    pub fn new(name: impl Into<String>, triangles: [u32; LodTier::COUNT], diagonal: f32) -> Self {
        Self {
            name: name.into(),
            triangles,
            diagonal,
        }
    }

    /// Build a template from the five loaded mesh variants.
    ///
    /// The diagonal is measured once on [`REPRESENTATIVE_TIER`].
    pub fn from_meshes(name: impl Into<String>, meshes: &[MeshStats; LodTier::COUNT]) -> Self {
        let triangles = std::array::from_fn(|i| meshes[i].triangles);
        let diagonal = bounding_diagonal(&meshes[REPRESENTATIVE_TIER.index()].positions);
        Self::new(name, triangles, diagonal)
    }

    /// Triangle count at `tier`.
    pub fn triangles_at(&self, tier: LodTier) -> u32 {
        self.triangles[tier.index()]
    }
}

/// Length of the diagonal of the axis-aligned box enclosing `positions`.
///
/// Returns 0 for an empty slice.
pub fn bounding_diagonal(positions: &[Vec3]) -> f32 {
    let Some(&first) = positions.first() else {
        return 0.0;
    };
    let (min, max) = positions
        .iter()
        .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
    (max - min).length()
}
