//! Per-instance visibility from the camera's cell.

use glam::Vec3;
use sightline_grid::CellId;
use sightline_pvs::PvsTable;

use crate::scene::Scene;

/// Visibility of every instance from `camera`, indexed like
/// [`Scene::instances`].
///
/// An instance is visible when its cell is in the PVS set of the camera's
/// cell. A camera outside any known cell sees nothing.
pub fn compute_visibility(scene: &Scene, pvs: &PvsTable, camera: Vec3) -> Vec<bool> {
    let visible_cells = CellId::from_world(camera).and_then(|cell| pvs.visible_from(cell));

    scene
        .instances()
        .iter()
        .map(|instance| {
            let Some(cells) = visible_cells else {
                return false;
            };
            CellId::from_world(scene.world_position(instance)).is_some_and(|id| cells.contains(&id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ObjectClass;
    use glam::Vec2;
    use sightline_grid::CellCoord;

    fn scene() -> Scene {
        let mut scene = Scene::new();
        let class = scene.add_class(ObjectClass::static_class("crates", Vec3::ZERO, 1.0));
        scene.add_instance(class, CellCoord::new(1, 0).center());
        scene.add_instance(class, CellCoord::new(2, 0).center());
        scene.add_instance(class, Vec2::new(-4.0, 0.5));
        scene
    }

    fn pvs() -> PvsTable {
        let from = CellCoord::new(0, 0).id();
        [(from, from), (from, CellCoord::new(1, 0).id())]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_visibility_is_pvs_membership() {
        let visible = compute_visibility(&scene(), &pvs(), Vec3::new(0.5, 6.0, 0.5));
        assert_eq!(visible, vec![true, false, false]);
    }

    #[test]
    fn test_unknown_camera_cell_sees_nothing() {
        let visible = compute_visibility(&scene(), &pvs(), Vec3::new(2.5, 0.0, 0.5));
        assert_eq!(visible, vec![false; 3]);
    }

    #[test]
    fn test_camera_off_the_grid_sees_nothing() {
        let visible = compute_visibility(&scene(), &pvs(), Vec3::new(-3.0, 0.0, 0.5));
        assert_eq!(visible, vec![false; 3]);
    }
}
