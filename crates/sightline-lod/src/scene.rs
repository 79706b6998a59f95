//! The placed instance population: object classes and their instances.
//!
//! Classes and instances are created once, when the map is loaded. After
//! that only per-instance tier, hysteresis, and visibility change.

use glam::{Vec2, Vec3};
use sightline_grid::{CellKind, GridMap};
use tracing::info;

use crate::error::LodError;
use crate::template::LodTemplate;
use crate::tier::LodTier;

/// Index of an [`ObjectClass`] within its [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub usize);

/// Index of an [`Instance`] within its [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub usize);

/// Wall class in scenes built by [`Scene::from_grid`].
pub const WALL_CLASS: ClassId = ClassId(0);
/// Floor class in scenes built by [`Scene::from_grid`].
pub const FLOOR_CLASS: ClassId = ClassId(1);

/// Whether a class takes part in level-of-detail selection.
#[derive(Clone, Debug, PartialEq)]
pub enum ClassKind {
    /// Single mesh, always drawn in full; never counted against the budget.
    Static,
    /// Five mesh tiers selected per instance.
    Lod(LodTemplate),
}

/// An object template placed any number of times in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectClass {
    /// Name used in logs and lookups.
    pub name: String,
    /// World position every instance offset is relative to.
    pub anchor: Vec3,
    /// Uniform model scale.
    pub scale: f32,
    /// Static or LoD-capable.
    pub kind: ClassKind,
}

impl ObjectClass {
    /// A class without tiers.
    pub fn static_class(name: impl Into<String>, anchor: Vec3, scale: f32) -> Self {
        Self {
            name: name.into(),
            anchor,
            scale,
            kind: ClassKind::Static,
        }
    }

    /// A class with five mesh tiers.
    pub fn lod_class(anchor: Vec3, scale: f32, template: LodTemplate) -> Self {
        Self {
            name: template.name.clone(),
            anchor,
            scale,
            kind: ClassKind::Lod(template),
        }
    }

    /// The tier template, if this class is LoD-capable.
    pub fn template(&self) -> Option<&LodTemplate> {
        match &self.kind {
            ClassKind::Lod(template) => Some(template),
            ClassKind::Static => None,
        }
    }

    /// Bounding diagonal after class scaling, for LoD-capable classes.
    pub fn scaled_diagonal(&self) -> Option<f32> {
        self.template().map(|t| t.diagonal * self.scale)
    }
}

/// Mutable level-of-detail state of one instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LodState {
    /// Current mesh tier.
    pub tier: LodTier,
    /// Frames left before the tier may change again.
    pub hysteresis: u32,
}

/// One placement of an object class.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    /// Owning class.
    pub class: ClassId,
    /// Ground-plane offset (`x`, `z`) from the class anchor.
    pub offset: Vec2,
    /// Tier state; `None` for static classes.
    pub lod: Option<LodState>,
    /// Whether the instance was visible at the last update.
    pub visible: bool,
}

/// A catalog entry binding a map value to an LoD-capable class.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    /// Map value (1..=3) whose cells receive an instance.
    pub map_value: u8,
    /// The class placed on those cells.
    pub class: ObjectClass,
}

/// Every class and instance in the level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    classes: Vec<ObjectClass>,
    instances: Vec<Instance>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class and return its id.
    pub fn add_class(&mut self, class: ObjectClass) -> ClassId {
        self.classes.push(class);
        ClassId(self.classes.len() - 1)
    }

    /// Place an instance of `class` at `offset`.
    ///
    /// LoD-capable instances start at the coarsest tier with no hysteresis.
    /// Every instance starts invisible.
    ///
    /// # Panics
    ///
    /// Panics if `class` does not belong to this scene.
    pub fn add_instance(&mut self, class: ClassId, offset: Vec2) -> InstanceId {
        let lod = match self.classes[class.0].kind {
            ClassKind::Lod(_) => Some(LodState::default()),
            ClassKind::Static => None,
        };
        self.instances.push(Instance {
            class,
            offset,
            lod,
            visible: false,
        });
        InstanceId(self.instances.len() - 1)
    }

    /// Populate a scene from a grid map.
    ///
    /// Class 0 holds one wall instance per wall cell and class 1 a single
    /// floor instance spanning the map. Each catalog entry then becomes a
    /// class with one instance per cell carrying its map value. Object cells
    /// whose value has no catalog entry stay empty floor.
    ///
    /// # Errors
    ///
    /// Returns [`LodError`] if a catalog entry uses a map value outside
    /// `1..=3` or two entries share a value.
    pub fn from_grid(grid: &GridMap, catalog: &[CatalogEntry]) -> Result<Self, LodError> {
        let mut value_to_class = [None; 4];
        let mut scene = Self::new();

        let walls = scene.add_class(ObjectClass::static_class("walls", Vec3::ZERO, 1.0));
        let floor_scale = grid.width().max(grid.height()) as f32;
        let floor = scene.add_class(ObjectClass::static_class("floor", Vec3::ZERO, floor_scale));
        debug_assert_eq!((walls, floor), (WALL_CLASS, FLOOR_CLASS));

        for entry in catalog {
            let slot = value_to_class
                .get_mut(entry.map_value as usize)
                .filter(|_| entry.map_value >= 1)
                .ok_or(LodError::InvalidMapValue(entry.map_value))?;
            if slot.is_some() {
                return Err(LodError::DuplicateMapValue(entry.map_value));
            }
            *slot = Some(scene.add_class(entry.class.clone()));
        }

        scene.add_instance(floor, grid.center());
        for (coord, kind) in grid.cells() {
            let class = match kind {
                CellKind::Wall => Some(walls),
                CellKind::Object(value) => value_to_class[value as usize],
                CellKind::Floor => None,
            };
            if let Some(class) = class {
                scene.add_instance(class, coord.center());
            }
        }

        info!(
            classes = scene.classes.len(),
            instances = scene.instances.len(),
            lod_instances = scene.lod_instance_count(),
            "Scene populated from {}x{} grid",
            grid.width(),
            grid.height()
        );
        Ok(scene)
    }

    /// All classes, indexed by [`ClassId`].
    pub fn classes(&self) -> &[ObjectClass] {
        &self.classes
    }

    /// All instances, indexed by [`InstanceId`].
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub(crate) fn instances_mut(&mut self) -> &mut [Instance] {
        &mut self.instances
    }

    /// A class by id.
    pub fn class(&self, id: ClassId) -> Option<&ObjectClass> {
        self.classes.get(id.0)
    }

    /// An instance by id.
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(id.0)
    }

    /// Look up a class by name.
    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.classes
            .iter()
            .position(|class| class.name == name)
            .map(ClassId)
    }

    /// Instances belonging to `class`, with their ids.
    pub fn instances_of(&self, class: ClassId) -> impl Iterator<Item = (InstanceId, &Instance)> {
        self.instances
            .iter()
            .enumerate()
            .filter(move |(_, instance)| instance.class == class)
            .map(|(index, instance)| (InstanceId(index), instance))
    }

    /// Number of instances that take part in LoD selection.
    pub fn lod_instance_count(&self) -> usize {
        self.instances.iter().filter(|i| i.lod.is_some()).count()
    }

    /// World-space position of an instance.
    pub fn world_position(&self, instance: &Instance) -> Vec3 {
        let anchor = self.classes[instance.class.0].anchor;
        anchor + Vec3::new(instance.offset.x, 0.0, instance.offset.y)
    }
}
