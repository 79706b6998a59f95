//! Runtime manager error types.

/// Errors raised while building a scene.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LodError {
    /// A tier outside `0..=4` was requested.
    #[error("LOD tier {0} is out of range (max {max})", max = crate::LodTier::MAX.get())]
    InvalidTier(u8),

    /// A catalog entry claims a map value that does not place objects.
    #[error("map value {0} does not place an object (expected 1..=3)")]
    InvalidMapValue(u8),

    /// Two catalog entries claim the same map value.
    #[error("map value {0} is claimed by more than one class")]
    DuplicateMapValue(u8),
}
