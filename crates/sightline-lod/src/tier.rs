//! Discrete mesh-detail tiers.

use crate::error::LodError;

/// Mesh-detail tier in `0..=4`; 0 is the coarsest mesh, 4 the finest.
///
/// Only adjacent moves are expressible: [`up`](Self::up) and
/// [`down`](Self::down) return `None` at the ends of the range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LodTier(u8);

impl LodTier {
    /// Coarsest tier; every instance starts here.
    pub const MIN: Self = Self(0);
    /// Finest tier.
    pub const MAX: Self = Self(4);
    /// Number of tiers.
    pub const COUNT: usize = 5;

    /// Create a tier, rejecting values above [`LodTier::MAX`].
    ///
    /// # Errors
    ///
    /// Returns [`LodError::InvalidTier`] for values above 4.
    pub fn new(tier: u8) -> Result<Self, LodError> {
        if tier > Self::MAX.0 {
            return Err(LodError::InvalidTier(tier));
        }
        Ok(Self(tier))
    }

    /// Create a tier, clamping values above [`LodTier::MAX`].
    pub const fn saturating(tier: u8) -> Self {
        if tier > Self::MAX.0 {
            Self::MAX
        } else {
            Self(tier)
        }
    }

    /// Raw tier number.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Index into per-tier arrays.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The next finer tier, if any.
    pub fn up(self) -> Option<Self> {
        (self < Self::MAX).then(|| Self(self.0 + 1))
    }

    /// The next coarser tier, if any.
    pub fn down(self) -> Option<Self> {
        (self > Self::MIN).then(|| Self(self.0 - 1))
    }

    /// `2^tier`, the divisor applied to an instance's footprint at this tier.
    pub fn scale(self) -> f32 {
        (1u32 << self.0) as f32
    }

    /// All tiers from coarsest to finest.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN.0..=Self::MAX.0).map(Self)
    }
}

impl TryFrom<u8> for LodTier {
    type Error = LodError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for LodTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LOD{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_enforced() {
        assert!(LodTier::new(4).is_ok());
        assert_eq!(LodTier::new(5), Err(LodError::InvalidTier(5)));
        assert_eq!(LodTier::try_from(200), Err(LodError::InvalidTier(200)));
    }

    #[test]
    fn test_moves_are_adjacent_and_bounded() {
        assert_eq!(LodTier::MIN.down(), None);
        assert_eq!(LodTier::MAX.up(), None);
        let two = LodTier::new(2).unwrap();
        assert_eq!(two.up().map(LodTier::get), Some(3));
        assert_eq!(two.down().map(LodTier::get), Some(1));
    }

    #[test]
    fn test_scale_doubles_per_tier() {
        let scales: Vec<f32> = LodTier::all().map(LodTier::scale).collect();
        assert_eq!(scales, vec![1.0, 2.0, 4.0, 8.0, 16.0]);
        assert_eq!(LodTier::all().count(), LodTier::COUNT);
    }

    #[test]
    fn test_saturating_clamps() {
        assert_eq!(LodTier::saturating(9), LodTier::MAX);
        assert_eq!(LodTier::saturating(1).get(), 1);
    }

    #[test]
    fn test_default_is_coarsest() {
        assert_eq!(LodTier::default(), LodTier::MIN);
    }
}
