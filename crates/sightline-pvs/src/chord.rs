//! Random chords across the map's bounding rectangle.

use glam::DVec2;
use rand::Rng;

/// One side of the map's bounding rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundarySide {
    /// `y = 0`.
    Bottom,
    /// `x = 0`.
    Left,
    /// `y = height`.
    Top,
    /// `x = width`.
    Right,
}

impl BoundarySide {
    /// All sides in index order.
    pub const ALL: [Self; 4] = [Self::Bottom, Self::Left, Self::Top, Self::Right];

    /// The point at fraction `t` (in `[0, 1)`) along this side.
    pub fn point_at(self, t: f64, width: f64, height: f64) -> DVec2 {
        match self {
            Self::Bottom => DVec2::new(t * width, 0.0),
            Self::Left => DVec2::new(0.0, t * height),
            Self::Top => DVec2::new(t * width, height),
            Self::Right => DVec2::new(width, t * height),
        }
    }
}

/// A segment whose endpoints lie on two different sides of the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Chord {
    /// Where the walk starts.
    pub start: DVec2,
    /// Where the walk ends.
    pub end: DVec2,
}

impl Chord {
    /// Create a chord from two endpoints.
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    /// Draw a random chord for a `width` x `height` map.
    ///
    /// The two endpoints are placed uniformly along two distinct sides, so
    /// every chord crosses the interior.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, width: u32, height: u32) -> Self {
        let first = rng.random_range(0..4usize);
        let second = (first + rng.random_range(1..4usize)) % 4;
        let (w, h) = (width as f64, height as f64);
        Self {
            start: BoundarySide::ALL[first].point_at(rng.random::<f64>(), w, h),
            end: BoundarySide::ALL[second].point_at(rng.random::<f64>(), w, h),
        }
    }

    /// `end - start`.
    pub fn direction(&self) -> DVec2 {
        self.end - self.start
    }
}
