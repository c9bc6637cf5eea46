// Wrapper types making it harder to accidentaly use the wrong underlying type.

use std::fmt::{self, Display};

use crate::{Direction, math::Vector3};

/// A raw block state id. Combined with the block type it identifies the block's current properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockStateId(pub u16);

/// A block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockPos(pub Vector3<i32>);

impl BlockPos {
    /// The world origin.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Creates a position from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// The x coordinate.
    #[must_use]
    pub const fn x(self) -> i32 {
        self.0.x
    }

    /// The y coordinate.
    #[must_use]
    pub const fn y(self) -> i32 {
        self.0.y
    }

    /// The z coordinate.
    #[must_use]
    pub const fn z(self) -> i32 {
        self.0.z
    }

    /// Returns this position moved by the given deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.0.x + dx, self.0.y + dy, self.0.z + dz)
    }

    /// Returns this position moved by an arbitrary vector.
    #[must_use]
    pub fn plus(self, delta: Vector3<i32>) -> Self {
        Self(self.0 + delta)
    }

    /// Returns the adjacent position in `direction`.
    #[must_use]
    pub const fn relative(self, direction: Direction) -> Self {
        let (dx, dy, dz) = direction.offset();
        self.offset(dx, dy, dz)
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative() {
        let pos = BlockPos::new(3, 64, -2);
        assert_eq!(pos.relative(Direction::Up), BlockPos::new(3, 65, -2));
        assert_eq!(pos.relative(Direction::North), BlockPos::new(3, 64, -3));
        assert_eq!(pos.plus(Vector3::new(1, 0, 0)), BlockPos::new(4, 64, -2));
        assert_eq!(pos.to_string(), "(3, 64, -2)");
    }
}
