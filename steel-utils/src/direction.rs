//! The six axis-aligned directions.

use crate::math::Vector3;

/// An axis of the block grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// East-west.
    X,
    /// Up-down.
    Y,
    /// North-south.
    Z,
}

/// Six axis-aligned directions.
///
/// The ordinal values (0-5) follow the vanilla `Direction` ordering.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Downward (-Y direction)
    Down = 0,
    /// Upward (+Y direction)
    Up = 1,
    /// North (-Z direction)
    North = 2,
    /// South (+Z direction)
    South = 3,
    /// West (-X direction)
    West = 4,
    /// East (+X direction)
    East = 5,
}

impl Direction {
    /// All six directions in array form for iteration.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// Returns the axis this direction lies on.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Down | Self::Up => Axis::Y,
            Self::North | Self::South => Axis::Z,
            Self::West | Self::East => Axis::X,
        }
    }

    /// Gets the offset in the given direction.
    ///
    /// Returns (dx, dy, dz) for this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Down => (0, -1, 0),
            Self::Up => (0, 1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::West => (-1, 0, 0),
            Self::East => (1, 0, 0),
        }
    }

    /// The unit vector of this direction.
    #[must_use]
    pub const fn normal(self) -> Vector3<i32> {
        let (x, y, z) = self.offset();
        Vector3::new(x, y, z)
    }

    /// Converts a unit axis vector back into a direction.
    ///
    /// Returns `None` for anything that is not exactly one unit step along one axis.
    #[must_use]
    pub fn from_normal(normal: Vector3<i32>) -> Option<Self> {
        Self::ALL.into_iter().find(|dir| dir.normal() == normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.opposite().axis(), dir.axis());
            assert_eq!(-dir.normal(), dir.opposite().normal());
        }
    }

    #[test]
    fn test_from_normal() {
        assert_eq!(
            Direction::from_normal(Vector3::new(1, 0, 0)),
            Some(Direction::East)
        );
        assert_eq!(
            Direction::from_normal(Vector3::new(0, -1, 0)),
            Some(Direction::Down)
        );
        assert_eq!(Direction::from_normal(Vector3::new(1, 1, 0)), None);
        assert_eq!(Direction::from_normal(Vector3::new(0, 0, 2)), None);
    }
}
