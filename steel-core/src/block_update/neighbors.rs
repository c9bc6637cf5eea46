//! Axis neighbor offsets used for update propagation.

use smallvec::SmallVec;
use steel_utils::{Axis, BlockPos, Direction, math::Vector3};

/// Number of axis neighbors of a position.
pub const NEIGHBOR_COUNT: usize = 6;

/// Neighbor order used everywhere updates are propagated: -X, +X, -Y, +Y, -Z, +Z.
const NEIGHBOR_ORDER: [Direction; NEIGHBOR_COUNT] = [
    Direction::West,
    Direction::East,
    Direction::Down,
    Direction::Up,
    Direction::North,
    Direction::South,
];

/// Returns the six axis neighbors of `pos`.
#[must_use]
pub fn neighbors(pos: BlockPos) -> [BlockPos; NEIGHBOR_COUNT] {
    NEIGHBOR_ORDER.map(|dir| pos.relative(dir))
}

/// Returns `center` followed by those neighbors of `center` that are orthogonal
/// to `direction`.
///
/// Neighbors on any axis where `direction` has a non-zero component are skipped,
/// forward and backward, so the source of the propagation is not notified again.
/// A unit axis direction yields five positions.
#[must_use]
pub fn directional_neighbors(center: BlockPos, direction: Vector3<i32>) -> SmallVec<[BlockPos; 7]> {
    let mut out = SmallVec::new();
    out.push(center);
    out.extend(
        NEIGHBOR_ORDER
            .into_iter()
            .filter(|dir| component(direction, dir.axis()) == 0)
            .map(|dir| center.relative(dir)),
    );
    out
}

const fn component(v: Vector3<i32>, axis: Axis) -> i32 {
    match axis {
        Axis::X => v.x,
        Axis::Y => v.y,
        Axis::Z => v.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors() {
        let pos = BlockPos::new(10, 64, -5);
        assert_eq!(
            neighbors(pos),
            [
                BlockPos::new(9, 64, -5),
                BlockPos::new(11, 64, -5),
                BlockPos::new(10, 63, -5),
                BlockPos::new(10, 65, -5),
                BlockPos::new(10, 64, -6),
                BlockPos::new(10, 64, -4),
            ]
        );
    }

    #[test]
    fn test_directional_skips_travel_axis() {
        let center = BlockPos::new(1, 0, 0);
        let out = directional_neighbors(center, Vector3::new(1, 0, 0));
        assert_eq!(
            out.as_slice(),
            &[
                center,
                BlockPos::new(1, -1, 0),
                BlockPos::new(1, 1, 0),
                BlockPos::new(1, 0, -1),
                BlockPos::new(1, 0, 1),
            ]
        );

        for dir in Direction::ALL {
            let out = directional_neighbors(center, dir.normal());
            assert_eq!(out.len(), 5);
            assert!(!out.contains(&center.relative(dir)));
            assert!(!out.contains(&center.relative(dir.opposite())));
        }
    }

    #[test]
    fn test_directional_zero_vector_keeps_all() {
        let center = BlockPos::ORIGIN;
        let out = directional_neighbors(center, Vector3::new(0, 0, 0));
        assert_eq!(out.len(), 7);
        assert_eq!(&out[1..], &neighbors(center));
    }
}
