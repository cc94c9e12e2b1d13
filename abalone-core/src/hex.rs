//! Hex board geometry with axial coordinates

use serde::{Deserialize, Serialize};

/// A push/step direction as an axial offset (dx, dz)
pub type Direction = (i8, i8);

/// The six unit directions of the hex grid, in axial coordinates.
/// These are all (dx, dz) pairs drawn from {-1, 0, 1} excluding (0, 0)
/// whose cube coordinates sum to zero.
pub const DIRECTIONS: [Direction; 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub x: i8,
    pub z: i8,
}

impl Hex {
    pub const fn new(x: i8, z: i8) -> Self {
        Self { x, z }
    }

    /// Derived cube coordinate: x + y + z = 0
    pub fn y(&self) -> i8 {
        -self.x - self.z
    }

    /// The six adjacent hexes, unfiltered by board membership
    pub fn neighbours(&self) -> impl Iterator<Item = Hex> + '_ {
        DIRECTIONS
            .iter()
            .map(move |&(dx, dz)| Hex::new(self.x + dx, self.z + dz))
    }

    /// Hex (moving) distance to another hex
    pub fn distance_to(&self, other: Hex) -> i8 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y() - other.y()).abs();
        let dz = (self.z - other.z).abs();
        (dx + dy + dz) / 2
    }

    /// Distance from the board centre (0, 0)
    pub fn distance_to_center(&self) -> i8 {
        (self.x.abs() + self.y().abs() + self.z.abs()) / 2
    }

    pub fn is_adjacent(&self, other: Hex) -> bool {
        self.distance_to(other) == 1
    }

    /// Direction from this hex to another (not normalised; unit for neighbours)
    pub fn direction_to(&self, other: Hex) -> Direction {
        (other.x - self.x, other.z - self.z)
    }

    /// Step `steps` times in `direction`
    pub fn offset(&self, direction: Direction, steps: i8) -> Hex {
        Hex::new(
            self.x + direction.0 * steps,
            self.z + direction.1 * steps,
        )
    }
}

/// Alignment of a hex with a direction, used to order a block along its push
/// axis. Strictly increasing along any of the six unit directions.
pub fn dot(hex: Hex, direction: Direction) -> i32 {
    // Cube-space dot product so perpendicular axes never tie along the axis
    // of `direction` itself.
    let (dx, dz) = direction;
    let dy = -dx - dz;
    (hex.x as i32 * dx as i32) + (hex.y() as i32 * dy as i32) + (hex.z as i32 * dz as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions_are_units() {
        for &(dx, dz) in &DIRECTIONS {
            assert_eq!(Hex::new(0, 0).distance_to(Hex::new(dx, dz)), 1);
        }
    }

    #[test]
    fn test_neighbours() {
        let h = Hex::new(1, -2);
        let ns: Vec<_> = h.neighbours().collect();
        assert_eq!(ns.len(), 6);
        for n in ns {
            assert!(h.is_adjacent(n));
        }
    }

    #[test]
    fn test_distance() {
        assert_eq!(Hex::new(0, 0).distance_to(Hex::new(0, 0)), 0);
        assert_eq!(Hex::new(0, 0).distance_to(Hex::new(3, 0)), 3);
        assert_eq!(Hex::new(-2, 1).distance_to(Hex::new(1, 1)), 3);
        assert_eq!(Hex::new(2, -1).distance_to_center(), 2);
    }

    #[test]
    fn test_direction_to() {
        let a = Hex::new(0, 0);
        let b = Hex::new(1, -1);
        assert_eq!(a.direction_to(b), (1, -1));
        assert_eq!(b.direction_to(a), (-1, 1));
    }

    #[test]
    fn test_dot_orders_along_direction() {
        let dir = (1, 0);
        let a = Hex::new(0, 2);
        let b = a.offset(dir, 1);
        let c = a.offset(dir, 2);
        assert!(dot(a, dir) < dot(b, dir));
        assert!(dot(b, dir) < dot(c, dir));
    }
}
