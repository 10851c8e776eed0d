use crate::direction::Direction;
use glam::Vec3;
use std::ops::{Add, Sub};

/// Distance in continuous space between two neighbouring lattice nodes.
pub const SCALE: i32 = 100;

/// An integer position on the 3D lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Node {
    pub const ORIGIN: Node = Node { x: 0, y: 0, z: 0 };

    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position of the node in continuous space.
    pub fn to_vector(self) -> Vec3 {
        Vec3::new(
            (self.x * SCALE) as f32,
            (self.y * SCALE) as f32,
            (self.z * SCALE) as f32,
        )
    }

    /// Inverse of [`Node::to_vector`], truncating towards zero.
    pub fn from_vector(v: Vec3) -> Self {
        let s = SCALE as f32;
        Self::new((v.x / s) as i32, (v.y / s) as i32, (v.z / s) as i32)
    }

    /// Midpoint between two nodes in continuous space.
    pub fn center_between(self, other: Node) -> Vec3 {
        (self.to_vector() + other.to_vector()) * 0.5
    }

    /// The unit step leading from `self` to `other`, if they are neighbours.
    pub fn direction_to(self, other: Node) -> Option<Direction> {
        let d = other - self;
        Direction::ALL.into_iter().find(|dir| dir.offset() == [d.x, d.y, d.z])
    }

    /// Twice the coordinates, so that midpoints of neighbouring nodes stay integral.
    pub(crate) fn doubled(self) -> [i32; 3] {
        [self.x * 2, self.y * 2, self.z * 2]
    }
}

impl Add<Direction> for Node {
    type Output = Node;

    fn add(self, d: Direction) -> Node {
        let [dx, dy, dz] = d.offset();
        Node::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl Sub<Direction> for Node {
    type Output = Node;

    fn sub(self, d: Direction) -> Node {
        self + d.reverse()
    }
}

impl Add for Node {
    type Output = Node;

    fn add(self, o: Node) -> Node {
        Node::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Node {
    type Output = Node;

    fn sub(self, o: Node) -> Node {
        Node::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

// Vector offsets are lattice units, truncated per component.
impl Add<Vec3> for Node {
    type Output = Node;

    fn add(self, v: Vec3) -> Node {
        Node::new(self.x + v.x as i32, self.y + v.y as i32, self.z + v.z as i32)
    }
}

impl Sub<Vec3> for Node {
    type Output = Node;

    fn sub(self, v: Vec3) -> Node {
        Node::new(self.x - v.x as i32, self.y - v.y as i32, self.z - v.z as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_roundtrip() {
        let n = Node::new(3, -2, 7);
        for d in Direction::ALL {
            assert_eq!((n + d) - d, n);
            assert_ne!(n + d, n);
        }
        assert_eq!(n + Direction::Zero, n);
    }

    #[test]
    fn test_scale() {
        assert_eq!(SCALE, 100);
        let n = Node::new(1, -2, 3);
        assert_eq!(n.to_vector(), Vec3::new(100.0, -200.0, 300.0));
        assert_eq!(Node::from_vector(n.to_vector()), n);
        // Truncation, not rounding.
        assert_eq!(Node::from_vector(Vec3::new(199.0, -150.0, 0.0)), Node::new(1, -1, 0));
    }

    #[test]
    fn test_node_arithmetic() {
        let a = Node::new(1, 2, 3);
        let b = Node::new(-1, 0, 5);
        assert_eq!(a + b, Node::new(0, 2, 8));
        assert_eq!(a - b, Node::new(2, 2, -2));
        assert_eq!(a + Vec3::new(1.9, -1.9, 0.0), Node::new(2, 1, 3));
        assert_eq!(a - Vec3::new(1.0, 1.0, 1.0), Node::new(0, 1, 2));
        assert_eq!(a.center_between(a + Direction::Right), Vec3::new(150.0, 200.0, 300.0));
        assert_eq!(a.direction_to(a + Direction::Forward), Some(Direction::Forward));
        assert_eq!(a.direction_to(a), None);
        assert_eq!(a.direction_to(b), None);
    }
}
