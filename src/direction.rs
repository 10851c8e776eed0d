use glam::Vec3;
use std::fmt;

/// The three coordinate axes of the lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// The two directions lying on this axis, positive first.
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Axis::X => [Direction::Right, Direction::Left],
            Axis::Y => [Direction::Up, Direction::Down],
            Axis::Z => [Direction::Backward, Direction::Forward],
        }
    }
}

/// One of the six unit steps on the lattice, or the `Zero` sentinel.
///
/// Right is +X, Up is +Y and Backward is +Z, so Forward points along -Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Zero,
    Left,
    Right,
    Up,
    Down,
    Forward,
    Backward,
}

impl Direction {
    /// All non-zero directions.
    pub const ALL: [Direction; 6] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
        Direction::Forward,
        Direction::Backward,
    ];

    pub fn reverse(self) -> Direction {
        match self {
            Direction::Zero => Direction::Zero,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// The axis of a non-zero direction, `None` for `Zero`.
    pub fn axis(self) -> Option<Axis> {
        match self {
            Direction::Zero => None,
            Direction::Left | Direction::Right => Some(Axis::X),
            Direction::Up | Direction::Down => Some(Axis::Y),
            Direction::Forward | Direction::Backward => Some(Axis::Z),
        }
    }

    pub fn is_zero(self) -> bool {
        self == Direction::Zero
    }

    /// Integer unit offset of this direction.
    pub fn offset(self) -> [i32; 3] {
        match self {
            Direction::Zero => [0, 0, 0],
            Direction::Left => [-1, 0, 0],
            Direction::Right => [1, 0, 0],
            Direction::Up => [0, 1, 0],
            Direction::Down => [0, -1, 0],
            Direction::Forward => [0, 0, -1],
            Direction::Backward => [0, 0, 1],
        }
    }

    pub fn to_vector(self) -> Vec3 {
        let [x, y, z] = self.offset();
        Vec3::new(x as f32, y as f32, z as f32)
    }

    /// Whether both directions lie on the same axis. `Zero` is parallel to nothing.
    pub fn is_parallel(self, other: Direction) -> bool {
        match (self.axis(), other.axis()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// The four non-zero directions orthogonal to this one.
    pub fn orthogonal(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |d| !self.is_zero() && !d.is_parallel(self))
    }

    /// Character used by the knot text format: uppercase for the positive
    /// end of an axis, lowercase for the negative end.
    pub fn to_char(self) -> Option<char> {
        match self {
            Direction::Zero => None,
            Direction::Right => Some('X'),
            Direction::Left => Some('x'),
            Direction::Up => Some('Y'),
            Direction::Down => Some('y'),
            Direction::Backward => Some('Z'),
            Direction::Forward => Some('z'),
        }
    }

    pub fn from_char(c: char) -> Option<Direction> {
        match c {
            'X' => Some(Direction::Right),
            'x' => Some(Direction::Left),
            'Y' => Some(Direction::Up),
            'y' => Some(Direction::Down),
            'Z' => Some(Direction::Backward),
            'z' => Some(Direction::Forward),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Zero => "Zero",
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Forward => "Forward",
            Direction::Backward => "Backward",
        };
        f.pad(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_is_involution() {
        for d in Direction::ALL {
            assert_ne!(d, d.reverse());
            assert_eq!(d, d.reverse().reverse());
            assert_eq!(d.axis(), d.reverse().axis());
        }
        assert_eq!(Direction::Zero.reverse(), Direction::Zero);
    }

    #[test]
    fn test_each_axis_has_two_directions() {
        for axis in Axis::ALL {
            let count = Direction::ALL.iter().filter(|d| d.axis() == Some(axis)).count();
            assert_eq!(count, 2);
            for d in axis.directions() {
                assert_eq!(d.axis(), Some(axis));
            }
        }
    }

    #[test]
    fn test_orthogonal_directions() {
        let ortho: Vec<Direction> = Direction::Up.orthogonal().collect();
        assert_eq!(ortho.len(), 4);
        assert!(!ortho.contains(&Direction::Up));
        assert!(!ortho.contains(&Direction::Down));
        assert_eq!(Direction::Zero.orthogonal().count(), 0);
    }

    #[test]
    fn test_char_mapping() {
        for d in Direction::ALL {
            let c = d.to_char().unwrap();
            assert_eq!(Direction::from_char(c), Some(d));
        }
        assert_eq!(Direction::from_char('Z'), Some(Direction::Backward));
        assert_eq!(Direction::from_char('q'), None);
        // Forward points into the screen.
        assert_eq!(Direction::Forward.to_vector(), Vec3::new(0.0, 0.0, -1.0));
    }
}
