use crate::direction::Direction;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_EDGE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of an edge.
///
/// Ids are handed out in increasing order when an [`Edge`] is created and are
/// never reused within a process. Cloning an edge keeps its id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Draws a fresh id, for edges that only exist outside a knot.
    pub(crate) fn allocate() -> Self {
        EdgeId(NEXT_EDGE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// An RGBA color with 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Color given to edges that were not assigned one.
    pub const DEFAULT: Color = Color::rgb(0x64, 0x95, 0xED);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Eight hex digits, `RRGGBBAA`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }

    /// Parses `RRGGBB` (opaque) or `RRGGBBAA`.
    pub fn from_hex(s: &str) -> Option<Color> {
        if (s.len() != 6 && s.len() != 8) || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        let a = if s.len() == 8 { channel(6)? } else { 0xFF };
        Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::DEFAULT
    }
}

/// A directed, colored unit segment of a knot.
///
/// Equality and hashing only look at the [`EdgeId`]: two edges with the same
/// direction and color are distinct unless one is a clone of the other.
#[derive(Clone, Debug)]
pub struct Edge {
    id: EdgeId,
    direction: Direction,
    pub color: Color,
    /// Ids of the rectangle patches this edge borders.
    pub rectangles: BTreeSet<i32>,
}

impl Edge {
    pub fn new(direction: Direction) -> Self {
        Self::with_color(direction, Color::DEFAULT)
    }

    pub fn with_color(direction: Direction, color: Color) -> Self {
        Self {
            id: EdgeId::allocate(),
            direction,
            color,
            rectangles: BTreeSet::new(),
        }
    }

    pub fn up() -> Self {
        Self::new(Direction::Up)
    }

    pub fn down() -> Self {
        Self::new(Direction::Down)
    }

    pub fn left() -> Self {
        Self::new(Direction::Left)
    }

    pub fn right() -> Self {
        Self::new(Direction::Right)
    }

    pub fn forward() -> Self {
        Self::new(Direction::Forward)
    }

    pub fn backward() -> Self {
        Self::new(Direction::Backward)
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// A fresh edge running the opposite way, with the same color.
    pub fn reversed(&self) -> Edge {
        Edge::with_color(self.direction.reverse(), self.color)
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
