use crate::direction::Direction;
use crate::edge::EdgeId;
use crate::grid::Grid;
use crate::node::{Node, SCALE};
use glam::Vec3;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace};

/// Spatial key of a candidate patch: doubled lattice coordinates of its center.
type PatchKey = [i32; 3];

/// One side of a unit square that an edge could close.
#[derive(Clone, Debug, PartialEq)]
pub struct PossibleRectanglePosition {
    pub edge: EdgeId,
    pub node_a: Node,
    pub node_b: Node,
    /// Direction from the edge towards the square's center.
    pub side: Direction,
    pub position: Vec3,
    pub is_virtual: bool,
}

/// A unit square bounded by two registered edges.
///
/// `edge1` runs from `node_a` to `node_b`, `edge2` from `node_c` to `node_d`.
/// Either `node_b == node_c` (the edges meet end to end) or the two edges are
/// parallel with equal displacement on opposite sides of the square.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidRectanglePosition {
    pub edge1: EdgeId,
    pub edge2: EdgeId,
    pub node_a: Node,
    pub node_b: Node,
    pub node_c: Node,
    pub node_d: Node,
    pub position: Vec3,
    /// Whether either edge was synthesized to close a gap.
    pub is_virtual: bool,
    key: PatchKey,
}

impl ValidRectanglePosition {
    fn is_end_to_end(&self) -> bool {
        self.node_b == self.node_c
    }

    /// The four corners in order around the square, starting at `node_a`.
    pub fn corners(&self) -> [Node; 4] {
        if self.is_end_to_end() {
            [self.node_a, self.node_b, self.node_d, self.node_a + self.node_d - self.node_b]
        } else {
            [self.node_a, self.node_b, self.node_d, self.node_c]
        }
    }

    /// The two sides of the square not covered by `edge1` or `edge2`.
    pub fn missing_sides(&self) -> [(Node, Node); 2] {
        let [_, b, d, x] = self.corners();
        if self.is_end_to_end() {
            [(d, x), (x, self.node_a)]
        } else {
            [(b, d), (x, self.node_a)]
        }
    }
}

/// Collects candidate patch positions for edges and pairs them up.
#[derive(Clone, Debug, Default)]
pub struct RectangleMap {
    positions: BTreeMap<PatchKey, Vec<PossibleRectanglePosition>>,
    segments: HashSet<(Node, Node)>,
    virtual_edges: HashSet<EdgeId>,
}

impl RectangleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every pipe of `grid` as a real edge.
    pub fn add_grid(&mut self, grid: &Grid) {
        for pipe in grid.pipes() {
            self.add_edge(pipe.edge, pipe.node1, pipe.node2, false);
        }
    }

    /// Registers the four patch candidates around the segment `node_a -> node_b`.
    ///
    /// Returns `false` and registers nothing if the nodes are not neighbours.
    pub fn add_edge(&mut self, edge: EdgeId, node_a: Node, node_b: Node, is_virtual: bool) -> bool {
        let Some(direction) = node_a.direction_to(node_b) else {
            return false;
        };
        let center = node_a.center_between(node_b);
        for side in direction.orthogonal() {
            let key = patch_key(node_a, node_b, side);
            self.positions.entry(key).or_default().push(PossibleRectanglePosition {
                edge,
                node_a,
                node_b,
                side,
                position: center + side.to_vector() * (SCALE as f32 / 2.0),
                is_virtual,
            });
        }
        self.segments.insert(segment(node_a, node_b));
        if is_virtual {
            self.virtual_edges.insert(edge);
        }
        true
    }

    /// Whether some registered edge spans the two nodes, in either order.
    pub fn contains_edge(&self, node_a: Node, node_b: Node) -> bool {
        self.segments.contains(&segment(node_a, node_b))
    }

    pub fn is_virtual(&self, edge: EdgeId) -> bool {
        self.virtual_edges.contains(&edge)
    }

    /// Number of registered candidates.
    pub fn len(&self) -> usize {
        self.positions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Every pair of candidates at the same spot that bounds a unit square.
    pub fn valid_positions(&self) -> impl Iterator<Item = ValidRectanglePosition> + '_ {
        self.positions.iter().flat_map(|(&key, list)| {
            (0..list.len()).flat_map(move |i| (i + 1..list.len()).filter_map(move |j| pair(key, &list[i], &list[j])))
        })
    }
}

fn patch_key(node_a: Node, node_b: Node, side: Direction) -> PatchKey {
    let [dx, dy, dz] = side.offset();
    [node_a.x + node_b.x + dx, node_a.y + node_b.y + dy, node_a.z + node_b.z + dz]
}

fn segment(a: Node, b: Node) -> (Node, Node) {
    if a <= b { (a, b) } else { (b, a) }
}

fn pair(key: PatchKey, p: &PossibleRectanglePosition, q: &PossibleRectanglePosition) -> Option<ValidRectanglePosition> {
    let (first, second) = if p.node_b == q.node_a {
        (p, q)
    } else if q.node_b == p.node_a {
        (q, p)
    } else if p.node_a != q.node_a && p.node_a - p.node_b == q.node_a - q.node_b {
        (p, q)
    } else {
        return None;
    };
    Some(ValidRectanglePosition {
        edge1: first.edge,
        edge2: second.edge,
        node_a: first.node_a,
        node_b: first.node_b,
        node_c: second.node_a,
        node_d: second.node_b,
        position: first.position,
        is_virtual: first.is_virtual || second.is_virtual,
        key,
    })
}

/// Rectangles closing the surface of a knot, as found by [`RectangleMap::close`].
#[derive(Clone, Debug, Default)]
pub struct SurfacePatches {
    /// One rectangle per unit square, in discovery order.
    pub rectangles: Vec<ValidRectanglePosition>,
    pub passes: usize,
    /// Ids of the edges synthesized to close gaps, in creation order.
    pub virtual_edges: Vec<EdgeId>,
}

impl RectangleMap {
    /// Pairs up the registered edges until the surface is closed.
    ///
    /// Each pass synthesizes the missing sides of newly found squares as
    /// virtual edges. A square needs at least one real edge, so only sides of
    /// squares touching real edges are ever synthesized and the loop stops
    /// once a pass adds no edge.
    pub fn close(&mut self) -> SurfacePatches {
        let mut seen: HashSet<PatchKey> = HashSet::new();
        let mut patches = SurfacePatches::default();
        loop {
            patches.passes += 1;
            let mut new_sides: Vec<(Node, Node)> = Vec::new();
            let found: Vec<ValidRectanglePosition> = self
                .valid_positions()
                .filter(|r| !(self.is_virtual(r.edge1) && self.is_virtual(r.edge2)))
                .collect();

            for rect in found {
                if !seen.insert(rect.key) {
                    continue;
                }
                for (a, b) in rect.missing_sides() {
                    if !self.contains_edge(a, b) && !new_sides.iter().any(|&(x, y)| segment(x, y) == segment(a, b)) {
                        new_sides.push((a, b));
                    }
                }
                trace!(position = ?rect.position, is_virtual = rect.is_virtual, "rectangle");
                patches.rectangles.push(rect);
            }

            if new_sides.is_empty() {
                break;
            }
            for (a, b) in new_sides {
                let id = EdgeId::allocate();
                self.add_edge(id, a, b, true);
                patches.virtual_edges.push(id);
            }
        }

        debug!(
            rectangles = patches.rectangles.len(),
            passes = patches.passes,
            virtual_edges = patches.virtual_edges.len(),
            "surface closed"
        );
        patches
    }
}

/// Finds the rectangles needed to close the knot surface of `grid`.
pub fn close_surface(grid: &Grid) -> SurfacePatches {
    let mut map = RectangleMap::new();
    map.add_grid(grid);
    map.close()
}
