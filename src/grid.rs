use crate::direction::Direction;
use crate::edge::{Edge, EdgeId};
use crate::knot::Knot;
use crate::node::Node;
use glam::Vec3;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Settings for a [`Grid`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    /// Continuous-space position of the node in front of the first edge.
    pub offset: Vec3,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { offset: Vec3::ZERO }
    }
}

/// The lattice segment spanned by one edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pipe {
    pub edge: EdgeId,
    pub direction: Direction,
    /// Node in front of the edge.
    pub node1: Node,
    /// Node behind the edge.
    pub node2: Node,
    /// Position of the edge in the sequence.
    pub index: usize,
    created_tick: u64,
    tick: u64,
}

impl Pipe {
    /// Tick of the update that first indexed this edge.
    pub fn created_tick(&self) -> u64 {
        self.created_tick
    }

    /// Tick of the update that last refreshed this pipe.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JunctionKind {
    /// The path turns at the node.
    Angled,
    /// The path passes straight through the node.
    Straight,
}

/// Two consecutive edges meeting at a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Junction {
    pub edge_from: EdgeId,
    pub edge_to: EdgeId,
    pub direction_from: Direction,
    pub direction_to: Direction,
    pub node: Node,
    /// Position of `edge_from` in the sequence.
    pub index: usize,
    tick: u64,
}

impl Junction {
    pub fn kind(&self) -> JunctionKind {
        if self.direction_from == self.direction_to {
            JunctionKind::Straight
        } else {
            JunctionKind::Angled
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }
}

/// How one end of a pipe meets the rest of the knot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipeEnd {
    /// A single straight junction: the pipe runs on into the next one and
    /// is drawn elongated.
    Capped,
    /// A single turn.
    Angled,
    /// Several junctions share the node.
    Crossing,
}

type JunctionKey = (EdgeId, EdgeId);

/// Maps the edges of a knot onto lattice nodes and indexes the pipes and
/// junctions found there.
///
/// Records are reused across updates by edge identity. Each update stamps the
/// records it touches with a new tick and drops the rest, so lookups always
/// reflect the latest edge sequence.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    config: GridConfig,
    tick: u64,
    pipes: HashMap<EdgeId, Pipe>,
    junctions: HashMap<JunctionKey, Junction>,
    nodes: HashMap<Node, Vec<JunctionKey>>,
    pipe_order: Vec<EdgeId>,
    junction_order: Vec<JunctionKey>,
}

impl Grid {
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Builds a grid and indexes `knot` right away.
    pub fn from_knot(knot: &Knot, config: GridConfig) -> Self {
        let mut grid = Self::new(config);
        grid.update(knot);
        grid
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Moves the first node. Takes effect on the next update.
    pub fn set_offset(&mut self, offset: Vec3) {
        self.config.offset = offset;
    }

    /// Number of updates performed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Re-indexes the grid for the current edges of `knot`.
    pub fn update(&mut self, knot: &Knot) {
        self.update_edges(knot.iter());
    }

    /// Re-indexes the grid for an arbitrary cyclic edge sequence.
    pub fn update_edges<'a>(&mut self, edges: impl IntoIterator<Item = &'a Edge>) {
        self.tick += 1;
        let tick = self.tick;
        let edges: Vec<(EdgeId, Direction)> = edges.into_iter().map(|e| (e.id(), e.direction())).collect();
        let n = edges.len();

        // 1. Pipes
        let mut node = Node::from_vector(self.config.offset);
        let mut nodes_after = Vec::with_capacity(n);
        let mut created = 0;
        for (index, &(edge, direction)) in edges.iter().enumerate() {
            let next = node + direction;
            match self.pipes.entry(edge) {
                Entry::Occupied(mut slot) => {
                    let pipe = slot.get_mut();
                    pipe.node1 = node;
                    pipe.node2 = next;
                    pipe.index = index;
                    pipe.tick = tick;
                }
                Entry::Vacant(slot) => {
                    slot.insert(Pipe {
                        edge,
                        direction,
                        node1: node,
                        node2: next,
                        index,
                        created_tick: tick,
                        tick,
                    });
                    created += 1;
                }
            }
            nodes_after.push(next);
            node = next;
        }

        // 2. Junctions, including the one closing the loop
        self.nodes.clear();
        self.junction_order.clear();
        for index in 0..n {
            let (edge_from, direction_from) = edges[index];
            let (edge_to, direction_to) = edges[(index + 1) % n];
            let at = nodes_after[index];
            let key = (edge_from, edge_to);
            match self.junctions.entry(key) {
                Entry::Occupied(mut slot) => {
                    let junction = slot.get_mut();
                    junction.node = at;
                    junction.index = index;
                    junction.tick = tick;
                }
                Entry::Vacant(slot) => {
                    slot.insert(Junction {
                        edge_from,
                        edge_to,
                        direction_from,
                        direction_to,
                        node: at,
                        index,
                        tick,
                    });
                }
            }
            self.nodes.entry(at).or_default().push(key);
            self.junction_order.push(key);
        }

        // 3. Sweep everything this tick did not touch
        let before = (self.pipes.len(), self.junctions.len());
        self.pipes.retain(|_, p| p.tick == tick);
        self.junctions.retain(|_, j| j.tick == tick);
        self.pipe_order = edges.iter().map(|&(id, _)| id).collect();

        debug!(
            tick,
            edges = n,
            created,
            pruned_pipes = before.0 - self.pipes.len(),
            pruned_junctions = before.1 - self.junctions.len(),
            "grid updated"
        );
    }

    pub fn pipe(&self, edge: EdgeId) -> Option<&Pipe> {
        self.pipes.get(&edge)
    }

    /// Pipes in sequence order.
    pub fn pipes(&self) -> impl Iterator<Item = &Pipe> {
        self.pipe_order.iter().filter_map(|id| self.pipes.get(id))
    }

    /// Junctions in sequence order.
    pub fn junctions(&self) -> impl Iterator<Item = &Junction> {
        self.junction_order.iter().filter_map(|key| self.junctions.get(key))
    }

    /// Junctions worth drawing: a node whose only junction is straight is
    /// left out, since the pipes simply continue through it.
    pub fn visible_junctions(&self) -> impl Iterator<Item = &Junction> {
        self.junctions().filter(|j| {
            let alone = self.nodes.get(&j.node).is_none_or(|keys| keys.len() == 1);
            !(alone && j.kind() == JunctionKind::Straight)
        })
    }

    pub fn node_before_edge(&self, edge: EdgeId) -> Option<Node> {
        self.pipes.get(&edge).map(|p| p.node1)
    }

    pub fn node_after_edge(&self, edge: EdgeId) -> Option<Node> {
        self.pipes.get(&edge).map(|p| p.node2)
    }

    pub fn junctions_at_node(&self, node: Node) -> Vec<&Junction> {
        self.nodes
            .get(&node)
            .map(|keys| keys.iter().filter_map(|k| self.junctions.get(k)).collect())
            .unwrap_or_default()
    }

    pub fn junctions_before_edge(&self, edge: EdgeId) -> Vec<&Junction> {
        self.node_before_edge(edge)
            .map(|node| self.junctions_at_node(node))
            .unwrap_or_default()
    }

    pub fn junctions_after_edge(&self, edge: EdgeId) -> Vec<&Junction> {
        self.node_after_edge(edge)
            .map(|node| self.junctions_at_node(node))
            .unwrap_or_default()
    }

    /// Classifies both ends of the pipe of `edge`, front end first.
    pub fn pipe_ends(&self, edge: EdgeId) -> Option<(PipeEnd, PipeEnd)> {
        let front = classify(&self.junctions_before_edge(edge))?;
        let back = classify(&self.junctions_after_edge(edge))?;
        Some((front, back))
    }
}

fn classify(junctions: &[&Junction]) -> Option<PipeEnd> {
    match junctions {
        [] => None,
        [single] => Some(match single.kind() {
            JunctionKind::Straight => PipeEnd::Capped,
            JunctionKind::Angled => PipeEnd::Angled,
        }),
        _ => Some(PipeEnd::Crossing),
    }
}
