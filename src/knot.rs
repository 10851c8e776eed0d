use crate::direction::Direction;
use crate::edge::{Color, Edge, EdgeId};
use crate::error::KnotError;
use crate::node::Node;
use crate::rectangle::ValidRectanglePosition;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, trace};

/// Smallest number of edges that can form a closed loop on the lattice.
pub const MIN_EDGE_COUNT: usize = 4;

/// Largest number of steps a single move may travel.
pub const MAX_MOVE_DISTANCE: i32 = 64;

/// Knots at least this long compare their rotations in parallel.
const PARALLEL_EQUALITY_LEN: usize = 256;

/// Name and bookkeeping that travel with a knot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KnotMetaData {
    pub name: String,
    count_edges: usize,
    /// File the knot was loaded from or last saved to.
    pub filename: Option<PathBuf>,
}

impl KnotMetaData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: single_line(name.into()),
            count_edges: 0,
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Number of edges of the knot this metadata belongs to.
    pub fn count_edges(&self) -> usize {
        self.count_edges
    }
}

/// Which edge attributes take part in [`Knot::equals_with`].
///
/// Directions are always compared up to rotation of the cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KnotEquality {
    #[default]
    Directions,
    DirectionsAndColors,
    DirectionsColorsAndTags,
}

/// Notification sent to listeners registered with [`Knot::on_change`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KnotEvent {
    /// The edge sequence changed; `revision` is the new revision.
    EdgesChanged { revision: u64 },
    /// The selection changed and now holds `selected` edges.
    SelectionChanged { selected: usize },
    /// Colors or rectangle tags changed, the structure did not.
    AppearanceChanged,
}

pub type KnotListener = Arc<dyn Fn(&KnotEvent) + Send + Sync>;

/// A closed curve on the lattice, stored as a cyclic sequence of edges.
///
/// The edges live in a `Vec` read modulo its length; index 0 is the anchor
/// from which iteration and node placement start.
#[derive(Clone)]
pub struct Knot {
    meta: KnotMetaData,
    edges: Vec<Edge>,
    selection: HashSet<EdgeId>,
    revision: u64,
    listeners: Vec<KnotListener>,
}

impl Knot {
    /// Creates a knot from an ordered edge list, rejecting anything that is not
    /// a valid closed loop.
    pub fn new(mut meta: KnotMetaData, edges: Vec<Edge>) -> Result<Self, KnotError> {
        validate(&edges)?;
        meta.count_edges = edges.len();
        Ok(Self {
            meta,
            edges,
            selection: HashSet::new(),
            revision: 0,
            listeners: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.meta.name = single_line(name.into());
    }

    pub fn meta_data(&self) -> &KnotMetaData {
        &self.meta
    }

    pub(crate) fn meta_data_mut(&mut self) -> &mut KnotMetaData {
        &mut self.meta
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Incremented every time the edge sequence changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    /// One full cycle starting at the given edge.
    pub fn iter_from(&self, id: EdgeId) -> Option<impl Iterator<Item = &Edge>> {
        let start = self.index_of(id)?;
        Some(self.edges[start..].iter().chain(self.edges[..start].iter()))
    }

    pub fn index_of(&self, id: EdgeId) -> Option<usize> {
        self.edges.iter().position(|e| e.id() == id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id() == id)
    }

    /// Edge at a cyclic index; any integer is reduced modulo the length.
    pub fn edge_at(&self, index: isize) -> &Edge {
        let n = self.edges.len() as isize;
        &self.edges[index.rem_euclid(n) as usize]
    }

    /// Registers a listener for edge, selection and appearance changes.
    pub fn on_change(&mut self, listener: impl Fn(&KnotEvent) + Send + Sync + 'static) {
        self.listeners.push(Arc::new(listener));
    }

    fn notify(&self, event: KnotEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }

    // --- Selection ---

    pub fn selected_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| self.selection.contains(&e.id()))
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn is_selected(&self, id: EdgeId) -> bool {
        self.selection.contains(&id)
    }

    pub fn add_to_selection(&mut self, id: EdgeId) {
        if self.index_of(id).is_some() && self.selection.insert(id) {
            trace!(edge = %id, "added to selection");
            self.notify_selection();
        }
    }

    pub fn remove_from_selection(&mut self, id: EdgeId) {
        if self.selection.remove(&id) {
            self.notify_selection();
        }
    }

    /// Extends the selection to `id` along the shorter way round the cycle,
    /// starting from the nearest selected edge.
    pub fn add_range_to_selection(&mut self, id: EdgeId) {
        let Some(target) = self.index_of(id) else {
            return;
        };
        if self.selection.is_empty() {
            self.add_to_selection(id);
            return;
        }

        let n = self.edges.len();
        let selected: Vec<usize> = (0..n).filter(|&i| self.selection.contains(&self.edges[i].id())).collect();
        let forward = selected.iter().map(|&s| (target + n - s) % n).min().unwrap_or(0);
        let backward = selected.iter().map(|&s| (s + n - target) % n).min().unwrap_or(0);

        let range: Vec<usize> = if forward <= backward {
            (0..=forward).map(|k| (target + n - k) % n).collect()
        } else {
            (0..=backward).map(|k| (target + k) % n).collect()
        };

        let mut changed = false;
        for i in range {
            changed |= self.selection.insert(self.edges[i].id());
        }
        if changed {
            self.notify_selection();
        }
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.notify_selection();
        }
    }

    fn notify_selection(&self) {
        self.notify(KnotEvent::SelectionChanged {
            selected: self.selection.len(),
        });
    }

    /// Maximal runs of consecutive selected edges as `(start, len)` pairs.
    ///
    /// Runs may wrap around the end of the sequence. A fully selected knot is
    /// a single run starting at 0.
    pub fn selected_runs(&self) -> Vec<(usize, usize)> {
        let n = self.edges.len();
        let sel: Vec<bool> = self.edges.iter().map(|e| self.selection.contains(&e.id())).collect();
        if !sel.iter().any(|&s| s) {
            return Vec::new();
        }
        if sel.iter().all(|&s| s) {
            return vec![(0, n)];
        }

        let mut runs = Vec::new();
        for start in 0..n {
            if sel[start] && !sel[(start + n - 1) % n] {
                let mut len = 1;
                while sel[(start + len) % n] {
                    len += 1;
                }
                runs.push((start, len));
            }
        }
        runs
    }

    /// Recolors every selected edge.
    pub fn set_selection_color(&mut self, color: Color) {
        let selection = &self.selection;
        let mut changed = false;
        for edge in self.edges.iter_mut().filter(|e| selection.contains(&e.id())) {
            changed |= edge.color != color;
            edge.color = color;
        }
        if changed {
            self.notify(KnotEvent::AppearanceChanged);
        }
    }

    /// Replaces all rectangle tags: each edge of the knot bordering rectangle
    /// `i` gets tag `i`. Edges not in the knot (virtual ones) are skipped.
    pub fn assign_rectangle_tags(&mut self, rectangles: &[ValidRectanglePosition]) {
        let index: HashMap<EdgeId, usize> = self.edges.iter().enumerate().map(|(i, e)| (e.id(), i)).collect();
        for edge in &mut self.edges {
            edge.rectangles.clear();
        }
        for (tag, rect) in rectangles.iter().enumerate() {
            for id in [rect.edge1, rect.edge2] {
                if let Some(&i) = index.get(&id) {
                    self.edges[i].rectangles.insert(tag as i32);
                }
            }
        }
        self.notify(KnotEvent::AppearanceChanged);
    }

    // --- Moves ---

    /// Whether the current selection may be moved along `direction` at all.
    pub fn is_valid_direction(&self, direction: Direction) -> bool {
        if direction.is_zero() || self.selection.is_empty() || self.selection.len() >= self.edges.len() {
            return false;
        }
        self.selected_edges().any(|e| !e.direction().is_parallel(direction))
    }

    /// Whether a one-step move along `direction` would succeed.
    pub fn is_valid_move(&self, direction: Direction) -> bool {
        self.try_move(direction, 1).is_some()
    }

    /// Moves the selected edges `distance` steps along `direction`.
    ///
    /// Returns `false` and leaves the knot untouched when the move is illegal.
    pub fn move_selection(&mut self, direction: Direction, distance: i32) -> bool {
        if distance == 0 {
            return self.is_valid_direction(direction);
        }
        let Some(moved) = self.try_move(direction, distance) else {
            return false;
        };
        self.edges = moved.edges;
        self.selection = moved.selection;
        self.meta.count_edges = self.edges.len();
        self.revision += 1;
        debug!(
            name = %self.meta.name,
            %direction,
            distance,
            edges = self.edges.len(),
            revision = self.revision,
            "moved selection"
        );
        self.notify(KnotEvent::EdgesChanged { revision: self.revision });
        true
    }

    /// Computes the knot a move would produce without touching `self`.
    ///
    /// The result carries no listeners. Negative distances move along the
    /// reverse direction; distances beyond [`MAX_MOVE_DISTANCE`] are rejected.
    pub fn try_move(&self, direction: Direction, distance: i32) -> Option<Knot> {
        if distance.unsigned_abs() > MAX_MOVE_DISTANCE.unsigned_abs() {
            debug!(%direction, distance, "rejected move distance");
            return None;
        }
        let (direction, steps) = if distance < 0 {
            (direction.reverse(), distance.unsigned_abs() as usize)
        } else {
            (direction, distance as usize)
        };
        if !self.is_valid_direction(direction) {
            trace!(%direction, "rejected move direction");
            return None;
        }
        if steps == 0 {
            return Some(self.detached());
        }

        let edges = self.moved_edges(direction, steps);
        if let Err(err) = validate(&edges) {
            debug!(%direction, steps, %err, "rejected move");
            return None;
        }

        let mut knot = self.detached();
        let present: HashSet<EdgeId> = edges.iter().map(Edge::id).collect();
        knot.selection.retain(|id| present.contains(id));
        knot.meta.count_edges = edges.len();
        knot.edges = edges;
        knot.revision += 1;
        Some(knot)
    }

    fn detached(&self) -> Knot {
        Knot {
            meta: self.meta.clone(),
            edges: self.edges.clone(),
            selection: self.selection.clone(),
            revision: self.revision,
            listeners: Vec::new(),
        }
    }

    /// Splices detours around every selected run and straightens the result.
    fn moved_edges(&self, direction: Direction, steps: usize) -> Vec<Edge> {
        let n = self.edges.len();
        let runs = self.selected_runs();
        let mut starts = vec![false; n];
        let mut ends = vec![false; n];
        for &(start, len) in &runs {
            starts[start] = true;
            ends[(start + len - 1) % n] = true;
        }

        let mut out = Vec::with_capacity(n.saturating_add(steps.saturating_mul(2).saturating_mul(runs.len())));
        // Edges in front of the anchor go to the end so the anchor stays at index 0.
        let mut wrapped = Vec::new();
        for (i, edge) in self.edges.iter().enumerate() {
            if starts[i] {
                let detour = std::iter::repeat_with(|| Edge::with_color(direction, edge.color)).take(steps);
                if i == 0 {
                    wrapped.extend(detour);
                } else {
                    out.extend(detour);
                }
            }
            out.push(edge.clone());
            if ends[i] {
                out.extend(std::iter::repeat_with(|| Edge::with_color(direction.reverse(), edge.color)).take(steps));
            }
        }
        out.extend(wrapped);
        compact(out)
    }

    // --- Equality ---

    /// Compares two knots up to rotation, including the attributes `mode` asks for.
    pub fn equals_with(&self, other: &Knot, mode: KnotEquality) -> bool {
        let n = self.edges.len();
        if n != other.edges.len() {
            return false;
        }
        let a = &self.edges;
        let b = &other.edges;
        let matches = |r: usize| (0..n).all(|i| edges_match(&a[i], &b[(i + r) % n], mode));
        if n >= PARALLEL_EQUALITY_LEN {
            (0..n).into_par_iter().any(matches)
        } else {
            (0..n).any(matches)
        }
    }
}

impl Default for Knot {
    /// A small non-planar loop of ten edges named "new knot".
    fn default() -> Self {
        use Direction::*;
        let edges: Vec<Edge> = [Up, Right, Right, Down, Backward, Up, Left, Left, Down, Forward]
            .into_iter()
            .map(Edge::new)
            .collect();
        let mut meta = KnotMetaData::new("new knot");
        meta.count_edges = edges.len();
        Self {
            meta,
            edges,
            selection: HashSet::new(),
            revision: 0,
            listeners: Vec::new(),
        }
    }
}

impl PartialEq for Knot {
    fn eq(&self, other: &Self) -> bool {
        self.equals_with(other, KnotEquality::Directions)
    }
}

impl fmt::Debug for Knot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let directions: String = self.edges.iter().filter_map(|e| e.direction().to_char()).collect();
        f.debug_struct("Knot")
            .field("name", &self.meta.name)
            .field("edges", &directions)
            .field("selected", &self.selection.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl<'a> IntoIterator for &'a Knot {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

/// Names occupy one line of the text format; line breaks become spaces.
pub(crate) fn single_line(name: String) -> String {
    if name.contains(['\n', '\r']) {
        name.replace(['\n', '\r'], " ")
    } else {
        name
    }
}

fn edges_match(a: &Edge, b: &Edge, mode: KnotEquality) -> bool {
    if a.direction() != b.direction() {
        return false;
    }
    match mode {
        KnotEquality::Directions => true,
        KnotEquality::DirectionsAndColors => a.color == b.color,
        KnotEquality::DirectionsColorsAndTags => a.color == b.color && a.rectangles == b.rectangles,
    }
}

/// Doubled coordinates of the midpoint of the segment leaving `node` along `direction`.
fn segment_key(node: Node, direction: Direction) -> [i32; 3] {
    let [x, y, z] = node.doubled();
    let [dx, dy, dz] = direction.offset();
    [x + dx, y + dy, z + dz]
}

/// Checks that `edges` form a valid knot: long enough, closed, and never
/// running over the same segment twice.
pub fn validate(edges: &[Edge]) -> Result<(), KnotError> {
    if edges.is_empty() {
        return Err(KnotError::Empty);
    }
    if let Some(index) = edges.iter().position(|e| e.direction().is_zero()) {
        return Err(KnotError::ZeroDirection { index });
    }
    if edges.len() < MIN_EDGE_COUNT {
        return Err(KnotError::TooFewEdges {
            min: MIN_EDGE_COUNT,
            got: edges.len(),
        });
    }

    let mut ids = HashSet::with_capacity(edges.len());
    if let Some(index) = edges.iter().position(|e| !ids.insert(e.id())) {
        return Err(KnotError::DuplicateEdge { index });
    }

    let mut position = Node::ORIGIN;
    let mut occupied: HashMap<[i32; 3], usize> = HashMap::with_capacity(edges.len());
    for (i, edge) in edges.iter().enumerate() {
        if let Some(&first) = occupied.get(&segment_key(position, edge.direction())) {
            return Err(KnotError::Overlapping { first, second: i });
        }
        occupied.insert(segment_key(position, edge.direction()), i);
        position = position + edge.direction();
    }

    if position != Node::ORIGIN {
        return Err(KnotError::NotClosed {
            x: position.x,
            y: position.y,
            z: position.z,
        });
    }
    Ok(())
}

/// Cancels adjacent pairs of opposite edges until none are left, including
/// pairs meeting across the end of the sequence.
fn compact(edges: Vec<Edge>) -> Vec<Edge> {
    let mut out: Vec<Edge> = Vec::with_capacity(edges.len());
    for edge in edges {
        if out.last().is_some_and(|last| last.direction() == edge.direction().reverse()) {
            out.pop();
        } else {
            out.push(edge);
        }
    }

    let mut front = 0;
    while out.len() - front >= 2 && out[front].direction() == out[out.len() - 1].direction().reverse() {
        out.pop();
        front += 1;
    }
    out.drain(..front);
    out
}
