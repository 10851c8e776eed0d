use crate::direction::Direction;
use crate::grid::{Grid, GridConfig, JunctionKind};
use crate::knot::Knot;
use crate::knot_io;
use crate::node::Node;
use crate::rectangle::close_surface;
use crate::scramble::{get_seed, scramble};
use glam::Vec3;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS: &'static str = r#"
export const SCALE = 100;
export const DIRECTION_RIGHT = "X";
export const DIRECTION_LEFT = "x";
export const DIRECTION_UP = "Y";
export const DIRECTION_DOWN = "y";
export const DIRECTION_BACKWARD = "Z";
export const DIRECTION_FORWARD = "z";
"#;

/// A knot together with its grid, for JavaScript renderers.
///
/// Directions are passed as the characters of the knot text format. Geometry
/// is returned as flat arrays of lattice coordinates.
#[wasm_bindgen]
pub struct KnotScene {
    knot: Knot,
    grid: Grid,
}

#[wasm_bindgen]
impl KnotScene {
    /// Creates a scene holding the default knot.
    #[wasm_bindgen(constructor)]
    pub fn new() -> KnotScene {
        KnotScene::with_knot(Knot::default())
    }

    #[wasm_bindgen(js_name = fromText)]
    pub fn from_text(text: &str) -> Result<KnotScene, JsError> {
        let knot = knot_io::decode(text).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(KnotScene::with_knot(knot))
    }

    #[wasm_bindgen(js_name = toText)]
    pub fn to_text(&self) -> String {
        knot_io::encode(&self.knot)
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.knot.name().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn count_edges(&self) -> usize {
        self.knot.len()
    }

    /// Direction characters of all edges in sequence order.
    #[wasm_bindgen(getter)]
    pub fn directions(&self) -> String {
        self.knot.iter().filter_map(|e| e.direction().to_char()).collect()
    }

    /// Moves the first node and re-indexes the grid.
    pub fn set_offset(&mut self, x: f32, y: f32, z: f32) {
        self.grid.set_offset(Vec3::new(x, y, z));
        self.grid.update(&self.knot);
    }

    pub fn select(&mut self, index: usize) {
        if let Some(id) = self.knot.edges().get(index).map(|e| e.id()) {
            self.knot.add_to_selection(id);
        }
    }

    pub fn select_range(&mut self, index: usize) {
        if let Some(id) = self.knot.edges().get(index).map(|e| e.id()) {
            self.knot.add_range_to_selection(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.knot.clear_selection();
    }

    /// Indices of the selected edges.
    #[wasm_bindgen(getter)]
    pub fn selection(&self) -> Vec<u32> {
        (0..self.knot.len())
            .filter(|&i| self.knot.is_selected(self.knot.edges()[i].id()))
            .map(|i| i as u32)
            .collect()
    }

    pub fn is_valid_direction(&self, direction: char) -> bool {
        Direction::from_char(direction).is_some_and(|d| self.knot.is_valid_direction(d))
    }

    pub fn move_selection(&mut self, direction: char, distance: i32) -> bool {
        let Some(direction) = Direction::from_char(direction) else {
            return false;
        };
        let moved = self.knot.move_selection(direction, distance);
        if moved {
            self.grid.update(&self.knot);
        }
        moved
    }

    /// Nodes `[x, y, z, ...]` along the knot a move would produce, or
    /// `undefined` if the move is illegal.
    pub fn preview(&self, direction: char, distance: i32) -> Option<Vec<i32>> {
        let preview = self.knot.try_move(Direction::from_char(direction)?, distance)?;
        let mut node = Node::from_vector(self.grid.config().offset);
        let mut out = Vec::with_capacity((preview.len() + 1) * 3);
        out.extend([node.x, node.y, node.z]);
        for edge in &preview {
            node = node + edge.direction();
            out.extend([node.x, node.y, node.z]);
        }
        Some(out)
    }

    /// `[x1, y1, z1, x2, y2, z2, ...]` for every pipe, in sequence order.
    pub fn pipes(&self) -> Vec<i32> {
        self.grid
            .pipes()
            .flat_map(|p| [p.node1.x, p.node1.y, p.node1.z, p.node2.x, p.node2.y, p.node2.z])
            .collect()
    }

    /// `[x, y, z, angled, index, ...]` for every visible junction.
    pub fn junctions(&self) -> Vec<i32> {
        self.grid
            .visible_junctions()
            .flat_map(|j| {
                let angled = (j.kind() == JunctionKind::Angled) as i32;
                [j.node.x, j.node.y, j.node.z, angled, j.index as i32]
            })
            .collect()
    }

    /// `[x, y, z, virtual, ...]` rectangle centers in continuous space.
    pub fn rectangles(&self) -> Vec<f64> {
        close_surface(&self.grid)
            .rectangles
            .iter()
            .flat_map(|r| {
                [
                    r.position.x as f64,
                    r.position.y as f64,
                    r.position.z as f64,
                    r.is_virtual as u8 as f64,
                ]
            })
            .collect()
    }

    /// Applies random moves; returns how many were applied.
    pub fn scramble(&mut self, moves: usize) -> usize {
        let applied = scramble(&mut self.knot, moves, get_seed());
        self.grid.update(&self.knot);
        applied
    }
}

impl KnotScene {
    pub fn with_knot(knot: Knot) -> KnotScene {
        let grid = Grid::from_knot(&knot, GridConfig::default());
        KnotScene { knot, grid }
    }

    pub fn knot(&self) -> &Knot {
        &self.knot
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

impl Default for KnotScene {
    fn default() -> Self {
        KnotScene::new()
    }
}
