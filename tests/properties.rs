use knot3::{Direction, Edge, Grid, GridConfig, Knot, Node, RectangleMap, close_surface, scramble, validate};
use proptest::prelude::*;

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

fn scrambled(seed: u64, moves: usize) -> Knot {
    let mut knot = Knot::default();
    scramble(&mut knot, moves, seed);
    knot
}

fn directions(knot: &Knot) -> Vec<Direction> {
    knot.iter().map(Edge::direction).collect()
}

proptest! {
    #[test]
    fn node_direction_roundtrip(x in -50i32..50, y in -50i32..50, z in -50i32..50, d in direction_strategy()) {
        let n = Node::new(x, y, z);
        prop_assert_eq!((n + d) - d, n);
        prop_assert_eq!(n.direction_to(n + d), Some(d));
    }

    #[test]
    fn moves_keep_knots_valid(
        seed in 0u64..500,
        start in 0usize..64,
        run in 1usize..4,
        direction in direction_strategy(),
        distance in -3i32..=3,
    ) {
        let mut knot = scrambled(seed, 6);
        let n = knot.len();
        for k in 0..run.min(n - 1) {
            let id = knot.edges()[(start + k) % n].id();
            knot.add_to_selection(id);
        }

        let before = directions(&knot);
        let revision = knot.revision();
        let preview = knot.try_move(direction, distance);
        let moved = knot.move_selection(direction, distance);

        prop_assert_eq!(moved, preview.is_some() || (distance == 0 && knot.is_valid_direction(direction)));
        if moved {
            prop_assert!(validate(knot.edges()).is_ok());
            if let Some(preview) = preview {
                prop_assert_eq!(&preview, &knot);
            }
            prop_assert_eq!(knot.meta_data().count_edges(), knot.len());
        } else {
            prop_assert_eq!(directions(&knot), before);
            prop_assert_eq!(knot.revision(), revision);
        }
    }

    #[test]
    fn move_and_back_restores_knot(seed in 0u64..500, start in 0usize..64, direction in direction_strategy()) {
        let mut knot = scrambled(seed, 4);
        let original = knot.clone();
        let n = knot.len();
        let id = knot.edges()[start % n].id();
        knot.add_to_selection(id);

        if knot.move_selection(direction, 1) && knot.edge(id).is_some() {
            prop_assert!(knot.move_selection(direction.reverse(), 1));
            prop_assert_eq!(&knot, &original);
        }
    }

    #[test]
    fn grid_matches_knot(seed in 0u64..500) {
        let knot = scrambled(seed, 8);
        let grid = Grid::from_knot(&knot, GridConfig::default());
        prop_assert_eq!(grid.pipes().count(), knot.len());
        prop_assert_eq!(grid.junctions().count(), knot.len());
        for edge in &knot {
            let before = grid.node_before_edge(edge.id()).unwrap();
            prop_assert_eq!(before + edge.direction(), grid.node_after_edge(edge.id()).unwrap());
            prop_assert!(grid.pipe_ends(edge.id()).is_some());
        }
    }

    #[test]
    fn surface_fixpoint_terminates(seed in 0u64..500) {
        let knot = scrambled(seed, 8);
        let grid = Grid::from_knot(&knot, GridConfig::default());
        let mut map = RectangleMap::new();
        map.add_grid(&grid);
        let patches = map.close();
        // Every pass but the last adds at least one edge.
        prop_assert!(patches.passes <= patches.virtual_edges.len() + 1);
        prop_assert_eq!(patches.rectangles.len(), close_surface(&grid).rectangles.len());
        for &id in &patches.virtual_edges {
            prop_assert!(map.is_virtual(id));
            prop_assert!(grid.pipe(id).is_none());
        }
        let mut keys: Vec<_> = patches.rectangles.iter().map(|r| r.corners()).collect();
        let count = keys.len();
        for corners in &mut keys {
            corners.sort();
        }
        keys.sort();
        keys.dedup();
        prop_assert_eq!(keys.len(), count);
        for rect in &patches.rectangles {
            prop_assert!(grid.pipe(rect.edge1).is_some() || grid.pipe(rect.edge2).is_some());
            prop_assert_eq!(rect.is_virtual, map.is_virtual(rect.edge1) || map.is_virtual(rect.edge2));
        }
    }
}
