use knot3::{Direction, Edge, Grid, GridConfig, Knot, KnotError, KnotMetaData, close_surface, knot_io};

fn square() -> Knot {
    Knot::new(
        KnotMetaData::new("test"),
        vec![Edge::up(), Edge::left(), Edge::down(), Edge::right()],
    )
    .expect("square is a valid knot")
}

#[test]
fn test_knot_construction() {
    let knot = square();
    assert_eq!(knot.iter().count(), 4);
    assert_eq!(knot.meta_data().count_edges(), 4);
    assert_eq!(knot.name(), "test");

    assert_eq!(Knot::new(KnotMetaData::new("empty"), vec![]).unwrap_err(), KnotError::Empty);
    assert!(Knot::new(KnotMetaData::new("open"), vec![Edge::up(), Edge::up(), Edge::left(), Edge::down()]).is_err());
}

#[test]
fn test_knot_move_scenario() {
    let mut knot = square();
    let left = knot.edges()[1].id();
    knot.add_to_selection(left);

    assert!(!knot.move_selection(Direction::Left, 1));
    assert_eq!(knot.iter().count(), 4);
    assert!(!knot.move_selection(Direction::Right, 1));
    assert_eq!(knot.iter().count(), 4);
    assert!(!knot.move_selection(Direction::Down, 1));
    assert_eq!(knot.iter().count(), 4);

    assert!(knot.move_selection(Direction::Up, 1));
    assert!(knot.move_selection(Direction::Up, 2));
    assert!(knot.move_selection(Direction::Down, 3));
    assert_eq!(knot.iter().count(), 4);
    assert_eq!(knot.meta_data().count_edges(), 4);
}

#[test]
fn test_knot_equals_rotations() {
    let directions = [
        Direction::Up,
        Direction::Right,
        Direction::Backward,
        Direction::Down,
        Direction::Forward,
        Direction::Left,
    ];
    let reference = Knot::new(KnotMetaData::new("ref"), directions.iter().map(|&d| Edge::new(d)).collect()).unwrap();

    for r in 0..directions.len() {
        let mut rotated = directions.to_vec();
        rotated.rotate_left(r);
        let knot = Knot::new(KnotMetaData::new("rotated"), rotated.iter().map(|&d| Edge::new(d)).collect()).unwrap();
        assert_eq!(knot, reference, "rotation {} should be equal", r);

        // Inserting a detour breaks equality.
        let mut inserted = rotated.clone();
        inserted.insert(1, Direction::Up);
        inserted.insert(3, Direction::Down);
        if let Ok(other) = Knot::new(KnotMetaData::new("inserted"), inserted.into_iter().map(Edge::new).collect()) {
            assert_ne!(other, reference);
        }
    }
}

#[test]
fn test_pipeline_from_text() {
    let text = "stairs\nY112233\nX112233\nY112233\nX112233\ny112233\ny112233\nx112233\nx112233\n";
    let mut knot = knot_io::decode(text).unwrap();
    let mut grid = Grid::from_knot(&knot, GridConfig::default());
    assert_eq!(grid.pipes().count(), 8);

    let patches = close_surface(&grid);
    assert!(!patches.rectangles.is_empty());
    knot.assign_rectangle_tags(&patches.rectangles);
    assert!(knot.iter().any(|e| !e.rectangles.is_empty()));

    // Tags survive the text format.
    let again = knot_io::decode(&knot_io::encode(&knot)).unwrap();
    assert!(again.equals_with(&knot, knot3::KnotEquality::DirectionsColorsAndTags));

    let first = knot.edges()[0].id();
    knot.add_to_selection(first);
    assert!(knot.move_selection(Direction::Left, 1));
    grid.update(&knot);
    assert_eq!(grid.pipes().count(), knot.len());
    for edge in &knot {
        let before = grid.node_before_edge(edge.id()).unwrap();
        let after = grid.node_after_edge(edge.id()).unwrap();
        assert_eq!(before + edge.direction(), after);
    }
}
