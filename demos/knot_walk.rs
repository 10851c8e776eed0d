use knot3::{Direction, Grid, GridConfig, JunctionKind, Knot, close_surface, knot_io, scramble};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct PipeJson {
    from: [i32; 3],
    to: [i32; 3],
}

#[derive(Serialize)]
struct JunctionJson {
    node: [i32; 3],
    angled: bool,
    index: usize,
}

#[derive(Serialize)]
struct RectangleJson {
    position: [f32; 3],
    is_virtual: bool,
}

#[derive(Serialize)]
struct SceneJson {
    name: String,
    edges: usize,
    pipes: Vec<PipeJson>,
    junctions: Vec<JunctionJson>,
    rectangles: Vec<RectangleJson>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("knot3=debug")))
        .init();

    let mut knot = Knot::default();
    println!("Start:\n{}", knot_io::encode(&knot));

    let first = knot.edges()[1].id();
    let second = knot.edges()[2].id();
    knot.add_to_selection(first);
    knot.add_range_to_selection(second);
    for direction in Direction::ALL {
        println!("{:>8}: valid direction {}, valid move {}", direction, knot.is_valid_direction(direction), knot.is_valid_move(direction));
    }
    knot.move_selection(Direction::Up, 2);
    knot.clear_selection();

    scramble(&mut knot, 12, 2024);
    let grid = Grid::from_knot(&knot, GridConfig::default());
    let patches = close_surface(&grid);
    knot.assign_rectangle_tags(&patches.rectangles);

    let scene = SceneJson {
        name: knot.name().to_string(),
        edges: knot.len(),
        pipes: grid
            .pipes()
            .map(|p| PipeJson {
                from: [p.node1.x, p.node1.y, p.node1.z],
                to: [p.node2.x, p.node2.y, p.node2.z],
            })
            .collect(),
        junctions: grid
            .visible_junctions()
            .map(|j| JunctionJson {
                node: [j.node.x, j.node.y, j.node.z],
                angled: j.kind() == JunctionKind::Angled,
                index: j.index,
            })
            .collect(),
        rectangles: patches
            .rectangles
            .iter()
            .map(|r| RectangleJson {
                position: r.position.to_array(),
                is_virtual: r.is_virtual,
            })
            .collect(),
    };

    let path = "knot_walk.json";
    std::fs::write(path, serde_json::to_string_pretty(&scene)?)?;
    println!("Scrambled:\n{}", knot_io::encode(&knot));
    println!("Wrote {} ({} pipes, {} rectangles)", path, scene.pipes.len(), scene.rectangles.len());
    Ok(())
}
