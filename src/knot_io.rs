//! Plain-text knot format.
//!
//! The first line holds the knot's name, every following line one edge:
//! a direction character (`X`/`x`, `Y`/`y`, `Z`/`z` for the positive and
//! negative end of each axis), the color as `RRGGBB` or `RRGGBBAA`, and
//! optionally `#` followed by comma separated rectangle tags.
//!
//! ```text
//! square
//! Y6495EDFF
//! x6495EDFF#0
//! y6495EDFF
//! X6495EDFF#0,3
//! ```

use crate::direction::Direction;
use crate::edge::{Color, Edge};
use crate::error::FormatError;
use crate::knot::{Knot, KnotMetaData, single_line};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Renders `knot` in the text format. Colors are always written with alpha.
pub fn encode(knot: &Knot) -> String {
    let mut out = String::with_capacity(knot.name().len() + 1 + knot.len() * 12);
    out.push_str(&single_line(knot.name().to_string()));
    out.push('\n');
    for edge in knot {
        if let Some(c) = edge.direction().to_char() {
            out.push(c);
        }
        out.push_str(&edge.color.to_hex());
        if !edge.rectangles.is_empty() {
            out.push('#');
            let tags: Vec<String> = edge.rectangles.iter().map(i32::to_string).collect();
            out.push_str(&tags.join(","));
        }
        out.push('\n');
    }
    out
}

/// Parses the text format into a validated knot.
pub fn decode(text: &str) -> Result<Knot, FormatError> {
    let mut lines = text.lines().enumerate();
    let name = match lines.next() {
        Some((_, line)) if !line.trim().is_empty() => line.trim_end(),
        _ => return Err(FormatError::MissingName),
    };

    let mut edges = Vec::new();
    for (i, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        edges.push(decode_edge(line, i + 1)?);
    }

    let knot = Knot::new(KnotMetaData::new(name), edges)?;
    debug!(name, edges = knot.len(), "decoded knot");
    Ok(knot)
}

fn decode_edge(line: &str, line_no: usize) -> Result<Edge, FormatError> {
    let mut chars = line.chars();
    let first = chars.next().unwrap_or(' ');
    let direction = Direction::from_char(first).ok_or(FormatError::BadDirection {
        line: line_no,
        found: first,
    })?;

    let rest = chars.as_str();
    let (hex, tags) = match rest.split_once('#') {
        Some((hex, tags)) => (hex, Some(tags)),
        None => (rest, None),
    };
    let color = Color::from_hex(hex).ok_or_else(|| FormatError::BadColor {
        line: line_no,
        found: hex.to_string(),
    })?;

    let mut edge = Edge::with_color(direction, color);
    for tag in tags.into_iter().flat_map(|t| t.split(',')).map(str::trim).filter(|t| !t.is_empty()) {
        let value = tag.parse::<i32>().map_err(|_| FormatError::BadTag {
            line: line_no,
            found: tag.to_string(),
        })?;
        edge.rectangles.insert(value);
    }
    Ok(edge)
}

/// Reads a knot file and remembers where it came from.
pub fn load(path: impl AsRef<Path>) -> Result<Knot, FormatError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let mut knot = decode(&text)?;
    knot.meta_data_mut().filename = Some(path.to_path_buf());
    Ok(knot)
}

/// Writes `knot` to `path` and records the file name in its metadata.
pub fn save(knot: &mut Knot, path: impl AsRef<Path>) -> Result<(), FormatError> {
    let path = path.as_ref();
    fs::write(path, encode(knot))?;
    knot.meta_data_mut().filename = Some(path.to_path_buf());
    debug!(path = %path.display(), "saved knot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KnotError;

    #[test]
    fn test_encode_square() {
        let knot = Knot::new(
            KnotMetaData::new("square"),
            vec![Edge::up(), Edge::left(), Edge::down(), Edge::right()],
        )
        .unwrap();
        assert_eq!(encode(&knot), "square\nY6495EDFF\nx6495EDFF\ny6495EDFF\nX6495EDFF\n");
    }

    #[test]
    fn test_decode_with_tags_and_short_colors() {
        let text = "tagged\r\nYFF0000#1,2\nzFF0000\n\nyFF000080#2\nZ00FF00\n";
        // Up, Forward, Down, Backward: a square in the YZ plane.
        let knot = decode(text).unwrap();
        assert_eq!(knot.name(), "tagged");
        assert_eq!(knot.len(), 4);
        let e = knot.edges();
        assert_eq!(e[0].direction(), Direction::Up);
        assert_eq!(e[1].direction(), Direction::Forward);
        assert_eq!(e[0].rectangles.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(e[2].color, Color::rgba(0xFF, 0, 0, 0x80));
        assert_eq!(e[3].color, Color::rgb(0, 0xFF, 0));
    }

    #[test]
    fn test_roundtrip_keeps_attributes() {
        let mut knot = Knot::default();
        let id = knot.edges()[3].id();
        knot.add_to_selection(id);
        knot.set_selection_color(Color::rgba(1, 2, 3, 4));
        let decoded = decode(&encode(&knot)).unwrap();
        assert_eq!(decoded.name(), knot.name());
        assert!(decoded.equals_with(&knot, crate::KnotEquality::DirectionsColorsAndTags));
    }

    #[test]
    fn test_multiline_name_survives_roundtrip() {
        let mut knot = Knot::default();
        knot.meta_data_mut().name = "first\nsecond".to_string();
        let decoded = decode(&encode(&knot)).unwrap();
        assert_eq!(decoded.name(), "first second");
        assert_eq!(decoded, knot);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode(""), Err(FormatError::MissingName)));
        assert!(matches!(decode("  \nY000000"), Err(FormatError::MissingName)));
        assert!(matches!(
            decode("bad\nY000000\nQ000000"),
            Err(FormatError::BadDirection { line: 3, found: 'Q' })
        ));
        assert!(matches!(
            decode("bad\nY0000"),
            Err(FormatError::BadColor { line: 2, .. })
        ));
        assert!(matches!(
            decode("t\nY+F+F+F\nx000000\ny000000\nX000000"),
            Err(FormatError::BadColor { line: 2, .. })
        ));
        assert!(matches!(
            decode("bad\nY000000#1,x"),
            Err(FormatError::BadTag { line: 2, .. })
        ));
        assert!(matches!(
            decode("open\nY000000\nY000000"),
            Err(FormatError::Knot(KnotError::TooFewEdges { .. }))
        ));
        assert!(matches!(decode("empty\n"), Err(FormatError::Knot(KnotError::Empty))));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("knot3-io-{}.knot", std::process::id()));
        let mut knot = Knot::default();
        save(&mut knot, &path).unwrap();
        assert_eq!(knot.meta_data().filename.as_deref(), Some(path.as_path()));

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, knot);
        assert_eq!(loaded.meta_data().filename.as_deref(), Some(path.as_path()));
        fs::remove_file(&path).unwrap();

        assert!(matches!(load(&path), Err(FormatError::Io(_))));
    }
}
