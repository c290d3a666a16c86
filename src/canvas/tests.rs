//! Unit tests for canvas geometry

use crate::automaton::{Bend, Edge, EdgeStyle, Node, Side};
use crate::canvas::{edge_geometry, start_marker, trim_to_circle, EdgePath, LABEL_OFFSET};
use crate::grid::{grid_to_pixel, GridPos, PixelPos, GRID_SIZE, NODE_RADIUS};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn row() -> Vec<Node> {
    vec![Node::new("q0", 0, 0, 0), Node::new("q1", 1, 2, 0)]
}

#[test]
fn test_trim_to_circle() {
    let p = trim_to_circle(PixelPos::new(0.0, 0.0), PixelPos::new(100.0, 0.0), 25.0);
    assert!(close(p.x, 75.0) && close(p.y, 0.0));

    let same = trim_to_circle(PixelPos::new(5.0, 5.0), PixelPos::new(5.0, 5.0), 25.0);
    assert_eq!(same, PixelPos::new(5.0, 5.0));
}

#[test]
fn test_straight_edge_label_sits_above() {
    let nodes = row();
    let geometry = edge_geometry(&Edge::new("e0", "q0", "q1"), &nodes).unwrap();

    let from = grid_to_pixel(GridPos::new(0, 0), &nodes);
    let to = grid_to_pixel(GridPos::new(2, 0), &nodes);
    match geometry.path {
        EdgePath::Straight { start, end } => {
            assert!(close(start.x, from.x + NODE_RADIUS));
            assert!(close(end.x, to.x - NODE_RADIUS));
        }
        other => panic!("expected a straight edge, got {:?}", other),
    }
    // travelling right, "above" means smaller y on screen
    assert!(close(geometry.label.x, from.x + GRID_SIZE));
    assert!(close(geometry.label.y, from.y - LABEL_OFFSET));
}

#[test]
fn test_label_below_flips_offset() {
    let nodes = row();
    let edge = Edge::new("e0", "q0", "q1").with_style(EdgeStyle {
        label_position: Side::Below,
        ..EdgeStyle::default()
    });
    let geometry = edge_geometry(&edge, &nodes).unwrap();
    let from = grid_to_pixel(GridPos::new(0, 0), &nodes);
    assert!(close(geometry.label.y, from.y + LABEL_OFFSET));
}

#[test]
fn test_bend_left_curves_to_the_left_of_travel() {
    let nodes = row();
    let y = grid_to_pixel(GridPos::new(0, 0), &nodes).y;

    let left = edge_geometry(
        &Edge::new("e0", "q0", "q1").with_style(EdgeStyle::bent(Bend::Left, 30)),
        &nodes,
    )
    .unwrap();
    let right = edge_geometry(
        &Edge::new("e1", "q0", "q1").with_style(EdgeStyle::bent(Bend::Right, 30)),
        &nodes,
    )
    .unwrap();

    let control_y = |path: EdgePath| match path {
        EdgePath::Curved { control, .. } => control.y,
        other => panic!("expected a curve, got {:?}", other),
    };
    // straight distance is 2 * GRID_SIZE - 2 * NODE_RADIUS = 30; 30% of it is 9
    assert!(close(control_y(left.path), y - 9.0));
    assert!(close(control_y(right.path), y + 9.0));
}

#[test]
fn test_loop_geometry_per_side() {
    let nodes = vec![Node::new("q0", 0, 0, 0)];
    let center = grid_to_pixel(GridPos::new(0, 0), &nodes);

    for side in Side::ALL {
        let edge = Edge::new("e0", "q0", "q0").with_style(EdgeStyle::looped(side));
        let geometry = edge_geometry(&edge, &nodes).unwrap();
        let label = geometry.label;
        match side {
            Side::Above => assert!(label.y < center.y - NODE_RADIUS),
            Side::Below => assert!(label.y > center.y + NODE_RADIUS),
            Side::Left => assert!(label.x < center.x - NODE_RADIUS),
            Side::Right => assert!(label.x > center.x + NODE_RADIUS),
        }
        assert!(matches!(geometry.path, EdgePath::Loop { .. }));
    }
}

#[test]
fn test_missing_endpoint_has_no_geometry() {
    let nodes = row();
    assert!(edge_geometry(&Edge::new("e0", "q0", "q9"), &nodes).is_none());
}

#[test]
fn test_arrow_tip_and_start_marker() {
    let path = EdgePath::Straight {
        start: PixelPos::new(0.0, 0.0),
        end: PixelPos::new(10.0, 0.0),
    };
    assert_eq!(path.arrow_tip().1, PixelPos::new(10.0, 0.0));

    let (tail, head) = start_marker(PixelPos::new(100.0, 50.0));
    assert!(tail.x < head.x);
    assert!(close(head.x, 100.0 - NODE_RADIUS - 5.0));
}
