//! Unit tests for the TikZ generator

use std::collections::HashSet;

use crate::automaton::{Bend, Edge, EdgeStyle, Node, Side};
use crate::tikz::{
    declaration_order, edge_options, generate_tikz_code, has_declared_neighbor, node_options,
    render_edge, resolve_placement, Placement, TIKZ_HEADER,
};

fn node(seq: u64, x: i32, y: i32) -> Node {
    Node::new(format!("q{}", seq), seq, x, y)
}

fn order_ids(nodes: &[Node]) -> Vec<&str> {
    declaration_order(nodes).iter().map(|n| n.id.as_str()).collect()
}

/// Index of the `\node` line that declares `label`
fn declaration_line(code: &str, label: &str) -> usize {
    let needle = format!("({})", label);
    code.lines()
        .position(|l| l.trim_start().starts_with("\\node") && l.contains(&needle))
        .unwrap_or_else(|| panic!("no declaration for {}", label))
}

#[test]
fn test_two_node_scenario() {
    let nodes = vec![node(0, 0, 0).start(), node(1, 2, 0)];
    let edges = vec![Edge::new("e0", "q0", "q1")];

    let code = generate_tikz_code(&nodes, &edges);
    let expected = "\\begin{tikzpicture}[->, shorten >=1pt,node distance=2cm,on grid,auto]
  \\node[state,initial] (q0) {$q0$};
  \\node[state] (q1) [right=of q0] {$q1$};

  \\draw
    (q0) edge node{a} (q1);
\\end{tikzpicture}";
    assert_eq!(code, expected);
}

#[test]
fn test_bend_amount_in_full_output() {
    let nodes = vec![node(0, 0, 0).start(), node(1, 2, 0)];
    let edges = vec![Edge::new("e0", "q0", "q1").with_style(EdgeStyle::bent(Bend::Left, 50))];

    let code = generate_tikz_code(&nodes, &edges);
    assert!(code.contains("    (q0) edge[bend left=50] node{a} (q1);\n\\end{tikzpicture}"));
    assert!(!code.ends_with('\n'));
}

#[test]
fn test_empty_diagram() {
    let code = generate_tikz_code(&[], &[]);
    assert_eq!(code, format!("{}\n\n  \\draw\n;\n\\end{{tikzpicture}}", TIKZ_HEADER));
}

#[test]
fn test_deterministic_output() {
    let nodes = vec![
        node(0, 0, 0).start(),
        node(1, 2, 0),
        node(2, 2, 2).accepting(),
        node(3, 8, 8),
    ];
    let edges = vec![
        Edge::new("e0", "q0", "q1"),
        Edge::new("e1", "q1", "q2").with_style(EdgeStyle::bent(Bend::Right, 70)),
        Edge::new("e2", "q2", "q2"),
    ];
    assert_eq!(
        generate_tikz_code(&nodes, &edges),
        generate_tikz_code(&nodes, &edges)
    );
}

#[test]
fn test_l_shape_picks_closest_in_column() {
    let nodes = vec![node(0, 0, 0), node(1, 2, 0), node(2, 2, 2)];
    let code = generate_tikz_code(&nodes, &[]);
    assert!(code.contains("\\node[state] (q2) [below=of q1] {$q2$};"));
}

#[test]
fn test_node_options() {
    assert_eq!(node_options(&node(0, 0, 0)), "[state]");
    assert_eq!(node_options(&node(0, 0, 0).start()), "[state,initial]");
    assert_eq!(node_options(&node(0, 0, 0).accepting()), "[state,accepting]");
    assert_eq!(
        node_options(&node(0, 0, 0).start().accepting()),
        "[state,initial,accepting]"
    );
}

#[test]
fn test_relabel_updates_nodes_and_edges() {
    let nodes = vec![node(0, 0, 0).start(), node(1, 2, 0).with_label("Node1")];
    let edges = vec![Edge::new("e0", "q0", "q1")];

    let code = generate_tikz_code(&nodes, &edges);
    assert!(code.contains("\\node[state] (Node1) [right=of q0] {$Node1$};"));
    assert!(code.contains("(q0) edge node{a} (Node1)"));
    assert!(!code.contains("(q1)"));
}

#[test]
fn test_reference_uses_label_of_reference_node() {
    let nodes = vec![node(0, 0, 0).with_label("start"), node(1, 0, 2)];
    let code = generate_tikz_code(&nodes, &[]);
    assert!(code.contains("(q1) [below=of start]"));
}

#[test]
fn test_order_prefers_sequence_not_input_position() {
    // q1 is listed first but q0 still seeds the order
    let nodes = vec![node(1, 2, 0), node(0, 0, 0)];
    assert_eq!(order_ids(&nodes), vec!["q0", "q1"]);

    let code = generate_tikz_code(&nodes, &[]);
    assert!(declaration_line(&code, "q0") < declaration_line(&code, "q1"));
    assert!(code.contains("(q1) [right=of q0]"));
}

#[test]
fn test_order_follows_adjacency_chain() {
    // q2 only touches q3, which only touches q1; q1 touches the seed.
    let nodes = vec![
        node(0, 0, 0),
        node(2, 6, 0),
        node(1, 2, 0),
        node(3, 4, 0),
    ];
    // Pass 1 (sequence order q1, q2, q3): q1 joins; q2 is not yet adjacent to
    // anything declared; q3 now touches q1. Pass 2: q2 touches q3.
    assert_eq!(order_ids(&nodes), vec!["q0", "q1", "q3", "q2"]);
}

#[test]
fn test_same_pass_only_sees_earlier_additions() {
    // q1 touches only q2; q2 touches the seed.
    let nodes = vec![node(0, 0, 0), node(1, 4, 0), node(2, 2, 0)];
    // Pass 1: q1 is visited before q2 joins, so it waits for pass 2.
    assert_eq!(order_ids(&nodes), vec!["q0", "q2", "q1"]);
}

#[test]
fn test_stall_breaker_appends_next_in_sequence() {
    // q1 and q2 form an island far from the seed.
    let nodes = vec![node(0, 0, 0), node(2, 12, 10), node(1, 10, 10)];
    assert_eq!(order_ids(&nodes), vec!["q0", "q1", "q2"]);

    let code = generate_tikz_code(&nodes, &[]);
    // q1 shares no row or column with a declared node and is diagonal from the seed
    assert!(code.contains("  \\node[state] (q1) {$q1$};"));
    // q2 then anchors on the island
    assert!(code.contains("(q2) [right=of q1]"));
}

#[test]
fn test_no_forward_references() {
    let nodes = vec![
        node(0, 0, 0).start(),
        node(1, 2, 0),
        node(2, 2, 2),
        node(3, -2, 0),
        node(4, 0, -2),
        node(5, 10, 10),
        node(6, 10, 12),
        node(7, 4, 2),
    ];
    let code = generate_tikz_code(&nodes, &[]);

    for node in &nodes {
        let line_no = declaration_line(&code, &node.label);
        let line = code.lines().nth(line_no).unwrap_or_default();
        if let Some(start) = line.find("=of ") {
            let rest = &line[start + 4..];
            let reference = &rest[..rest.find(']').unwrap()];
            assert!(
                declaration_line(&code, reference) < line_no,
                "{} references {} before it is declared",
                node.label,
                reference
            );
        }
    }
}

#[test]
fn test_diagonal_only_reference_is_unanchored() {
    let nodes = vec![node(0, 0, 0), node(1, 2, 2)];
    let declared: HashSet<&str> = ["q0"].into_iter().collect();
    assert_eq!(resolve_placement(&nodes[1], &nodes, &declared), None);
}

#[test]
fn test_seed_has_no_placement() {
    let nodes = vec![node(0, 0, 0), node(1, 2, 0)];
    let declared: HashSet<&str> = ["q1"].into_iter().collect();
    assert_eq!(resolve_placement(&nodes[0], &nodes, &declared), None);
}

#[test]
fn test_placement_picks_nearest_declared_in_row() {
    let nodes = vec![node(0, 0, 0), node(1, 2, 0), node(2, 6, 0)];
    let declared: HashSet<&str> = ["q0", "q1"].into_iter().collect();
    assert_eq!(
        resolve_placement(&nodes[2], &nodes, &declared),
        Some(Placement {
            side: Side::Right,
            reference: "q1"
        })
    );
}

#[test]
fn test_placement_ignores_undeclared_nodes() {
    let nodes = vec![node(0, 0, 0), node(1, 0, -2), node(2, 0, -4)];
    let declared: HashSet<&str> = ["q0"].into_iter().collect();
    let placement = resolve_placement(&nodes[2], &nodes, &declared).map(|p| p.to_string());
    assert_eq!(placement.as_deref(), Some("above=of q0"));
}

#[test]
fn test_placement_tie_goes_to_first_listed() {
    let nodes = vec![node(0, 0, 0), node(1, 4, 0), node(2, 2, 0)];
    let declared: HashSet<&str> = ["q0", "q1"].into_iter().collect();
    let placement = resolve_placement(&nodes[2], &nodes, &declared);
    assert_eq!(
        placement,
        Some(Placement {
            side: Side::Right,
            reference: "q0"
        })
    );
}

#[test]
fn test_has_declared_neighbor() {
    let a = node(0, 0, 0);
    let b = node(1, 2, 0);
    let c = node(2, 4, 2);
    let all = vec![&a, &b, &c];

    let declared: HashSet<&str> = ["q0"].into_iter().collect();
    assert!(has_declared_neighbor(&b, &all, &declared));
    assert!(!has_declared_neighbor(&c, &all, &declared));

    let nobody: HashSet<&str> = HashSet::new();
    assert!(!has_declared_neighbor(&b, &all, &nobody));
}

#[test]
fn test_default_bend_is_suppressed() {
    let style = EdgeStyle::bent(Bend::Left, 30);
    assert_eq!(edge_options(&style), vec!["bend left"]);

    let style = EdgeStyle::bent(Bend::Left, 50);
    assert_eq!(edge_options(&style), vec!["bend left=50"]);

    let unset = EdgeStyle {
        bend: Bend::Right,
        bend_amount: None,
        ..EdgeStyle::default()
    };
    assert_eq!(edge_options(&unset), vec!["bend right"]);
}

#[test]
fn test_label_position_above_is_implicit() {
    assert!(edge_options(&EdgeStyle::default()).is_empty());

    for side in [Side::Below, Side::Left, Side::Right] {
        let style = EdgeStyle {
            label_position: side,
            ..EdgeStyle::default()
        };
        assert_eq!(edge_options(&style), vec![side.to_string()]);
    }
}

#[test]
fn test_bend_and_label_position_order() {
    let style = EdgeStyle {
        bend: Bend::Right,
        bend_amount: Some(45),
        label_position: Side::Below,
        loop_position: None,
    };
    let nodes = vec![node(0, 0, 0), node(1, 2, 0)];
    let edge = Edge::new("e0", "q0", "q1").with_style(style);
    assert_eq!(
        render_edge(&edge, &nodes),
        "    (q0) edge[bend right=45, below] node{a} (q1)"
    );
}

#[test]
fn test_loop_emits_only_loop_option() {
    let style = EdgeStyle {
        bend: Bend::Left,
        bend_amount: Some(80),
        label_position: Side::Below,
        loop_position: Some(Side::Above),
    };
    assert_eq!(edge_options(&style), vec!["loop above"]);

    let nodes = vec![node(0, 0, 0)];
    let edge = Edge::new("e0", "q0", "q0").with_label("b");
    assert_eq!(
        render_edge(&edge, &nodes),
        "    (q0) edge[loop above] node{b} (q0)"
    );
}

#[test]
fn test_dangling_endpoint_falls_back_to_id() {
    let nodes = vec![node(0, 0, 0)];
    let edge = Edge::new("e0", "q0", "q9");
    assert_eq!(render_edge(&edge, &nodes), "    (q0) edge node{a} (q9)");
}

#[test]
fn test_empty_label_endpoint_falls_back_to_id() {
    let nodes = vec![node(0, 0, 0), node(1, 2, 0).with_label("")];
    let edge = Edge::new("e0", "q0", "q1");
    assert_eq!(render_edge(&edge, &nodes), "    (q0) edge node{a} (q1)");
}

#[test]
fn test_edges_keep_input_order() {
    let nodes = vec![node(0, 0, 0), node(1, 2, 0)];
    let edges = vec![
        Edge::new("e1", "q1", "q0").with_label("y"),
        Edge::new("e0", "q0", "q1").with_label("x"),
    ];
    let code = generate_tikz_code(&nodes, &edges);
    assert!(code.contains(
        "  \\draw\n    (q1) edge node{y} (q0)\n    (q0) edge node{x} (q1);\n"
    ));
}
