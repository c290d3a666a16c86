//! TikZ Code Generator
//! Turns the node and edge lists into a `tikzpicture` that uses only
//! backward relative positioning (`right=of q0`, ...)

use std::collections::HashSet;
use std::fmt;

use crate::automaton::{Bend, Edge, EdgeStyle, Node, Side, DEFAULT_BEND_AMOUNT, GRID_STEP};

#[cfg(test)]
mod tests;

/// Opening line of every export, with the automaton preamble options
pub const TIKZ_HEADER: &str =
    "\\begin{tikzpicture}[->, shorten >=1pt,node distance=2cm,on grid,auto]";

pub const TIKZ_FOOTER: &str = "\\end{tikzpicture}";

/// Generate the complete TikZ source for a diagram.
///
/// Pure and deterministic: the same lists always produce the same text.
pub fn generate_tikz_code(nodes: &[Node], edges: &[Edge]) -> String {
    let mut code = String::new();
    code.push_str(TIKZ_HEADER);
    code.push('\n');

    let mut declared: HashSet<&str> = HashSet::with_capacity(nodes.len());
    for node in declaration_order(nodes) {
        let placement = resolve_placement(node, nodes, &declared)
            .map(|p| format!(" [{}]", p))
            .unwrap_or_default();
        code.push_str(&format!(
            "  \\node{} ({}){} {{${}$}};\n",
            node_options(node),
            node.label,
            placement,
            node.label
        ));
        declared.insert(node.id.as_str());
    }

    code.push('\n');
    code.push_str("  \\draw\n");
    let clauses: Vec<String> = edges.iter().map(|e| render_edge(e, nodes)).collect();
    code.push_str(&clauses.join("\n"));
    code.push_str(";\n");
    code.push_str(TIKZ_FOOTER);

    code
}

// ============================================================================
// DECLARATION ORDER
// ============================================================================

/// Order nodes so each one can be placed relative to a node declared before it.
///
/// The lowest-sequence node seeds the order. Each pass then appends, in
/// sequence order, every pending node that has a declared direct neighbor;
/// nodes appended earlier in a pass already count for later ones. A pass that
/// appends nothing forces the next pending node in, which keeps disconnected
/// fragments from stalling the loop.
pub fn declaration_order(nodes: &[Node]) -> Vec<&Node> {
    let mut sorted: Vec<&Node> = nodes.iter().collect();
    sorted.sort_by_key(|n| n.sequence);

    let mut order: Vec<&Node> = Vec::with_capacity(sorted.len());
    let mut declared: HashSet<&str> = HashSet::with_capacity(sorted.len());

    if let Some(&seed) = sorted.first() {
        order.push(seed);
        declared.insert(seed.id.as_str());
    }

    while order.len() < sorted.len() {
        let mut added = false;

        for &node in &sorted {
            if declared.contains(node.id.as_str()) {
                continue;
            }
            if has_declared_neighbor(node, &sorted, &declared) {
                order.push(node);
                declared.insert(node.id.as_str());
                added = true;
            }
        }

        if !added {
            let pending = sorted
                .iter()
                .copied()
                .find(|n| !declared.contains(n.id.as_str()));
            if let Some(node) = pending {
                log::debug!(
                    "no pending node touches a declared one; forcing {} into the order",
                    node.id
                );
                order.push(node);
                declared.insert(node.id.as_str());
            }
        }
    }

    order
}

/// Whether `node` has a direct neighbor (exactly one grid step away along a
/// single axis) that is already declared.
pub fn has_declared_neighbor(node: &Node, nodes: &[&Node], declared: &HashSet<&str>) -> bool {
    nodes.iter().any(|other| {
        other.id != node.id
            && declared.contains(other.id.as_str())
            && is_direct_neighbor(node, other)
    })
}

/// Exactly `(±2, 0)` or `(0, ±2)` apart
pub fn is_direct_neighbor(a: &Node, b: &Node) -> bool {
    let dx = (a.grid_x - b.grid_x).abs();
    let dy = (a.grid_y - b.grid_y).abs();
    (dx == GRID_STEP && dy == 0) || (dx == 0 && dy == GRID_STEP)
}

// ============================================================================
// RELATIVE PLACEMENT
// ============================================================================

/// A `<side>=of <reference>` positioning directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub side: Side,
    /// Label of the reference node (its TikZ name)
    pub reference: &'a str,
}

impl fmt::Display for Placement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=of {}", self.side, self.reference)
    }
}

/// Resolve where `node` goes relative to an already declared node.
///
/// The reference is the closest declared node sharing a row or column
/// (Manhattan distance, first match wins ties), falling back to the seed
/// node. Returns `None` for the seed itself and whenever the offset to the
/// reference is not axis-aligned; such nodes are declared unanchored.
pub fn resolve_placement<'a>(
    node: &Node,
    nodes: &'a [Node],
    declared: &HashSet<&str>,
) -> Option<Placement<'a>> {
    let seed = nodes.iter().min_by_key(|n| n.sequence)?;
    if seed.id == node.id {
        return None;
    }

    let mut reference = seed;
    let mut best = i32::MAX;
    for other in nodes {
        if other.id == node.id || !declared.contains(other.id.as_str()) {
            continue;
        }
        let same_row = other.grid_y == node.grid_y;
        let same_col = other.grid_x == node.grid_x;
        let distance = (node.grid_x - other.grid_x).abs() + (node.grid_y - other.grid_y).abs();
        if (same_row || same_col) && distance < best {
            best = distance;
            reference = other;
        }
    }

    let dx = node.grid_x - reference.grid_x;
    let dy = node.grid_y - reference.grid_y;
    let side = match (dx.signum(), dy.signum()) {
        (1, 0) => Side::Right,
        (-1, 0) => Side::Left,
        (0, 1) => Side::Below,
        (0, -1) => Side::Above,
        _ => {
            log::trace!(
                "{} has no axis-aligned reference (offset {}, {} from {})",
                node.id,
                dx,
                dy,
                reference.id
            );
            return None;
        }
    };

    Some(Placement {
        side,
        reference: &reference.label,
    })
}

/// `[state]`, `[state,initial]`, `[state,accepting]` or `[state,initial,accepting]`
pub fn node_options(node: &Node) -> String {
    let mut options = vec!["state"];
    if node.is_start {
        options.push("initial");
    }
    if node.is_accepting {
        options.push("accepting");
    }
    format!("[{}]", options.join(","))
}

// ============================================================================
// EDGES
// ============================================================================

/// TikZ options for an edge, in emission order.
///
/// Loops get only `loop <side>`. Other edges get the bend (with `=<amount>`
/// unless it is the default) followed by the label side unless it is `above`.
pub fn edge_options(style: &EdgeStyle) -> Vec<String> {
    let mut options = Vec::new();

    if let Some(side) = style.loop_position {
        options.push(format!("loop {}", side));
        return options;
    }

    if style.bend != Bend::None {
        let amount = style.effective_bend_amount();
        if amount == DEFAULT_BEND_AMOUNT {
            options.push(format!("bend {}", style.bend));
        } else {
            options.push(format!("bend {}={}", style.bend, amount));
        }
    }
    if style.label_position != Side::Above {
        options.push(style.label_position.to_string());
    }

    options
}

/// One `(<from>) edge[...] node{<label>} (<to>)` clause of the `\draw` block
pub fn render_edge(edge: &Edge, nodes: &[Node]) -> String {
    let options = edge_options(&edge.style);
    let options = if options.is_empty() {
        String::new()
    } else {
        format!("[{}]", options.join(", "))
    };

    format!(
        "    ({}) edge{} node{{{}}} ({})",
        endpoint_name(&edge.from, nodes),
        options,
        edge.label,
        endpoint_name(&edge.to, nodes)
    )
}

/// TikZ name of an endpoint: the node's label, or the raw id when the node
/// is missing or unlabeled.
fn endpoint_name<'a>(id: &'a str, nodes: &'a [Node]) -> &'a str {
    match nodes.iter().find(|n| n.id == id) {
        Some(node) if !node.label.is_empty() => &node.label,
        Some(_) => id,
        None => {
            log::debug!("edge endpoint {} is not in the node list", id);
            id
        }
    }
}
