//! Automaton Data Structures
//! Nodes, edges and the editor state that owns them

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::tikz::generate_tikz_code;


/// Grid units between two directly adjacent nodes
pub const GRID_STEP: i32 = 2;

/// Bend amount used when an edge does not specify one
pub const DEFAULT_BEND_AMOUNT: u8 = 30;

/// Largest accepted bend amount
pub const MAX_BEND_AMOUNT: u8 = 100;

/// A state of the automaton, placed on the logical grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Stable identifier (`q0`, `q1`, ...)
    pub id: String,
    /// Creation counter; decides the seed node of the TikZ export
    pub sequence: u64,
    /// Display text, also used as the TikZ node name
    pub label: String,
    /// Logical grid column
    pub grid_x: i32,
    /// Logical grid row (grows downwards)
    pub grid_y: i32,
    /// Initial state marker
    pub is_start: bool,
    /// Accepting state marker
    pub is_accepting: bool,
}

impl Node {
    pub fn new(id: impl Into<String>, sequence: u64, grid_x: i32, grid_y: i32) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            sequence,
            grid_x,
            grid_y,
            is_start: false,
            is_accepting: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn start(mut self) -> Self {
        self.is_start = true;
        self
    }

    pub fn accepting(mut self) -> Self {
        self.is_accepting = true;
        self
    }

    /// Grid position as an `(x, y)` pair
    pub fn position(&self) -> (i32, i32) {
        (self.grid_x, self.grid_y)
    }
}

/// A labeled transition between two nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: String,
    /// Source node id
    pub from: String,
    /// Target node id
    pub to: String,
    /// Transition label (TikZ math allowed)
    pub label: String,
    pub style: EdgeStyle,
}

impl Edge {
    /// Creates an edge with the editor defaults; `from == to` makes it a loop.
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let to = to.into();
        let style = if from == to {
            EdgeStyle::looped(Side::Above)
        } else {
            EdgeStyle::default()
        };
        Self {
            id: id.into(),
            from,
            to,
            label: "a".to_string(),
            style,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }
}

/// Visual style of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeStyle {
    /// Curvature of a non-loop edge
    pub bend: Bend,
    /// Bend angle; `None` means [`DEFAULT_BEND_AMOUNT`]
    pub bend_amount: Option<u8>,
    /// Where the label sits relative to a non-loop edge
    pub label_position: Side,
    /// Side of the node a self-loop is drawn on; `Some` iff the edge is a loop
    pub loop_position: Option<Side>,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            bend: Bend::None,
            bend_amount: Some(DEFAULT_BEND_AMOUNT),
            label_position: Side::Above,
            loop_position: None,
        }
    }
}

impl EdgeStyle {
    pub fn looped(position: Side) -> Self {
        Self {
            loop_position: Some(position),
            ..Self::default()
        }
    }

    pub fn bent(bend: Bend, amount: u8) -> Self {
        Self {
            bend,
            bend_amount: Some(amount.min(MAX_BEND_AMOUNT)),
            ..Self::default()
        }
    }

    pub fn is_loop(&self) -> bool {
        self.loop_position.is_some()
    }

    /// Bend amount with the default applied
    pub fn effective_bend_amount(&self) -> u8 {
        self.bend_amount.unwrap_or(DEFAULT_BEND_AMOUNT)
    }
}

/// Partial update of an [`EdgeStyle`]; `None` fields are left unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeStylePatch {
    pub bend: Option<Bend>,
    pub bend_amount: Option<u8>,
    pub label_position: Option<Side>,
    pub loop_position: Option<Side>,
}

impl EdgeStylePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Curvature of a non-loop edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Bend {
    #[default]
    None,
    Left,
    Right,
}

impl Bend {
    pub const ALL: [Bend; 3] = [Bend::None, Bend::Left, Bend::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bend::None => "none",
            Bend::Left => "left",
            Bend::Right => "right",
        }
    }
}

impl fmt::Display for Bend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bend {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Bend::None),
            "left" => Ok(Bend::Left),
            "right" => Ok(Bend::Right),
            other => Err(UnknownKeyword(other.to_string())),
        }
    }
}

/// A side of a node or an edge, named the way TikZ names anchors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Side {
    #[default]
    Above,
    Below,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Above, Side::Below, Side::Left, Side::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Above => "above",
            Side::Below => "below",
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "above" => Ok(Side::Above),
            "below" => Ok(Side::Below),
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(UnknownKeyword(other.to_string())),
        }
    }
}

/// Direction in which the editor places a new neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
    ];

    /// Grid offset of one placement step
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Right => (GRID_STEP, 0),
            Direction::Left => (-GRID_STEP, 0),
            Direction::Up => (0, -GRID_STEP),
            Direction::Down => (0, GRID_STEP),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::Left => "left",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "right" => Ok(Direction::Right),
            "left" => Ok(Direction::Left),
            "up" | "above" => Ok(Direction::Up),
            "down" | "below" => Ok(Direction::Down),
            other => Err(UnknownKeyword(other.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown keyword '{0}'")]
pub struct UnknownKeyword(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Unknown node: {0}")]
    UnknownNode(String),
    #[error("Unknown edge: {0}")]
    UnknownEdge(String),
    #[error("Edge '{0}' is not a loop; it has no loop position")]
    NotALoop(String),
    #[error("The canvas already has nodes; the first node can only be added to an empty canvas")]
    CanvasNotEmpty,
}

pub type EditResult<T> = Result<T, EditError>;

/// The node and edge lists behind the editor, plus the id counters
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_node: u64,
    next_edge: u64,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Regenerates the TikZ export for the current diagram
    pub fn tikz(&self) -> String {
        generate_tikz_code(&self.nodes, &self.edges)
    }

    /// Adds the start node `q<n>` at the origin of an empty canvas
    pub fn add_first_node(&mut self) -> EditResult<String> {
        if !self.nodes.is_empty() {
            return Err(EditError::CanvasNotEmpty);
        }
        let id = self.push_node(0, 0);
        if let Some(node) = self.nodes.last_mut() {
            node.is_start = true;
        }
        Ok(id)
    }

    /// Adds a node one step away from `from`, shifting occupied lanes outward first
    pub fn add_node(&mut self, direction: Direction, from: &str) -> EditResult<String> {
        let anchor = self
            .node(from)
            .ok_or_else(|| EditError::UnknownNode(from.to_string()))?;
        let (dx, dy) = direction.offset();
        let (x, y) = (anchor.grid_x + dx, anchor.grid_y + dy);

        let lane_occupied = self.nodes.iter().any(|n| match direction {
            Direction::Right => n.grid_x >= x && n.grid_y == y,
            Direction::Left => n.grid_x <= x && n.grid_y == y,
            Direction::Up => n.grid_y <= y && n.grid_x == x,
            Direction::Down => n.grid_y >= y && n.grid_x == x,
        });
        if lane_occupied {
            self.shift_nodes(direction, x, y);
        }

        Ok(self.push_node(x, y))
    }

    /// Places a node at explicit grid coordinates without shifting anything
    pub fn place_node(&mut self, grid_x: i32, grid_y: i32) -> String {
        self.push_node(grid_x, grid_y)
    }

    /// Removes a node together with every edge touching it
    pub fn remove_node(&mut self, id: &str) -> EditResult<Node> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| EditError::UnknownNode(id.to_string()))?;
        let node = self.nodes.remove(index);
        let before = self.edges.len();
        self.edges.retain(|e| e.from != id && e.to != id);
        log::debug!(
            "removed node {} and {} incident edge(s)",
            id,
            before - self.edges.len()
        );
        Ok(node)
    }

    pub fn toggle_start(&mut self, id: &str) -> EditResult<bool> {
        let node = self.node_mut(id)?;
        node.is_start = !node.is_start;
        Ok(node.is_start)
    }

    pub fn toggle_accepting(&mut self, id: &str) -> EditResult<bool> {
        let node = self.node_mut(id)?;
        node.is_accepting = !node.is_accepting;
        Ok(node.is_accepting)
    }

    pub fn update_node_label(&mut self, id: &str, label: impl Into<String>) -> EditResult<()> {
        self.node_mut(id)?.label = label.into();
        Ok(())
    }

    /// Connects two nodes with a default-styled edge labeled `a`
    pub fn add_edge(&mut self, from: &str, to: &str) -> EditResult<String> {
        for endpoint in [from, to] {
            if self.node(endpoint).is_none() {
                return Err(EditError::UnknownNode(endpoint.to_string()));
            }
        }
        let id = format!("e{}", self.next_edge);
        self.next_edge += 1;
        self.edges.push(Edge::new(id.clone(), from, to));
        Ok(id)
    }

    pub fn update_edge_style(&mut self, id: &str, patch: EdgeStylePatch) -> EditResult<()> {
        let edge = self.edge_mut(id)?;
        if patch.loop_position.is_some() && edge.from != edge.to {
            return Err(EditError::NotALoop(id.to_string()));
        }

        let style = &mut edge.style;
        if let Some(bend) = patch.bend {
            style.bend = bend;
        }
        if let Some(amount) = patch.bend_amount {
            style.bend_amount = Some(amount.min(MAX_BEND_AMOUNT));
        }
        if let Some(side) = patch.label_position {
            style.label_position = side;
        }
        if let Some(side) = patch.loop_position {
            style.loop_position = Some(side);
        }
        Ok(())
    }

    pub fn update_edge_label(&mut self, id: &str, label: impl Into<String>) -> EditResult<()> {
        self.edge_mut(id)?.label = label.into();
        Ok(())
    }

    pub fn remove_edge(&mut self, id: &str) -> EditResult<Edge> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| EditError::UnknownEdge(id.to_string()))?;
        Ok(self.edges.remove(index))
    }

    fn push_node(&mut self, grid_x: i32, grid_y: i32) -> String {
        let sequence = self.next_node;
        self.next_node += 1;
        let id = format!("q{}", sequence);
        log::trace!("new node {} at ({}, {})", id, grid_x, grid_y);
        self.nodes.push(Node::new(id.clone(), sequence, grid_x, grid_y));
        id
    }

    /// Moves every node at or beyond `(from_x, from_y)` one step further in `direction`.
    /// Whole columns (or rows) move, not just the lane, so the grid stays aligned.
    fn shift_nodes(&mut self, direction: Direction, from_x: i32, from_y: i32) {
        for node in &mut self.nodes {
            match direction {
                Direction::Right if node.grid_x >= from_x => node.grid_x += GRID_STEP,
                Direction::Left if node.grid_x <= from_x => node.grid_x -= GRID_STEP,
                Direction::Up if node.grid_y <= from_y => node.grid_y -= GRID_STEP,
                Direction::Down if node.grid_y >= from_y => node.grid_y += GRID_STEP,
                _ => {}
            }
        }
    }

    fn node_mut(&mut self, id: &str) -> EditResult<&mut Node> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| EditError::UnknownNode(id.to_string()))
    }

    fn edge_mut(&mut self, id: &str) -> EditResult<&mut Edge> {
        self.edges
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| EditError::UnknownEdge(id.to_string()))
    }
}

/// Reports conditions that make the exported TikZ fail or misrender in LaTeX.
///
/// Generation does not depend on this; it always produces output.
pub fn check_export(nodes: &[Node], edges: &[Edge]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    let mut labels = HashSet::new();
    let mut cells = HashSet::new();
    for node in nodes {
        if !ids.insert(node.id.as_str()) {
            errors.push(format!("Duplicate node id '{}'", node.id));
        }
        if node.label.is_empty() {
            errors.push(format!("Node '{}' has an empty label", node.id));
        } else if !labels.insert(node.label.as_str()) {
            errors.push(format!(
                "Label '{}' is used by more than one node; TikZ names will collide",
                node.label
            ));
        }
        if !cells.insert(node.position()) {
            errors.push(format!(
                "Node '{}' shares grid cell ({}, {}) with another node",
                node.id, node.grid_x, node.grid_y
            ));
        }
    }

    for edge in edges {
        for endpoint in [&edge.from, &edge.to] {
            if !ids.contains(endpoint.as_str()) {
                errors.push(format!(
                    "Edge '{}' references missing node '{}'",
                    edge.id, endpoint
                ));
            }
        }
        if edge.style.is_loop() && edge.from != edge.to {
            errors.push(format!(
                "Edge '{}' is styled as a loop but connects '{}' to '{}'",
                edge.id, edge.from, edge.to
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
