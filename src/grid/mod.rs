//! Grid Geometry
//! Conversion between logical grid coordinates and canvas pixels

use crate::automaton::{Node, GRID_STEP};


/// Pixels per grid unit
pub const GRID_SIZE: f32 = 40.0;

/// Radius of a state circle in pixels
pub const NODE_RADIUS: f32 = 25.0;

/// A logical grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn of(node: &Node) -> Self {
        Self::new(node.grid_x, node.grid_y)
    }
}

/// A position on the canvas, relative to its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPos {
    pub x: f32,
    pub y: f32,
}

impl PixelPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Grid extent covered by the canvas: every node plus a margin of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl GridBounds {
    pub fn of(nodes: &[Node]) -> Self {
        let Some(first) = nodes.first() else {
            return Self {
                min_x: -GRID_STEP,
                max_x: GRID_STEP,
                min_y: -GRID_STEP,
                max_y: GRID_STEP,
            };
        };

        let mut bounds = Self {
            min_x: first.grid_x,
            max_x: first.grid_x,
            min_y: first.grid_y,
            max_y: first.grid_y,
        };
        for node in &nodes[1..] {
            bounds.min_x = bounds.min_x.min(node.grid_x);
            bounds.max_x = bounds.max_x.max(node.grid_x);
            bounds.min_y = bounds.min_y.min(node.grid_y);
            bounds.max_y = bounds.max_y.max(node.grid_y);
        }

        Self {
            min_x: bounds.min_x - GRID_STEP,
            max_x: bounds.max_x + GRID_STEP,
            min_y: bounds.min_y - GRID_STEP,
            max_y: bounds.max_y + GRID_STEP,
        }
    }

    /// Canvas width and height in pixels
    pub fn pixel_size(&self) -> (f32, f32) {
        (
            (self.max_x - self.min_x) as f32 * GRID_SIZE,
            (self.max_y - self.min_y) as f32 * GRID_SIZE,
        )
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        (self.min_x..=self.max_x).contains(&pos.x) && (self.min_y..=self.max_y).contains(&pos.y)
    }
}

pub fn grid_to_pixel(pos: GridPos, nodes: &[Node]) -> PixelPos {
    let bounds = GridBounds::of(nodes);
    PixelPos {
        x: (pos.x - bounds.min_x) as f32 * GRID_SIZE,
        y: (pos.y - bounds.min_y) as f32 * GRID_SIZE,
    }
}

/// Nearest grid position to a canvas point; exact halves round up
pub fn pixel_to_grid(pos: PixelPos, nodes: &[Node]) -> GridPos {
    let bounds = GridBounds::of(nodes);
    GridPos {
        x: round_half_up(pos.x / GRID_SIZE) + bounds.min_x,
        y: round_half_up(pos.y / GRID_SIZE) + bounds.min_y,
    }
}

fn round_half_up(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

/// The node whose circle contains `pos`, if any
pub fn node_at<'a>(pos: PixelPos, nodes: &'a [Node]) -> Option<&'a Node> {
    nodes.iter().rev().find(|node| {
        let center = grid_to_pixel(GridPos::of(node), nodes);
        let (dx, dy) = (pos.x - center.x, pos.y - center.y);
        dx * dx + dy * dy <= NODE_RADIUS * NODE_RADIUS
    })
}
