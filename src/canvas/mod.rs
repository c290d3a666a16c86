//! Canvas Geometry
//! Where edges, loops and their labels are drawn on the editor canvas.
//! Pure math over [`PixelPos`], so the GUI only has to paint the result.

use crate::automaton::{Bend, Edge, Node, Side};
use crate::grid::{grid_to_pixel, GridPos, PixelPos, NODE_RADIUS};

#[cfg(test)]
mod tests;

/// Distance between an edge and its label
pub const LABEL_OFFSET: f32 = 15.0;

const LOOP_RADIUS: f32 = 35.0;
const LOOP_SPACING: f32 = 15.0;
/// Half the gap between where a loop leaves and re-enters its node
const LOOP_SPREAD: f32 = 8.0;

/// Shape of an edge on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgePath {
    Straight {
        start: PixelPos,
        end: PixelPos,
    },
    /// Quadratic Bézier
    Curved {
        start: PixelPos,
        control: PixelPos,
        end: PixelPos,
    },
    /// Cubic Bézier leaving and re-entering the same node
    Loop {
        start: PixelPos,
        control1: PixelPos,
        control2: PixelPos,
        end: PixelPos,
    },
}

impl EdgePath {
    /// Last two points, which orient the arrowhead
    pub fn arrow_tip(&self) -> (PixelPos, PixelPos) {
        match *self {
            EdgePath::Straight { start, end } => (start, end),
            EdgePath::Curved { control, end, .. } => (control, end),
            EdgePath::Loop { control2, end, .. } => (control2, end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGeometry {
    pub path: EdgePath,
    pub label: PixelPos,
}

/// Point on the segment `from -> to` that lies `radius` short of `to`
pub fn trim_to_circle(from: PixelPos, to: PixelPos, radius: f32) -> PixelPos {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance == 0.0 {
        return to;
    }

    let ratio = (distance - radius) / distance;
    PixelPos::new(from.x + dx * ratio, from.y + dy * ratio)
}

/// Geometry of an edge, or `None` when an endpoint is missing from `nodes`
pub fn edge_geometry(edge: &Edge, nodes: &[Node]) -> Option<EdgeGeometry> {
    let from = nodes.iter().find(|n| n.id == edge.from)?;
    let to = nodes.iter().find(|n| n.id == edge.to)?;
    let from_pos = grid_to_pixel(GridPos::of(from), nodes);
    let to_pos = grid_to_pixel(GridPos::of(to), nodes);

    if let Some(side) = edge.style.loop_position {
        return Some(loop_geometry(from_pos, side));
    }

    let start = trim_to_circle(to_pos, from_pos, NODE_RADIUS);
    let end = trim_to_circle(from_pos, to_pos, NODE_RADIUS);
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let distance = (dx * dx + dy * dy).sqrt();

    let (path, mut label) = match edge.style.bend {
        Bend::None => (
            EdgePath::Straight { start, end },
            midpoint(start, end),
        ),
        Bend::Left | Bend::Right if distance > 0.0 => {
            let mid = midpoint(start, end);
            let offset = distance * f32::from(edge.style.effective_bend_amount()) / 100.0;
            let (ux, uy) = (dy / distance * offset, dx / distance * offset);
            let control = if edge.style.bend == Bend::Left {
                PixelPos::new(mid.x + ux, mid.y - uy)
            } else {
                PixelPos::new(mid.x - ux, mid.y + uy)
            };
            // apex of the quadratic curve (t = 0.5)
            let apex = PixelPos::new(
                0.25 * start.x + 0.5 * control.x + 0.25 * end.x,
                0.25 * start.y + 0.5 * control.y + 0.25 * end.y,
            );
            (EdgePath::Curved { start, control, end }, apex)
        }
        // overlapping nodes: nothing to bend around
        Bend::Left | Bend::Right => (EdgePath::Straight { start, end }, start),
    };

    if distance > 0.0 {
        let (nx, ny) = (-dy / distance, dx / distance);
        match edge.style.label_position {
            Side::Above => {
                label.x -= nx * LABEL_OFFSET;
                label.y -= ny * LABEL_OFFSET;
            }
            Side::Below => {
                label.x += nx * LABEL_OFFSET;
                label.y += ny * LABEL_OFFSET;
            }
            Side::Left | Side::Right => {}
        }
    }

    Some(EdgeGeometry { path, label })
}

fn loop_geometry(center: PixelPos, side: Side) -> EdgeGeometry {
    let reach = LOOP_SPACING + LOOP_RADIUS * 0.8;
    let (c, r, s) = (center, NODE_RADIUS, LOOP_SPREAD);

    match side {
        Side::Above => {
            let start = PixelPos::new(c.x - s, c.y - r);
            let end = PixelPos::new(c.x + s, c.y - r);
            EdgeGeometry {
                path: EdgePath::Loop {
                    start,
                    control1: PixelPos::new(start.x - LOOP_RADIUS, start.y - reach),
                    control2: PixelPos::new(end.x + LOOP_RADIUS, end.y - reach),
                    end,
                },
                label: PixelPos::new(c.x, c.y - r - LOOP_SPACING - LOOP_RADIUS * 0.7),
            }
        }
        Side::Below => {
            let start = PixelPos::new(c.x - s, c.y + r);
            let end = PixelPos::new(c.x + s, c.y + r);
            EdgeGeometry {
                path: EdgePath::Loop {
                    start,
                    control1: PixelPos::new(start.x - LOOP_RADIUS, start.y + reach),
                    control2: PixelPos::new(end.x + LOOP_RADIUS, end.y + reach),
                    end,
                },
                label: PixelPos::new(c.x, c.y + r + LOOP_SPACING + LOOP_RADIUS * 0.6),
            }
        }
        Side::Left => {
            let start = PixelPos::new(c.x - r, c.y - s);
            let end = PixelPos::new(c.x - r, c.y + s);
            EdgeGeometry {
                path: EdgePath::Loop {
                    start,
                    control1: PixelPos::new(start.x - reach, start.y - LOOP_RADIUS),
                    control2: PixelPos::new(end.x - reach, end.y + LOOP_RADIUS),
                    end,
                },
                label: PixelPos::new(c.x - r - LOOP_SPACING - LOOP_RADIUS * 0.6, c.y),
            }
        }
        Side::Right => {
            let start = PixelPos::new(c.x + r, c.y - s);
            let end = PixelPos::new(c.x + r, c.y + s);
            EdgeGeometry {
                path: EdgePath::Loop {
                    start,
                    control1: PixelPos::new(start.x + reach, start.y - LOOP_RADIUS),
                    control2: PixelPos::new(end.x + reach, end.y + LOOP_RADIUS),
                    end,
                },
                label: PixelPos::new(c.x + r + LOOP_SPACING + LOOP_RADIUS * 0.6, c.y),
            }
        }
    }
}

fn midpoint(a: PixelPos, b: PixelPos) -> PixelPos {
    PixelPos::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Short arrow pointing into a start node from its left
pub fn start_marker(center: PixelPos) -> (PixelPos, PixelPos) {
    (
        PixelPos::new(center.x - NODE_RADIUS - 20.0, center.y),
        PixelPos::new(center.x - NODE_RADIUS - 5.0, center.y),
    )
}
