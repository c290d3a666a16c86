//! Tikzomaton - Grid-based automaton editor with TikZ export
//! Places states on a grid and keeps an equivalent `tikzpicture` in sync

pub mod automaton;
pub mod canvas;
pub mod grid;
pub mod parser;
pub mod tikz;

pub use automaton::*;
pub use parser::{parse_diagrams, parse_script};
pub use tikz::generate_tikz_code;
