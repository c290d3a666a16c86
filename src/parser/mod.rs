//! Script Parser Module
//! Parses editor command scripts and replays them into editor states

use std::str::FromStr;

use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

use crate::automaton::{
    Bend, Direction, EdgeStylePatch, EditError, EditorState, Side, UnknownKeyword,
    MAX_BEND_AMOUNT,
};


#[derive(Parser)]
#[grammar = "parser/automaton.pest"]
pub struct ScriptParser;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error: {0}")]
    PestError(#[from] pest::error::Error<Rule>),
    #[error("Invalid syntax at line {line}: {message}")]
    SyntaxError { line: usize, message: String },
    #[error("Line {line}: {source}")]
    EditFailed { line: usize, source: EditError },
}

pub type ParseResult<T> = Result<T, ParseError>;

/// One editor operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FirstNode,
    AddNode { direction: Direction, from: String },
    PlaceNode { x: i32, y: i32 },
    RemoveNode(String),
    ToggleStart(String),
    ToggleAccepting(String),
    RelabelNode { node: String, label: String },
    AddEdge {
        from: String,
        to: String,
        label: Option<String>,
        style: EdgeStylePatch,
    },
}

/// A command and the source line it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub line: usize,
    pub command: Command,
}

/// An `automaton Name { ... }` block before it is replayed
#[derive(Debug, Clone)]
pub struct DiagramScript {
    pub name: String,
    pub statements: Vec<Statement>,
}

impl DiagramScript {
    /// Replay the statements into a fresh editor state
    pub fn replay(&self) -> ParseResult<EditorState> {
        let mut editor = EditorState::new();
        for statement in &self.statements {
            apply(&mut editor, &statement.command).map_err(|source| ParseError::EditFailed {
                line: statement.line,
                source,
            })?;
        }
        log::debug!(
            "replayed {}: {} node(s), {} edge(s)",
            self.name,
            editor.nodes().len(),
            editor.edges().len()
        );
        Ok(editor)
    }
}

/// A named diagram built from a script
#[derive(Debug, Clone)]
pub struct Diagram {
    pub name: String,
    pub editor: EditorState,
}

/// Parse a script into its blocks without replaying them
pub fn parse_script(source: &str) -> ParseResult<Vec<DiagramScript>> {
    let pairs = ScriptParser::parse(Rule::file, source)?;
    let mut scripts = Vec::new();

    for pair in pairs {
        match pair.as_rule() {
            Rule::file => {
                for inner in pair.into_inner() {
                    if inner.as_rule() == Rule::diagram {
                        scripts.push(parse_diagram(inner)?);
                    }
                }
            }
            Rule::diagram => scripts.push(parse_diagram(pair)?),
            _ => {}
        }
    }

    Ok(scripts)
}

/// Parse a script and replay every block into an editor state
pub fn parse_diagrams(source: &str) -> ParseResult<Vec<Diagram>> {
    parse_script(source)?
        .into_iter()
        .map(|script| -> ParseResult<Diagram> {
            Ok(Diagram {
                editor: script.replay()?,
                name: script.name,
            })
        })
        .collect()
}

fn apply(editor: &mut EditorState, command: &Command) -> Result<(), EditError> {
    match command {
        Command::FirstNode => {
            editor.add_first_node()?;
        }
        Command::AddNode { direction, from } => {
            editor.add_node(*direction, from)?;
        }
        Command::PlaceNode { x, y } => {
            editor.place_node(*x, *y);
        }
        Command::RemoveNode(id) => {
            editor.remove_node(id)?;
        }
        Command::ToggleStart(id) => {
            editor.toggle_start(id)?;
        }
        Command::ToggleAccepting(id) => {
            editor.toggle_accepting(id)?;
        }
        Command::RelabelNode { node, label } => {
            editor.update_node_label(node, label.as_str())?;
        }
        Command::AddEdge {
            from,
            to,
            label,
            style,
        } => {
            let id = editor.add_edge(from, to)?;
            if let Some(label) = label {
                editor.update_edge_label(&id, label.as_str())?;
            }
            if !style.is_empty() {
                editor.update_edge_style(&id, *style)?;
            }
        }
    }
    Ok(())
}

fn parse_diagram(pair: Pair<Rule>) -> ParseResult<DiagramScript> {
    let line = pair.line_col().0;
    let mut inner = pair.into_inner();
    let name = expect(&mut inner, line, "automaton name")?.as_str().to_string();

    let mut statements = Vec::new();
    for item in inner {
        statements.push(parse_statement(item)?);
    }

    Ok(DiagramScript { name, statements })
}

fn parse_statement(pair: Pair<Rule>) -> ParseResult<Statement> {
    let line = pair.line_col().0;
    let rule = pair.as_rule();
    let mut inner = pair.into_inner();

    let command = match rule {
        Rule::first_node => Command::FirstNode,
        Rule::add_node => {
            let direction = keyword(expect(&mut inner, line, "direction")?, line)?;
            let from = identifier(&mut inner, line)?;
            Command::AddNode { direction, from }
        }
        Rule::place_node => {
            let x = integer(expect(&mut inner, line, "x coordinate")?, line)?;
            let y = integer(expect(&mut inner, line, "y coordinate")?, line)?;
            Command::PlaceNode { x, y }
        }
        Rule::remove_node => Command::RemoveNode(identifier(&mut inner, line)?),
        Rule::toggle_start => Command::ToggleStart(identifier(&mut inner, line)?),
        Rule::toggle_accepting => Command::ToggleAccepting(identifier(&mut inner, line)?),
        Rule::relabel => {
            let node = identifier(&mut inner, line)?;
            let label = text(expect(&mut inner, line, "label text")?);
            Command::RelabelNode { node, label }
        }
        Rule::edge_def => parse_edge(inner, line)?,
        other => {
            return Err(ParseError::SyntaxError {
                line,
                message: format!("unexpected {:?}", other),
            })
        }
    };

    Ok(Statement { line, command })
}

fn parse_edge(mut inner: Pairs<Rule>, line: usize) -> ParseResult<Command> {
    let from = identifier(&mut inner, line)?;
    let to = identifier(&mut inner, line)?;
    let mut label = None;
    let mut style = EdgeStylePatch::default();

    for item in inner {
        match item.as_rule() {
            Rule::quoted | Rule::bare_text => label = Some(text(item)),
            Rule::edge_options => {
                for option in item.into_inner() {
                    parse_edge_option(option, line, &mut style)?;
                }
            }
            _ => {}
        }
    }

    Ok(Command::AddEdge {
        from,
        to,
        label,
        style,
    })
}

fn parse_edge_option(pair: Pair<Rule>, line: usize, style: &mut EdgeStylePatch) -> ParseResult<()> {
    match pair.as_rule() {
        Rule::loop_option => {
            let mut inner = pair.into_inner();
            style.loop_position = Some(keyword::<Side>(expect(&mut inner, line, "loop side")?, line)?);
        }
        Rule::bend_option => {
            let mut inner = pair.into_inner();
            style.bend = Some(keyword::<Bend>(expect(&mut inner, line, "bend side")?, line)?);
            if let Some(amount) = inner.next() {
                let amount = integer(amount, line)?.clamp(0, i32::from(MAX_BEND_AMOUNT));
                style.bend_amount = u8::try_from(amount).ok();
            }
        }
        Rule::side => style.label_position = Some(keyword(pair, line)?),
        _ => {}
    }
    Ok(())
}

fn expect<'i>(inner: &mut Pairs<'i, Rule>, line: usize, what: &str) -> ParseResult<Pair<'i, Rule>> {
    inner.next().ok_or_else(|| ParseError::SyntaxError {
        line,
        message: format!("missing {}", what),
    })
}

fn identifier(inner: &mut Pairs<Rule>, line: usize) -> ParseResult<String> {
    Ok(expect(inner, line, "node id")?.as_str().to_string())
}

fn integer(pair: Pair<Rule>, line: usize) -> ParseResult<i32> {
    pair.as_str().parse().map_err(|_| ParseError::SyntaxError {
        line,
        message: format!("'{}' is not a valid integer", pair.as_str()),
    })
}

fn keyword<T>(pair: Pair<Rule>, line: usize) -> ParseResult<T>
where
    T: FromStr<Err = UnknownKeyword>,
{
    pair.as_str()
        .parse()
        .map_err(|e: UnknownKeyword| ParseError::SyntaxError {
            line,
            message: e.to_string(),
        })
}

/// Text of a `quoted` or `bare_text` pair, without the quotes
fn text(pair: Pair<Rule>) -> String {
    match pair.as_rule() {
        Rule::quoted => pair
            .into_inner()
            .next()
            .map(|body| body.as_str().to_string())
            .unwrap_or_default(),
        _ => pair.as_str().to_string(),
    }
}
