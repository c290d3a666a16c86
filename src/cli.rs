//! Tikzomaton CLI - Command Line Interface for TikZ export

use std::env;
use std::fs;
use std::process::ExitCode;

use serde::Serialize;
use tikzomaton::parser::{parse_diagrams, Diagram};
use tikzomaton::tikz::declaration_order;
use tikzomaton::check_export;

/// Machine-readable result for one diagram (`--json`)
#[derive(Serialize)]
struct DiagramReport<'a> {
    name: &'a str,
    nodes: usize,
    edges: usize,
    /// Node labels in `\node` declaration order
    declaration_order: Vec<&'a str>,
    warnings: Vec<String>,
    tikz: String,
}

impl<'a> DiagramReport<'a> {
    fn new(diagram: &'a Diagram) -> Self {
        let editor = &diagram.editor;
        Self {
            name: &diagram.name,
            nodes: editor.nodes().len(),
            edges: editor.edges().len(),
            declaration_order: declaration_order(editor.nodes())
                .into_iter()
                .map(|n| n.label.as_str())
                .collect(),
            warnings: check_export(editor.nodes(), editor.edges()).err().unwrap_or_default(),
            tikz: editor.tikz(),
        }
    }
}

fn print_usage() {
    println!("Tikzomaton CLI - automaton scripts to TikZ");
    println!("Usage: tikzomaton-cli [--json] [--check] <file.atm>");
    println!();
    println!("  --json    print a JSON report per diagram instead of raw TikZ");
    println!("  --check   also fail when a diagram has export warnings");
    println!();
    println!("Example: tikzomaton-cli demos/even_zeros.atm");
}

fn main() -> ExitCode {
    env_logger::init();

    let mut json = false;
    let mut strict = false;
    let mut filename = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--check" => strict = true,
            "-h" | "--help" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            _ => filename = Some(arg),
        }
    }

    let Some(filename) = filename else {
        print_usage();
        return ExitCode::FAILURE;
    };

    let content = match fs::read_to_string(&filename) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("❌ Could not read file '{}': {}", filename, e);
            return ExitCode::FAILURE;
        }
    };

    let diagrams = match parse_diagrams(&content) {
        Ok(diagrams) => diagrams,
        Err(e) => {
            eprintln!("❌ {}: {}", filename, e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("parsed {} diagram(s) from {}", diagrams.len(), filename);

    let reports: Vec<DiagramReport> = diagrams.iter().map(DiagramReport::new).collect();
    let has_warnings = reports.iter().any(|r| !r.warnings.is_empty());

    if json {
        match serde_json::to_string_pretty(&reports) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ Could not encode report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        for (i, report) in reports.iter().enumerate() {
            if i > 0 {
                println!();
            }
            if reports.len() > 1 {
                println!("% {}", report.name);
            }
            println!("{}", report.tikz);
            for warning in &report.warnings {
                eprintln!("⚠ {}: {}", report.name, warning);
            }
        }
    }

    if strict && has_warnings {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
