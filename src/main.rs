//! Tikzomaton GUI - Automaton Editor
//! Grid editor for finite automata with a live TikZ export panel

use eframe::egui;

use tikzomaton::canvas::{edge_geometry, start_marker, EdgeGeometry, EdgePath};
use tikzomaton::grid::{grid_to_pixel, node_at, GridBounds, GridPos, PixelPos, GRID_SIZE, NODE_RADIUS};
use tikzomaton::parser::parse_diagrams;
use tikzomaton::{
    check_export, Bend, Direction, EdgeStylePatch, EditError, EditorState, Node, Side, GRID_STEP,
    MAX_BEND_AMOUNT,
};

/// Bundled scripts for the Examples menu
const EXAMPLES: &[(&str, &str)] = &[
    ("Even number of zeros", include_str!("../demos/even_zeros.atm")),
    ("Ends with \"ab\"", include_str!("../demos/ends_with_ab.atm")),
    ("Corner", include_str!("../demos/l_shape.atm")),
    ("Islands", include_str!("../demos/islands.atm")),
];

const PAPER: egui::Color32 = egui::Color32::from_rgb(252, 252, 248);
const INK: egui::Color32 = egui::Color32::from_rgb(30, 30, 30);
const GRID_MINOR: egui::Color32 = egui::Color32::from_rgb(236, 236, 230);
const GRID_MAJOR: egui::Color32 = egui::Color32::from_rgb(214, 214, 206);
const HIGHLIGHT: egui::Color32 = egui::Color32::from_rgb(40, 110, 220);
const SELECTED_FILL: egui::Color32 = egui::Color32::from_rgb(214, 230, 255);
const PENDING_FILL: egui::Color32 = egui::Color32::from_rgb(255, 236, 190);

/// How close a click must land to an edge label to select the edge
const LABEL_HIT_RADIUS: f32 = 12.0;

fn tikzomaton_icon() -> egui::IconData {
    // 64x64 accepting state: paper disc with a double ink ring
    let size: u32 = 64;
    let mut rgba = vec![0u8; (size * size * 4) as usize];
    let c = (size as f32 - 1.0) * 0.5;

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - c;
            let dy = y as f32 - c;
            let d = (dx * dx + dy * dy).sqrt();

            let pixel = if (27.0..=30.5).contains(&d) || (20.5..=23.0).contains(&d) {
                [30, 30, 30, 255]
            } else if d < 27.0 {
                [252, 252, 248, 255]
            } else {
                [0, 0, 0, 0]
            };

            let idx = ((y * size + x) * 4) as usize;
            rgba[idx..idx + 4].copy_from_slice(&pixel);
        }
    }

    egui::IconData {
        rgba,
        width: size,
        height: size,
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_title("Tikzomaton - Automaton Editor")
            .with_icon(tikzomaton_icon()),
        ..Default::default()
    };

    eframe::run_native(
        "Tikzomaton",
        options,
        Box::new(|cc| Ok(Box::new(TikzomatonApp::new(cc)))),
    )
}

/// Entries of the node context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeAction {
    Add(Direction),
    ToggleStart,
    ToggleAccepting,
    Rename,
    StartEdge,
    Delete,
}

/// What a click on the canvas landed on
#[derive(Debug, Clone, PartialEq)]
enum CanvasClick {
    Node { id: String, pointer: egui::Pos2 },
    EdgeLabel(String),
    Empty,
}

/// Maps canvas pixels to screen points
#[derive(Debug, Clone, Copy)]
struct CanvasTransform {
    origin: egui::Pos2,
    zoom: f32,
}

impl CanvasTransform {
    fn to_screen(self, p: PixelPos) -> egui::Pos2 {
        self.origin + egui::vec2(p.x, p.y) * self.zoom
    }

    fn to_canvas(self, p: egui::Pos2) -> PixelPos {
        let v = (p - self.origin) / self.zoom;
        PixelPos::new(v.x, v.y)
    }
}

struct TikzomatonApp {
    /// Script editor content
    script: String,
    /// Name of the diagram on the canvas
    diagram_name: String,
    editor: EditorState,
    /// TikZ code for the current editor state
    tikz_code: String,
    /// Export warnings for the current editor state
    warnings: Vec<String>,
    /// Last parse or edit error
    error_message: Option<String>,
    selected_node: Option<String>,
    selected_edge: Option<String>,
    /// Screen position of the open node menu
    context_menu: Option<egui::Pos2>,
    /// Source node of an edge waiting for its target click
    pending_edge_from: Option<String>,
    node_label_input: String,
    edge_label_input: String,
    focus_node_label: bool,
    show_script_panel: bool,
    zoom: f32,
}

impl TikzomatonApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            script: String::new(),
            diagram_name: "Untitled".to_string(),
            editor: EditorState::new(),
            tikz_code: String::new(),
            warnings: Vec::new(),
            error_message: None,
            selected_node: None,
            selected_edge: None,
            context_menu: None,
            pending_edge_from: None,
            node_label_input: String::new(),
            edge_label_input: String::new(),
            focus_node_label: false,
            show_script_panel: true,
            zoom: 1.0,
        };
        if let Some((_, source)) = EXAMPLES.first() {
            app.load_script(source.to_string());
        } else {
            app.refresh();
        }
        app
    }

    fn load_script(&mut self, source: String) {
        self.script = source;
        self.apply_script();
    }

    /// Replay the script and put its first diagram on the canvas
    fn apply_script(&mut self) {
        match parse_diagrams(&self.script) {
            Ok(diagrams) => {
                if diagrams.len() > 1 {
                    log::info!("script has {} diagrams, showing the first", diagrams.len());
                }
                match diagrams.into_iter().next() {
                    Some(diagram) => {
                        self.diagram_name = diagram.name;
                        self.editor = diagram.editor;
                        self.error_message = None;
                    }
                    None => {
                        self.error_message = Some("No automaton block found".to_string());
                    }
                }
            }
            Err(e) => {
                log::warn!("script rejected: {}", e);
                self.error_message = Some(e.to_string());
            }
        }
        self.clear_selection();
        self.refresh();
    }

    fn new_diagram(&mut self) {
        self.editor = EditorState::new();
        self.diagram_name = "Untitled".to_string();
        self.error_message = None;
        self.clear_selection();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.tikz_code = self.editor.tikz();
        self.warnings = check_export(self.editor.nodes(), self.editor.edges())
            .err()
            .unwrap_or_default();
    }

    /// Refresh after a successful edit, or surface the error
    fn record<T>(&mut self, result: Result<T, EditError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.error_message = None;
                self.refresh();
                Some(value)
            }
            Err(e) => {
                log::warn!("edit rejected: {}", e);
                self.error_message = Some(e.to_string());
                None
            }
        }
    }

    fn clear_selection(&mut self) {
        self.selected_node = None;
        self.selected_edge = None;
        self.context_menu = None;
        self.pending_edge_from = None;
    }

    fn select_node(&mut self, id: &str) {
        self.selected_edge = None;
        self.selected_node = Some(id.to_string());
        self.node_label_input = self
            .editor
            .node(id)
            .map(|n| n.label.clone())
            .unwrap_or_default();
    }

    fn select_edge(&mut self, id: &str) {
        self.selected_node = None;
        self.selected_edge = Some(id.to_string());
        self.edge_label_input = self
            .editor
            .edge(id)
            .map(|e| e.label.clone())
            .unwrap_or_default();
    }

    fn node_label(&self, id: &str) -> String {
        self.editor
            .node(id)
            .map(|n| n.label.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn open_script(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Automaton script", &["atm", "txt"])
            .pick_file()
        else {
            return;
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => self.load_script(content),
            Err(e) => {
                self.error_message = Some(format!("Could not read {}: {}", path.display(), e));
            }
        }
    }

    fn export_tex(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("LaTeX", &["tex"])
            .set_file_name(format!("{}.tex", self.diagram_name))
            .save_file()
        else {
            return;
        };
        match std::fs::write(&path, &self.tikz_code) {
            Ok(()) => log::info!("exported {}", path.display()),
            Err(e) => {
                self.error_message = Some(format!("Could not write {}: {}", path.display(), e));
            }
        }
    }

    fn handle_canvas_click(&mut self, click: CanvasClick) {
        match click {
            CanvasClick::Node { id, pointer } => {
                if let Some(from) = self.pending_edge_from.take() {
                    let result = self.editor.add_edge(&from, &id);
                    if let Some(edge_id) = self.record(result) {
                        self.select_edge(&edge_id);
                    }
                    return;
                }
                self.select_node(&id);
                self.context_menu = Some(pointer);
            }
            CanvasClick::EdgeLabel(id) => {
                self.context_menu = None;
                self.select_edge(&id);
            }
            CanvasClick::Empty => {
                self.context_menu = None;
                self.selected_node = None;
                self.selected_edge = None;
            }
        }
    }

    fn run_node_action(&mut self, id: &str, action: NodeAction) {
        self.context_menu = None;
        match action {
            NodeAction::Add(direction) => {
                let result = self.editor.add_node(direction, id);
                if let Some(new_id) = self.record(result) {
                    self.select_node(&new_id);
                }
            }
            NodeAction::ToggleStart => {
                let result = self.editor.toggle_start(id);
                self.record(result);
            }
            NodeAction::ToggleAccepting => {
                let result = self.editor.toggle_accepting(id);
                self.record(result);
            }
            NodeAction::Rename => {
                self.select_node(id);
                self.focus_node_label = true;
            }
            NodeAction::StartEdge => {
                self.pending_edge_from = Some(id.to_string());
            }
            NodeAction::Delete => {
                let result = self.editor.remove_node(id);
                if self.record(result).is_some() {
                    self.selected_node = None;
                    if let Some(edge) = &self.selected_edge {
                        if self.editor.edge(edge).is_none() {
                            self.selected_edge = None;
                        }
                    }
                }
            }
        }
    }

    /// Paint the grid, edges and nodes; report what a click hit
    fn draw_canvas(&self, ui: &mut egui::Ui) -> Option<CanvasClick> {
        let nodes = self.editor.nodes();
        let bounds = GridBounds::of(nodes);
        let (width, height) = bounds.pixel_size();
        let (response, painter) =
            ui.allocate_painter(egui::vec2(width, height) * self.zoom, egui::Sense::click());
        let view = CanvasTransform {
            origin: response.rect.min,
            zoom: self.zoom,
        };

        painter.rect_filled(response.rect, 0.0, PAPER);
        draw_grid(&painter, &bounds, view);

        for edge in self.editor.edges() {
            let Some(geometry) = edge_geometry(edge, nodes) else {
                continue;
            };
            let color = if self.selected_edge.as_deref() == Some(edge.id.as_str()) {
                HIGHLIGHT
            } else {
                INK
            };
            draw_edge(&painter, &geometry, &edge.label, view, color);
        }

        for node in nodes {
            let fill = if self.selected_node.as_deref() == Some(node.id.as_str()) {
                SELECTED_FILL
            } else if self.pending_edge_from.as_deref() == Some(node.id.as_str()) {
                PENDING_FILL
            } else {
                egui::Color32::WHITE
            };
            draw_node(&painter, node, grid_to_pixel(GridPos::of(node), nodes), view, fill);
        }

        if !response.clicked() {
            return None;
        }
        let pointer = response.interact_pointer_pos()?;
        let pos = view.to_canvas(pointer);

        if let Some(node) = node_at(pos, nodes) {
            return Some(CanvasClick::Node {
                id: node.id.clone(),
                pointer,
            });
        }

        let hit = self.editor.edges().iter().find(|edge| {
            edge_geometry(edge, nodes).map_or(false, |g| {
                let (dx, dy) = (g.label.x - pos.x, g.label.y - pos.y);
                dx * dx + dy * dy <= LABEL_HIT_RADIUS * LABEL_HIT_RADIUS
            })
        });
        Some(match hit {
            Some(edge) => CanvasClick::EdgeLabel(edge.id.clone()),
            None => CanvasClick::Empty,
        })
    }

    fn node_menu(&self, ctx: &egui::Context, pos: egui::Pos2, id: &str) -> Option<NodeAction> {
        let node = self.editor.node(id)?;
        let mut action = None;

        egui::Area::new(egui::Id::new("node_context_menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(pos)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(160.0);
                    ui.label(egui::RichText::new(&node.label).strong());
                    ui.separator();

                    for direction in Direction::ALL {
                        if ui.button(format!("Add Node {}", direction_caption(direction))).clicked() {
                            action = Some(NodeAction::Add(direction));
                        }
                    }
                    ui.separator();

                    let start = if node.is_start { "Remove Start" } else { "Set as Start" };
                    if ui.button(start).clicked() {
                        action = Some(NodeAction::ToggleStart);
                    }
                    let accepting = if node.is_accepting {
                        "Remove Accepting"
                    } else {
                        "Set as Accepting"
                    };
                    if ui.button(accepting).clicked() {
                        action = Some(NodeAction::ToggleAccepting);
                    }
                    if ui.button("Change Label…").clicked() {
                        action = Some(NodeAction::Rename);
                    }
                    if ui.button("Add Edge…").clicked() {
                        action = Some(NodeAction::StartEdge);
                    }
                    ui.separator();
                    if ui
                        .button(egui::RichText::new("🗑 Delete Node").color(egui::Color32::RED))
                        .clicked()
                    {
                        action = Some(NodeAction::Delete);
                    }
                });
            });

        action
    }

    fn node_editor(&mut self, ui: &mut egui::Ui) {
        let Some(id) = self.selected_node.clone() else {
            return;
        };
        if self.editor.node(&id).is_none() {
            self.selected_node = None;
            return;
        }

        ui.group(|ui| {
            ui.strong(format!("Node {}", id));
            ui.horizontal(|ui| {
                ui.label("Label:");
                let response = ui.text_edit_singleline(&mut self.node_label_input);
                if std::mem::take(&mut self.focus_node_label) {
                    response.request_focus();
                }
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Apply").clicked() || submitted {
                    let result = self
                        .editor
                        .update_node_label(&id, self.node_label_input.as_str());
                    self.record(result);
                }
            });
        });
        ui.add_space(4.0);
    }

    fn edge_editor(&mut self, ui: &mut egui::Ui) {
        let Some(id) = self.selected_edge.clone() else {
            return;
        };
        let Some(edge) = self.editor.edge(&id).cloned() else {
            self.selected_edge = None;
            return;
        };
        let from = self.node_label(&edge.from);
        let to = self.node_label(&edge.to);

        let mut patch = EdgeStylePatch::default();
        let mut delete = false;
        let mut close = false;

        ui.group(|ui| {
            ui.strong(format!("Edge {} → {}", from, to));

            ui.horizontal(|ui| {
                ui.label("Label:");
                let response = ui.text_edit_singleline(&mut self.edge_label_input);
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Apply").clicked() || submitted {
                    let result = self
                        .editor
                        .update_edge_label(&id, self.edge_label_input.as_str());
                    self.record(result);
                }
            });

            if let Some(current) = edge.style.loop_position {
                let mut side = current;
                ui.horizontal(|ui| {
                    ui.label("Loop:");
                    side_combo(ui, "loop_position", &mut side);
                });
                if side != current {
                    patch.loop_position = Some(side);
                }
            } else {
                let mut bend = edge.style.bend;
                ui.horizontal(|ui| {
                    ui.label("Bend:");
                    egui::ComboBox::from_id_salt("edge_bend")
                        .selected_text(bend.as_str())
                        .show_ui(ui, |ui| {
                            for option in Bend::ALL {
                                ui.selectable_value(&mut bend, option, option.as_str());
                            }
                        });
                });
                if bend != edge.style.bend {
                    patch.bend = Some(bend);
                }

                if edge.style.bend != Bend::None {
                    let mut amount = edge.style.effective_bend_amount();
                    let changed = ui
                        .add(egui::Slider::new(&mut amount, 0..=MAX_BEND_AMOUNT).text("amount"))
                        .changed();
                    if changed {
                        patch.bend_amount = Some(amount);
                    }
                }

                let mut side = edge.style.label_position;
                ui.horizontal(|ui| {
                    ui.label("Label position:");
                    side_combo(ui, "label_position", &mut side);
                });
                if side != edge.style.label_position {
                    patch.label_position = Some(side);
                }
            }

            ui.horizontal(|ui| {
                if ui.button("🗑 Delete Edge").clicked() {
                    delete = true;
                }
                if ui.button("Done").clicked() {
                    close = true;
                }
            });
        });
        ui.add_space(4.0);

        if !patch.is_empty() {
            let result = self.editor.update_edge_style(&id, patch);
            self.record(result);
        }
        if delete {
            let result = self.editor.remove_edge(&id);
            self.record(result);
            self.selected_edge = None;
        } else if close {
            self.selected_edge = None;
        }
    }
}

impl eframe::App for TikzomatonApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.context_menu = None;
            self.pending_edge_from = None;
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("➕ New Diagram").clicked() {
                        self.new_diagram();
                        ui.close_menu();
                    }
                    if ui.button("📂 Open Script...").clicked() {
                        self.open_script();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("📤 Export .tex...").clicked() {
                        self.export_tex();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_script_panel, "Script Panel");
                    if ui.button("Reset Zoom").clicked() {
                        self.zoom = 1.0;
                        ui.close_menu();
                    }
                });

                ui.menu_button("Examples", |ui| {
                    for (name, source) in EXAMPLES {
                        if ui.button(*name).clicked() {
                            self.load_script(source.to_string());
                            ui.close_menu();
                        }
                    }
                });
            });
        });

        // Left panel: script editor
        if self.show_script_panel {
            egui::SidePanel::left("script_panel")
                .default_width(360.0)
                .resizable(true)
                .show(ctx, |ui| {
                    ui.heading("Script");
                    ui.horizontal(|ui| {
                        if ui.button("▶ Apply").clicked() {
                            self.apply_script();
                        }
                        ui.colored_label(egui::Color32::GRAY, "replaces the canvas");
                    });
                    ui.separator();

                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut self.script)
                                .font(egui::TextStyle::Monospace)
                                .code_editor()
                                .desired_width(f32::INFINITY)
                                .desired_rows(30),
                        );
                    });
                });
        }

        // Right panel: TikZ export
        egui::SidePanel::right("tikz_panel")
            .default_width(440.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("TikZ Export");

                if let Some(from) = self.pending_edge_from.clone() {
                    ui.horizontal(|ui| {
                        ui.colored_label(
                            egui::Color32::LIGHT_BLUE,
                            format!("➡ Edge from {}: click the target node", self.node_label(&from)),
                        );
                        if ui.button("Cancel").clicked() {
                            self.pending_edge_from = None;
                        }
                    });
                    ui.separator();
                }

                self.node_editor(ui);
                self.edge_editor(ui);

                for warning in &self.warnings {
                    ui.colored_label(egui::Color32::YELLOW, format!("⚠ {}", warning));
                }

                ui.horizontal(|ui| {
                    if ui.button("📋 Copy").clicked() {
                        ui.output_mut(|o| o.copied_text = self.tikz_code.clone());
                    }
                    if ui.button("💾 Save .tex...").clicked() {
                        self.export_tex();
                    }
                });
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut self.tikz_code.as_str())
                            .font(egui::TextStyle::Monospace)
                            .code_editor()
                            .desired_width(f32::INFINITY)
                            .desired_rows(40),
                    );
                });
            });

        // Main panel: grid canvas
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.diagram_name);

            ui.horizontal_wrapped(|ui| {
                if ui.button("➖").clicked() {
                    self.zoom = (self.zoom - 0.1).max(0.4);
                }
                ui.label(format!("{:.0}%", self.zoom * 100.0));
                if ui.button("➕").clicked() {
                    self.zoom = (self.zoom + 0.1).min(3.0);
                }
                ui.separator();
                ui.label(format!(
                    "Nodes: {} | Edges: {}",
                    self.editor.nodes().len(),
                    self.editor.edges().len()
                ));
                ui.separator();
                ui.colored_label(
                    egui::Color32::GRAY,
                    "Click a node for its menu, click an edge label to style it",
                );
            });

            if let Some(ref error) = self.error_message {
                ui.colored_label(egui::Color32::RED, format!("❌ {}", error));
            }
            ui.separator();

            if self.editor.is_empty() {
                ui.vertical_centered(|ui| {
                    let space = (ui.available_height() / 2.0 - 20.0).max(0.0);
                    ui.add_space(space);
                    let button = egui::Button::new("➕ Add First Node").min_size(egui::vec2(180.0, 36.0));
                    if ui.add(button).clicked() {
                        let result = self.editor.add_first_node();
                        if let Some(id) = self.record(result) {
                            self.select_node(&id);
                        }
                    }
                });
                return;
            }

            let click = egui::ScrollArea::both()
                .show(ui, |ui| self.draw_canvas(ui))
                .inner;
            if let Some(click) = click {
                self.handle_canvas_click(click);
            }
        });

        if let (Some(pos), Some(id)) = (self.context_menu, self.selected_node.clone()) {
            if let Some(action) = self.node_menu(ctx, pos, &id) {
                self.run_node_action(&id, action);
            }
        }
    }
}

fn direction_caption(direction: Direction) -> &'static str {
    match direction {
        Direction::Right => "Right",
        Direction::Left => "Left",
        Direction::Up => "Above",
        Direction::Down => "Below",
    }
}

fn side_combo(ui: &mut egui::Ui, id: &str, side: &mut Side) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(side.as_str())
        .show_ui(ui, |ui| {
            for option in Side::ALL {
                ui.selectable_value(side, option, option.as_str());
            }
        });
}

/// Grid lines for every unit; lanes nodes can sit on are drawn darker
fn draw_grid(painter: &egui::Painter, bounds: &GridBounds, view: CanvasTransform) {
    let (width, height) = bounds.pixel_size();

    for x in bounds.min_x..=bounds.max_x {
        let px = (x - bounds.min_x) as f32 * GRID_SIZE;
        let color = if x.rem_euclid(GRID_STEP) == 0 { GRID_MAJOR } else { GRID_MINOR };
        painter.line_segment(
            [
                view.to_screen(PixelPos::new(px, 0.0)),
                view.to_screen(PixelPos::new(px, height)),
            ],
            egui::Stroke::new(1.0, color),
        );
    }

    for y in bounds.min_y..=bounds.max_y {
        let py = (y - bounds.min_y) as f32 * GRID_SIZE;
        let color = if y.rem_euclid(GRID_STEP) == 0 { GRID_MAJOR } else { GRID_MINOR };
        painter.line_segment(
            [
                view.to_screen(PixelPos::new(0.0, py)),
                view.to_screen(PixelPos::new(width, py)),
            ],
            egui::Stroke::new(1.0, color),
        );
    }
}

fn draw_edge(
    painter: &egui::Painter,
    geometry: &EdgeGeometry,
    label: &str,
    view: CanvasTransform,
    color: egui::Color32,
) {
    let stroke = egui::Stroke::new(1.5 * view.zoom, color);

    match geometry.path {
        EdgePath::Straight { start, end } => {
            painter.line_segment([view.to_screen(start), view.to_screen(end)], stroke);
        }
        EdgePath::Curved { start, control, end } => {
            painter.add(egui::epaint::QuadraticBezierShape::from_points_stroke(
                [view.to_screen(start), view.to_screen(control), view.to_screen(end)],
                false,
                egui::Color32::TRANSPARENT,
                stroke,
            ));
        }
        EdgePath::Loop {
            start,
            control1,
            control2,
            end,
        } => {
            painter.add(egui::epaint::CubicBezierShape::from_points_stroke(
                [
                    view.to_screen(start),
                    view.to_screen(control1),
                    view.to_screen(control2),
                    view.to_screen(end),
                ],
                false,
                egui::Color32::TRANSPARENT,
                stroke,
            ));
        }
    }

    let (prev, tip) = geometry.path.arrow_tip();
    draw_arrowhead(painter, view.to_screen(prev), view.to_screen(tip), view.zoom, color);

    painter.text(
        view.to_screen(geometry.label),
        egui::Align2::CENTER_CENTER,
        label,
        egui::FontId::proportional(14.0 * view.zoom),
        color,
    );
}

fn draw_node(
    painter: &egui::Painter,
    node: &Node,
    center: PixelPos,
    view: CanvasTransform,
    fill: egui::Color32,
) {
    let c = view.to_screen(center);
    let radius = NODE_RADIUS * view.zoom;

    painter.circle(c, radius, fill, egui::Stroke::new(1.5 * view.zoom, INK));
    if node.is_accepting {
        painter.circle_stroke(c, radius - 4.0 * view.zoom, egui::Stroke::new(1.2 * view.zoom, INK));
    }
    if node.is_start {
        let (tail, head) = start_marker(center);
        let (tail, head) = (view.to_screen(tail), view.to_screen(head));
        painter.line_segment([tail, head], egui::Stroke::new(1.5 * view.zoom, INK));
        draw_arrowhead(painter, tail, head, view.zoom, INK);
    }

    painter.text(
        c,
        egui::Align2::CENTER_CENTER,
        &node.label,
        egui::FontId::proportional(14.0 * view.zoom),
        INK,
    );
}

fn draw_arrowhead(
    painter: &egui::Painter,
    prev: egui::Pos2,
    tip: egui::Pos2,
    zoom: f32,
    color: egui::Color32,
) {
    let delta = tip - prev;
    if delta.length() < f32::EPSILON {
        return;
    }
    let dir = delta.normalized();

    let arrow_size = 9.0 * zoom;
    let arrow_angle = 0.45;

    let perp = egui::vec2(-dir.y, dir.x);
    let p1 = tip - dir * arrow_size + perp * arrow_size * arrow_angle;
    let p2 = tip - dir * arrow_size - perp * arrow_size * arrow_angle;

    painter.add(egui::Shape::convex_polygon(
        vec![tip, p1, p2],
        color,
        egui::Stroke::NONE,
    ));
}
