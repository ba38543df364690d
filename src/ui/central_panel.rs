//! Central panel UI module: handles zoom, pan, drawing the room graph, and turning
//! pointer gestures into editor commands.
//!
//! * primary drag on a node moves it, a primary click toggles its selection
//! * primary drag on empty canvas pans and clears the selection
//! * secondary drag from a node draws a connection, released over another node
//! * secondary click on empty canvas opens the create menu

use std::sync::Arc;
use parking_lot::RwLock;
use eframe::egui::{
    self, Align2, Color32, Context, FontId, Painter, PointerButton, Pos2, Sense, Stroke, Vec2,
};

use crate::catalog::RoomType;
use crate::editor::{CommandType, Editor};
use crate::graph::NodeId;
use crate::utils::{Point2D, Rect, Vector2D};

/// Half-length of the arrow head drawn at the middle of each connection.
const ARROW_SIZE: f32 = 8.0;

/// The `CentralPanel` struct provides the main viewport for the editor.
pub struct CentralPanel {
    editor: Arc<RwLock<Editor>>,

    /// Current zoom factor (scales world→screen).
    zoom: f32,

    /// Current pan offset (in screen coordinates).
    pan: Vec2,

    /// Node held with the primary button, and whether it has moved since.
    held_node: Option<(NodeId, bool)>,
    panning: bool,

    /// World and screen position of the open create menu.
    create_menu: Option<(Point2D, Pos2)>,
}

impl CentralPanel {
    pub fn new(editor: Arc<RwLock<Editor>>) -> Self {
        Self {
            editor,
            zoom: 1.0,
            pan: Vec2::new(0.0, 0.0),
            held_node: None,
            panning: false,
            create_menu: None,
        }
    }

    /// Called each frame to update the central panel.
    pub fn update(&mut self, ctx: &Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::from_gray(24)))
            .show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                let response = ui.interact(rect, ui.id(), Sense::click_and_drag());
                self.handle_zoom(ui, &response);

                let painter = ui.painter_at(rect);
                self.draw_grid(&painter, rect);
                self.draw_graph(&painter);

                self.handle_pointer(ui, rect);
            });

        self.show_create_menu(ctx);
    }

    // ============================================================
    // Zoom and Pan Handling
    // ============================================================

    fn handle_zoom(&mut self, ui: &egui::Ui, response: &egui::Response) {
        if response.hovered() && ui.input(|i| i.scroll_delta.y).abs() > 0.0 {
            let zoom_sensitivity = 0.001;
            let factor = 1.0 + ui.input(|i| i.scroll_delta.y) * zoom_sensitivity;
            let new_zoom = (self.zoom * factor).clamp(0.2, 5.0);

            if let Some(pointer) = ui.input(|i| i.pointer.hover_pos()) {
                // Keep the mouse pointer stable in world coordinates.
                let world_before = self.screen_to_world(pointer);
                self.zoom = new_zoom;
                self.pan = pointer.to_vec2() - Vec2::new(world_before.x, world_before.y) * self.zoom;
            } else {
                self.zoom = new_zoom;
            }
            ui.ctx().request_repaint();
        }
    }

    // ============================================================
    // Pointer Gestures
    // ============================================================

    fn handle_pointer(&mut self, ui: &egui::Ui, rect: egui::Rect) {
        let (hover, delta, primary_pressed, primary_down, primary_released) = ui.input(|input| {
            (
                input.pointer.hover_pos(),
                input.pointer.delta(),
                input.pointer.button_pressed(PointerButton::Primary),
                input.pointer.button_down(PointerButton::Primary),
                input.pointer.button_released(PointerButton::Primary),
            )
        });
        let (secondary_pressed, secondary_down, secondary_released) = ui.input(|input| {
            (
                input.pointer.button_pressed(PointerButton::Secondary),
                input.pointer.button_down(PointerButton::Secondary),
                input.pointer.button_released(PointerButton::Secondary),
            )
        });

        let inside = hover.map_or(false, |pos| rect.contains(pos));
        let world = hover.map(|pos| self.screen_to_world(pos));
        let hit = world.and_then(|pos| self.editor.read().node_at(pos));
        let world_delta = Vector2D::new(delta.x / self.zoom, delta.y / self.zoom);
        let moved = delta != Vec2::ZERO;

        // --- Primary button: select, move, pan ---
        if primary_pressed && inside {
            self.create_menu = None;
            match hit.clone() {
                Some(id) => self.held_node = Some((id, false)),
                None => {
                    self.panning = true;
                    self.editor.write().execute_command(CommandType::BatchCommand {
                        commands: vec![CommandType::CancelConnection, CommandType::ClearSelection],
                    });
                }
            }
        }
        if primary_down && moved {
            if let Some((id, has_moved)) = &mut self.held_node {
                self.editor.write().execute_command(CommandType::MoveNode {
                    node: id.clone(),
                    delta: world_delta,
                });
                *has_moved = true;
            } else if self.panning {
                self.pan += delta;
            }
        }
        if primary_released {
            if let Some((id, has_moved)) = self.held_node.take() {
                let mut editor = self.editor.write();
                if !has_moved {
                    editor.execute_command(CommandType::ToggleSelected { node: id });
                }
                editor.execute_command(CommandType::EndDrag);
            }
            self.panning = false;
        }

        // --- Secondary button: connect, create menu ---
        if secondary_pressed && inside {
            self.create_menu = None;
            if let (Some(from), Some(cursor)) = (hit.clone(), world) {
                self.editor
                    .write()
                    .execute_command(CommandType::BeginConnection { from, cursor });
            }
        }
        let dragging_connection = self.editor.read().graph().pending_connection().is_some();
        if secondary_down && moved && dragging_connection {
            self.editor
                .write()
                .execute_command(CommandType::DragConnection { delta: world_delta });
        }
        if secondary_released {
            let from = self
                .editor
                .read()
                .graph()
                .pending_connection()
                .map(|pending| pending.from.clone());
            match from {
                Some(from) => {
                    // Releasing over the source itself just drops the line.
                    let target = hit.filter(|id| *id != from);
                    self.editor
                        .write()
                        .execute_command(CommandType::FinishConnection { target });
                }
                None => {
                    if let (true, None, Some(pos), Some(screen)) = (inside, &hit, world, hover) {
                        self.create_menu = Some((pos, screen));
                    }
                }
            }
        }
    }

    fn show_create_menu(&mut self, ctx: &Context) {
        let Some((position, screen)) = self.create_menu else {
            return;
        };
        let mut close = false;
        egui::Area::new("create_menu")
            .order(egui::Order::Foreground)
            .fixed_pos(screen)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    let mut editor = self.editor.write();
                    if ui.button("Create Room Node").clicked() {
                        editor.execute_command(CommandType::CreateNode {
                            position,
                            created: Vec::new(),
                        });
                        close = true;
                    }
                    ui.separator();
                    if ui.button("Select All Room Nodes").clicked() {
                        editor.execute_command(CommandType::SelectAll);
                        close = true;
                    }
                    if ui.button("Delete Selected Room Node Links").clicked() {
                        editor.execute_command(CommandType::DeleteSelectedLinks);
                        close = true;
                    }
                    if ui.button("Delete Selected Room Nodes").clicked() {
                        editor.execute_command(CommandType::DeleteSelectedNodes);
                        close = true;
                    }
                });
            });
        if close {
            self.create_menu = None;
        }
    }

    // ============================================================
    // Coordinate Conversion
    // ============================================================

    fn world_to_screen(&self, world: Point2D) -> Pos2 {
        Pos2::new(world.x * self.zoom + self.pan.x, world.y * self.zoom + self.pan.y)
    }

    fn screen_to_world(&self, screen: Pos2) -> Point2D {
        Point2D::new((screen.x - self.pan.x) / self.zoom, (screen.y - self.pan.y) / self.zoom)
    }

    fn rect_to_screen(&self, rect: &Rect) -> egui::Rect {
        egui::Rect::from_min_max(self.world_to_screen(rect.min), self.world_to_screen(rect.max()))
    }

    // ============================================================
    // Drawing Functions
    // ============================================================

    fn draw_graph(&self, painter: &Painter) {
        let editor = self.editor.read();
        let graph = editor.graph();

        // Connections first so the boxes sit on top of them.
        for node in graph.nodes() {
            for child in node.children() {
                if let Some(child) = graph.get_node(child) {
                    self.draw_connection(painter, node.rect.center(), child.rect.center());
                }
            }
        }

        if let Some(pending) = graph.pending_connection() {
            if let Some(from) = graph.get_node(&pending.from) {
                painter.line_segment(
                    [self.world_to_screen(from.rect.center()), self.world_to_screen(pending.cursor)],
                    Stroke::new(2.0, Color32::YELLOW),
                );
            }
        }

        for node in graph.nodes() {
            let room_type = graph.room_type_of(node.id());
            let screen_rect = self.rect_to_screen(&node.rect);
            painter.rect_filled(screen_rect, 6.0, node_fill(room_type));
            let outline = if node.selected {
                Stroke::new(3.0, Color32::YELLOW)
            } else {
                Stroke::new(1.0, Color32::from_gray(160))
            };
            painter.rect_stroke(screen_rect, 6.0, outline);

            let label = room_type.map_or(node.room_type(), |t| t.name.as_str());
            painter.text(
                screen_rect.center(),
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(14.0 * self.zoom),
                Color32::WHITE,
            );
        }
    }

    /// Draws a parent→child line with an arrow head at its midpoint.
    fn draw_connection(&self, painter: &Painter, from: Point2D, to: Point2D) {
        let stroke = Stroke::new(2.0, Color32::WHITE);
        painter.line_segment([self.world_to_screen(from), self.world_to_screen(to)], stroke);

        let direction = from.to(&to).normalize();
        if direction.length() == 0.0 {
            return;
        }
        let mid = from.midpoint(&to);
        let tip = self.world_to_screen(mid.offset(direction.scale(ARROW_SIZE)));
        let back = mid.offset(direction.scale(-ARROW_SIZE));
        let side = direction.perp().scale(ARROW_SIZE);
        let left = self.world_to_screen(back.offset(side));
        let right = self.world_to_screen(back.offset(side.scale(-1.0)));
        painter.line_segment([tip, left], stroke);
        painter.line_segment([tip, right], stroke);
    }

    /// Draws a grid in world space.
    fn draw_grid(&self, painter: &Painter, rect: egui::Rect) {
        let grid_spacing_world = 50.0;
        let stroke = Stroke::new(1.0, Color32::from_gray(40));

        let world_min = self.screen_to_world(rect.min);
        let world_max = self.screen_to_world(rect.max);

        let mut x = (world_min.x / grid_spacing_world).floor() * grid_spacing_world;
        while x <= world_max.x {
            let p1 = self.world_to_screen(Point2D::new(x, world_min.y));
            let p2 = self.world_to_screen(Point2D::new(x, world_max.y));
            painter.line_segment([p1, p2], stroke);
            x += grid_spacing_world;
        }
        let mut y = (world_min.y / grid_spacing_world).floor() * grid_spacing_world;
        while y <= world_max.y {
            let p1 = self.world_to_screen(Point2D::new(world_min.x, y));
            let p2 = self.world_to_screen(Point2D::new(world_max.x, y));
            painter.line_segment([p1, p2], stroke);
            y += grid_spacing_world;
        }
    }
}

fn node_fill(room_type: Option<&RoomType>) -> Color32 {
    match room_type {
        Some(t) if t.is_plain_room() => Color32::from_rgb(21, 101, 192),
        Some(t) if t.is_entrance => Color32::from_rgb(46, 125, 50),
        Some(t) if t.is_boss_room => Color32::from_rgb(183, 28, 28),
        Some(t) if t.is_corridor => Color32::from_gray(90),
        // Unassigned placeholder.
        Some(_) => Color32::from_gray(55),
        // Type missing from the catalog.
        None => Color32::from_rgb(120, 60, 140),
    }
}
