use std::path::PathBuf;

use eframe::egui::{self, Color32, Rect, Sense, Stroke};

use crate::colorbar::ContainerPosition;
use crate::config::MenuConfig;
use crate::controller::WindowLevelMenu;
use crate::display_set::{load_display_set, window_level_display_sets, DisplaySet};
use crate::menu::ViewportContext;
use crate::presets::WindowLevelPreset;
use crate::services::{
    ColorbarOverlays, ColorbarService, GridState, ViewportId, ViewportKind, ViewportRegistry,
    ViewportService,
};
use crate::ui::{show_window_level_menu, MenuAction, MenuView};

const APP_TITLE: &str = "Window/Level Menu Viewer";
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const GRID_GAP: f32 = 2.0;
const DEFAULT_VOLUME_QUALITY: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridLayout {
    Single,
    Quad,
}

struct ViewportPane {
    id: ViewportId,
    display_sets: Vec<DisplaySet>,
    menu: WindowLevelMenu,
    window_level: Option<WindowLevelPreset>,
    colormap: Option<String>,
    volume_preset: Option<String>,
    volume_quality: f32,
}

impl ViewportPane {
    fn new(id: &str, display_sets: Vec<DisplaySet>) -> Self {
        Self {
            id: ViewportId::new(id),
            display_sets,
            menu: WindowLevelMenu::new(),
            window_level: None,
            colormap: None,
            volume_preset: None,
            volume_quality: DEFAULT_VOLUME_QUALITY,
        }
    }

    fn context(&self, config: &MenuConfig) -> ViewportContext {
        ViewportContext {
            viewport_id: self.id.clone(),
            display_sets: self.display_sets.clone(),
            colorbar: config.colorbar.clone(),
            presets: config.window_level_presets.clone(),
            volume_rendering_presets: config.volume_rendering_presets.clone(),
            volume_rendering_quality_range: config.volume_rendering_quality_range,
        }
    }
}

pub struct MenuViewerApp {
    config: MenuConfig,
    viewports: ViewportRegistry,
    colorbars: ColorbarOverlays,
    grid: GridState,
    layout: GridLayout,
    panes: Vec<ViewportPane>,
    status_line: String,
    pending_open_paths: Option<Vec<PathBuf>>,
    pending_open_armed: bool,
}

impl Default for MenuViewerApp {
    fn default() -> Self {
        Self::new(MenuConfig::default(), None)
    }
}

impl MenuViewerApp {
    pub fn new(config: MenuConfig, initial_status: Option<String>) -> Self {
        let panes = vec![
            ViewportPane::new(
                "default",
                vec![DisplaySet::new("1.2.840.1", "CT").with_description("Chest")],
            ),
            ViewportPane::new(
                "fusion",
                vec![
                    DisplaySet::new("1.2.840.2", "PT").with_description("WB PET"),
                    DisplaySet::new("1.2.840.3", "CT").with_description("WB CT"),
                ],
            ),
            ViewportPane::new(
                "segmentation",
                vec![
                    DisplaySet::new("1.2.840.4", "CT").with_description("Abdomen"),
                    DisplaySet::new("1.2.840.5", "SEG").with_description("Liver"),
                ],
            ),
            ViewportPane::new(
                "volume3d",
                vec![DisplaySet::new("1.2.840.6", "CT").with_description("Angio")],
            ),
        ];

        let mut viewports = ViewportRegistry::default();
        let kinds = [
            (ViewportKind::Stack, None),
            (ViewportKind::Orthographic, None),
            (ViewportKind::Stack, Some([1.0, 1.0, 1.0])),
            (ViewportKind::Volume3D, None),
        ];
        for (pane, (kind, background)) in panes.iter().zip(kinds) {
            viewports.create(pane.id.clone(), kind, background);
        }

        let grid = GridState {
            active_viewport_id: panes.first().map(|pane| pane.id.clone()),
            revision: 0,
        };

        Self {
            config,
            viewports,
            colorbars: ColorbarOverlays::default(),
            grid,
            layout: GridLayout::Quad,
            panes,
            status_line: initial_status.unwrap_or_default(),
            pending_open_paths: None,
            pending_open_armed: false,
        }
    }

    fn apply_black_background(ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        let line_base = Color32::from_gray(28);

        visuals.panel_fill = Color32::BLACK;
        visuals.window_fill = Color32::from_gray(12);
        visuals.extreme_bg_color = Color32::BLACK;
        visuals.window_stroke = Stroke::new(1.0, line_base);
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, line_base);
        ctx.set_visuals(visuals);
    }

    fn active_index(&self) -> Option<usize> {
        let active = self.grid.active_viewport_id.as_ref()?;
        self.panes.iter().position(|pane| &pane.id == active)
    }

    fn set_active_index(&mut self, index: usize) {
        let Some(pane) = self.panes.get(index) else {
            return;
        };
        if self.grid.is_active(&pane.id) {
            return;
        }
        self.grid.active_viewport_id = Some(pane.id.clone());
    }

    fn cycle_active_viewport(&mut self, direction: i32) {
        if self.panes.is_empty() {
            return;
        }
        let len = self.panes.len() as i32;
        let current = self.active_index().unwrap_or(0) as i32;
        let next = (current + direction).rem_euclid(len) as usize;
        self.set_active_index(next);
    }

    fn toggle_layout(&mut self) {
        self.layout = match self.layout {
            GridLayout::Single => GridLayout::Quad,
            GridLayout::Quad => GridLayout::Single,
        };
        self.grid.revision += 1;
    }

    /// Recreates the active viewport, switching between a stack and a 3D volume.
    fn toggle_active_volume(&mut self) {
        let Some(index) = self.active_index() else {
            return;
        };
        let id = self.panes[index].id.clone();
        let current = self.viewports.viewport(&id);
        let background = self
            .viewports
            .viewport_info(&id)
            .and_then(|info| info.background);
        let kind = match current.map(|instance| instance.kind) {
            Some(ViewportKind::Volume3D) => ViewportKind::Stack,
            _ => ViewportKind::Volume3D,
        };
        self.viewports.create(id.clone(), kind, background);
        self.status_line = format!("Viewport {id} is now {}.", kind.label());
    }

    fn open_dicoms(&mut self, ctx: &egui::Context) {
        let picked = rfd::FileDialog::new()
            .add_filter("DICOM", &["dcm"])
            .pick_files();

        if let Some(paths) = picked {
            self.queue_open_paths(paths);
            ctx.set_cursor_icon(egui::CursorIcon::Progress);
            ctx.request_repaint();
        }
    }

    fn queue_open_paths(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        self.pending_open_paths = Some(paths);
        self.pending_open_armed = false;
        self.status_line = "Loading selected DICOM(s)...".to_string();
    }

    fn process_pending_open(&mut self, ctx: &egui::Context) {
        if self.pending_open_paths.is_none() {
            return;
        }

        if !self.pending_open_armed {
            self.pending_open_armed = true;
            ctx.request_repaint();
            return;
        }

        self.pending_open_armed = false;
        let Some(paths) = self.pending_open_paths.take() else {
            return;
        };
        self.load_into_active_viewport(&paths);
    }

    fn load_into_active_viewport(&mut self, paths: &[PathBuf]) {
        let Some(index) = self.active_index() else {
            self.status_line = "Select a viewport first.".to_string();
            return;
        };

        match load_display_set(paths) {
            Ok(display_set) => {
                let pane = &mut self.panes[index];
                self.status_line = format!("Loaded {} into {}.", display_set.label(), pane.id);
                pane.display_sets = vec![display_set];
                pane.window_level = None;
            }
            Err(err) => {
                log::warn!("DICOM import failed: {err:#}");
                self.status_line = format!("Could not load DICOM(s): {err:#}");
            }
        }
    }

    fn apply_menu_action(&mut self, index: usize, action: MenuAction) {
        let Some(pane) = self.panes.get_mut(index) else {
            return;
        };

        match action {
            MenuAction::ToggleColorbar(true) => {
                let mut options = self.config.colorbar.options();
                if let Some(name) = pane.colormap.as_deref() {
                    options = options.with_active_colormap(name);
                }
                let display_sets = window_level_display_sets(&pane.display_sets);
                if let Err(err) =
                    self.colorbars
                        .set_viewport_colorbar(&pane.id, &display_sets, &options)
                {
                    log::warn!("Could not show colorbar for {}: {err}", pane.id);
                    self.status_line = format!("Colorbar unavailable: {err}");
                }
            }
            MenuAction::ToggleColorbar(false) => self.colorbars.remove_colorbar(&pane.id),
            MenuAction::SelectColormap(name) => {
                if self.colorbars.has_colorbar(&pane.id) {
                    let options = self.config.colorbar.options().with_active_colormap(&name);
                    let display_sets = window_level_display_sets(&pane.display_sets);
                    self.colorbars.remove_colorbar(&pane.id);
                    if let Err(err) =
                        self.colorbars
                            .set_viewport_colorbar(&pane.id, &display_sets, &options)
                    {
                        log::warn!("Could not update colorbar for {}: {err}", pane.id);
                    }
                }
                pane.colormap = Some(name);
            }
            MenuAction::ApplyWindowLevel(preset) => {
                self.status_line = format!(
                    "{}: {} (W {} / L {})",
                    pane.id, preset.description, preset.window, preset.level
                );
                pane.window_level = Some(preset);
            }
            MenuAction::ApplyVolumePreset(name) => {
                self.status_line = format!("{}: rendering preset {name}", pane.id);
                pane.volume_preset = Some(name);
            }
            MenuAction::SetVolumeQuality(quality) => pane.volume_quality = quality,
        }
    }

    fn pane_rects(&self, area: Rect) -> Vec<(usize, Rect)> {
        match self.layout {
            GridLayout::Single => self
                .active_index()
                .map(|index| vec![(index, area)])
                .unwrap_or_default(),
            GridLayout::Quad => {
                let cell = egui::vec2(
                    ((area.width() - GRID_GAP).max(2.0)) / 2.0,
                    ((area.height() - GRID_GAP).max(2.0)) / 2.0,
                );
                (0..self.panes.len().min(4))
                    .map(|index| {
                        let (row, col) = (index / 2, index % 2);
                        let min = area.min
                            + egui::vec2(
                                col as f32 * (cell.x + GRID_GAP),
                                row as f32 * (cell.y + GRID_GAP),
                            );
                        (index, Rect::from_min_size(min, cell))
                    })
                    .collect()
            }
        }
    }

    fn show_grid(&mut self, ui: &mut egui::Ui) {
        let rects = self.pane_rects(ui.max_rect());
        let mut clicked_index = None;
        let mut actions = Vec::new();

        for (index, rect) in rects {
            let response = ui.allocate_rect(rect, Sense::click());
            if response.clicked() {
                clicked_index = Some(index);
            }

            self.paint_pane(ui, index, rect);
            let pane = &mut self.panes[index];

            let context = pane.context(&self.config);
            pane.menu.update(
                &context,
                &self.grid,
                Some(rect.height()),
                &self.viewports,
                &self.colorbars,
            );
            let Some(style) = pane.menu.icon_style(&self.grid, &self.viewports) else {
                continue;
            };
            let view = MenuView {
                viewport_id: &pane.id,
                colorbar_enabled: self.colorbars.has_colorbar(&pane.id),
                active_colormap: pane.colormap.as_deref(),
                active_volume_preset: pane.volume_preset.as_deref(),
                volume_quality: pane.volume_quality,
            };
            let pane_actions = show_window_level_menu(ui, &mut pane.menu, rect, style, &view);
            actions.extend(pane_actions.into_iter().map(|action| (index, action)));
        }

        if let Some(index) = clicked_index {
            self.set_active_index(index);
        }
        for (index, action) in actions {
            self.apply_menu_action(index, action);
        }
    }

    fn paint_pane(&self, ui: &egui::Ui, index: usize, rect: Rect) {
        let pane = &self.panes[index];
        let painter = ui.painter().with_clip_rect(rect);
        let background = self
            .viewports
            .viewport_info(&pane.id)
            .and_then(|info| info.background)
            .map(|[r, g, b]| {
                Color32::from_rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
            })
            .unwrap_or(Color32::BLACK);
        let text_color = if background == Color32::WHITE {
            Color32::from_gray(30)
        } else {
            Color32::from_gray(200)
        };
        let stroke_color = if self.grid.is_active(&pane.id) {
            Color32::from_rgb(90, 140, 220)
        } else {
            Color32::from_gray(28)
        };

        painter.rect_filled(rect, 0.0, background);
        painter.rect_stroke(rect.shrink(0.5), 0.0, Stroke::new(1.0, stroke_color));

        let kind = self
            .viewports
            .viewport(&pane.id)
            .map(|instance| instance.kind.label())
            .unwrap_or("-");
        let mut lines = vec![format!("{} [{kind}]", pane.id)];
        lines.extend(pane.display_sets.iter().map(DisplaySet::label));
        if let Some(preset) = pane.window_level.as_ref() {
            lines.push(format!("W {} / L {}", preset.window, preset.level));
        }
        if let Some(colormap) = pane.colormap.as_deref() {
            lines.push(format!("LUT {colormap}"));
        }
        if let Some(preset) = pane.volume_preset.as_deref() {
            lines.push(format!("VR {preset} (quality {})", pane.volume_quality));
        }
        painter.text(
            rect.left_top() + egui::vec2(8.0, 8.0),
            egui::Align2::LEFT_TOP,
            lines.join("\n"),
            egui::FontId::monospace(12.0),
            text_color,
        );

        if let Some(overlay) = self.colorbars.overlay(&pane.id) {
            let inset = 36.0;
            let bar = match overlay.position {
                ContainerPosition::Left => Rect::from_min_size(
                    rect.left_top() + egui::vec2(8.0, inset),
                    egui::vec2(overlay.width, rect.height() - inset * 2.0),
                ),
                ContainerPosition::Right => Rect::from_min_size(
                    egui::pos2(rect.right() - 8.0 - overlay.width, rect.top() + inset),
                    egui::vec2(overlay.width, rect.height() - inset * 2.0),
                ),
                ContainerPosition::Top => Rect::from_min_size(
                    rect.left_top() + egui::vec2(inset, 8.0),
                    egui::vec2(rect.width() - inset * 2.0, overlay.width),
                ),
                ContainerPosition::Bottom => Rect::from_min_size(
                    egui::pos2(rect.left() + inset, rect.bottom() - 8.0 - overlay.width),
                    egui::vec2(rect.width() - inset * 2.0, overlay.width),
                ),
            };
            painter.rect_filled(bar, 2.0, Color32::from_gray(90));
            painter.rect_stroke(bar, 2.0, Stroke::new(1.0, text_color));
            painter.text(
                bar.center_bottom() + egui::vec2(0.0, 12.0),
                egui::Align2::CENTER_CENTER,
                &overlay.active_colormap,
                egui::FontId::proportional(11.0),
                text_color,
            );
        }
    }
}

impl eframe::App for MenuViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        Self::apply_black_background(ctx);
        self.process_pending_open(ctx);

        // Colorbar resyncs queued by the previous frame run before anything reads them.
        for pane in &mut self.panes {
            pane.menu.run_deferred(&mut self.colorbars);
        }

        let mut cycle_direction = None;
        let mut toggle_volume = false;
        let mut toggle_layout = false;
        ctx.input_mut(|input| {
            if input.consume_key(egui::Modifiers::SHIFT, egui::Key::Tab) {
                cycle_direction = Some(-1);
            } else if input.consume_key(egui::Modifiers::NONE, egui::Key::Tab) {
                cycle_direction = Some(1);
            }
            toggle_volume = input.consume_key(egui::Modifiers::NONE, egui::Key::V);
            toggle_layout = input.consume_key(egui::Modifiers::NONE, egui::Key::L);
        });
        if let Some(direction) = cycle_direction {
            self.cycle_active_viewport(direction);
        }
        if toggle_volume {
            self.toggle_active_volume();
        }
        if toggle_layout {
            self.toggle_layout();
        }

        let mut open_dicoms_clicked = false;
        egui::TopBottomPanel::top("menubar")
            .show_separator_line(false)
            .show(ctx, |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.menu_button("File", |ui| {
                        if ui.button("Open DICOM(s)").clicked() {
                            open_dicoms_clicked = true;
                            ui.close_menu();
                        }
                    });
                    ui.menu_button("Viewport", |ui| {
                        if ui.button("Toggle 3D volume (V)").clicked() {
                            self.toggle_active_volume();
                            ui.close_menu();
                        }
                        if ui.button("Toggle 1x1 / 2x2 (L)").clicked() {
                            self.toggle_layout();
                            ui.close_menu();
                        }
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.weak(format!("{APP_TITLE} v{APP_VERSION}"));
                    });
                });
            });

        if open_dicoms_clicked {
            self.open_dicoms(ctx);
        }

        egui::TopBottomPanel::bottom("status")
            .show_separator_line(false)
            .show(ctx, |ui| {
                ui.label(self.status_line.as_str());
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| self.show_grid(ui));

        if self.panes.iter().any(|pane| pane.menu.has_deferred_work()) {
            ctx.request_repaint();
        }
    }
}
