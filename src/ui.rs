use eframe::egui::{self, Color32, Rect, Stroke};

use crate::controller::WindowLevelMenu;
use crate::layout::{IconStyle, MENU_MIN_WIDTH};
use crate::menu::MenuSection;
use crate::presets::WindowLevelPreset;
use crate::services::ViewportId;

const ICON_SIZE: f32 = 22.0;
const ICON_MARGIN: f32 = 6.0;

#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    ToggleColorbar(bool),
    SelectColormap(String),
    ApplyWindowLevel(WindowLevelPreset),
    ApplyVolumePreset(String),
    SetVolumeQuality(f32),
}

pub struct MenuView<'a> {
    pub viewport_id: &'a ViewportId,
    pub colorbar_enabled: bool,
    pub active_colormap: Option<&'a str>,
    pub active_volume_preset: Option<&'a str>,
    pub volume_quality: f32,
}

/// Draws the menu icon in the top-right corner of `pane_rect` and, when open,
/// the popup with the current epoch's sections.
pub fn show_window_level_menu(
    ui: &mut egui::Ui,
    menu: &mut WindowLevelMenu,
    pane_rect: Rect,
    style: IconStyle,
    view: &MenuView<'_>,
) -> Vec<MenuAction> {
    let mut actions = Vec::new();
    let popup_id = egui::Id::new(("wl-menu-popup", view.viewport_id.as_str()));
    let pane_hovered = ui.rect_contains_pointer(pane_rect);
    let open_before = ui.memory(|mem| mem.is_popup_open(popup_id));

    if !open_before && !style.is_visible(pane_hovered) {
        menu.on_visibility_change(false, Some(pane_rect.height()));
        return actions;
    }

    let icon_rect = Rect::from_min_size(
        egui::pos2(
            pane_rect.right() - ICON_SIZE - ICON_MARGIN,
            pane_rect.top() + ICON_MARGIN,
        ),
        egui::vec2(ICON_SIZE, ICON_SIZE),
    );
    let (icon_color, hover_fill) = if style.light_background {
        (Color32::from_gray(40), Color32::from_rgba_unmultiplied(60, 90, 160, 77))
    } else {
        (Color32::from_rgb(90, 140, 220), Color32::from_rgba_unmultiplied(90, 140, 220, 77))
    };

    let response = ui.put(
        icon_rect,
        egui::Button::new(egui::RichText::new("◐").size(14.0).color(icon_color))
            .fill(Color32::TRANSPARENT)
            .stroke(Stroke::NONE),
    );
    if response.hovered() {
        ui.painter().rect_filled(icon_rect, 4.0, hover_fill);
    }
    let response = response.on_hover_text("Window/Level");
    if response.clicked() {
        ui.memory_mut(|mem| mem.toggle_popup(popup_id));
    }

    let open = ui.memory(|mem| mem.is_popup_open(popup_id));
    menu.on_visibility_change(open, Some(pane_rect.height()));

    let max_height = menu.layout().max_menu_height_or(pane_rect.height());
    let content = menu.content();
    egui::popup_below_widget(
        ui,
        popup_id,
        &response,
        egui::PopupCloseBehavior::CloseOnClickOutside,
        |ui| {
            ui.set_min_width(MENU_MIN_WIDTH);
            egui::ScrollArea::vertical()
                .id_salt(("wl-menu-scroll", view.viewport_id.as_str(), content.epoch))
                .max_height(max_height)
                .show(ui, |ui| {
                    // Widget ids are scoped by epoch so a remount starts from scratch.
                    ui.push_id(("wl-menu-epoch", content.epoch), |ui| {
                        if content.sections.is_empty() {
                            ui.weak("No adjustments available");
                        }
                        for section in &content.sections {
                            show_section(ui, section, view, &mut actions);
                        }
                    });
                });
        },
    );

    actions
}

fn show_section(
    ui: &mut egui::Ui,
    section: &MenuSection,
    view: &MenuView<'_>,
    actions: &mut Vec<MenuAction>,
) {
    match section {
        MenuSection::Colorbar { display_sets } => {
            let mut enabled = view.colorbar_enabled;
            let response = ui.add_enabled(
                !display_sets.is_empty() || enabled,
                egui::Checkbox::new(&mut enabled, section.label()),
            );
            if response.changed() {
                actions.push(MenuAction::ToggleColorbar(enabled));
            }
        }
        MenuSection::ColorLut {
            colormaps,
            display_sets,
        } => {
            egui::CollapsingHeader::new(section.label())
                .id_salt(section.key())
                .show(ui, |ui| {
                    ui.add_enabled_ui(!display_sets.is_empty(), |ui| {
                        for colormap in colormaps {
                            let selected = view.active_colormap == Some(colormap.name.as_str());
                            if ui.selectable_label(selected, colormap.label()).clicked() {
                                actions.push(MenuAction::SelectColormap(colormap.name.clone()));
                            }
                        }
                    });
                });
        }
        MenuSection::WindowLevelPresets { presets } => {
            egui::CollapsingHeader::new(section.label())
                .id_salt(section.key())
                .show(ui, |ui| {
                    for group in presets {
                        ui.label(egui::RichText::new(&group.modality).strong());
                        for preset in &group.presets {
                            let text = format!(
                                "{}  {} / {}",
                                preset.description, preset.window, preset.level
                            );
                            if ui.button(text).clicked() {
                                actions.push(MenuAction::ApplyWindowLevel(preset.clone()));
                            }
                        }
                    }
                });
        }
        MenuSection::VolumeRenderingPresets { presets } => {
            egui::CollapsingHeader::new(section.label())
                .id_salt(section.key())
                .show(ui, |ui| {
                    for preset in presets {
                        let selected = view.active_volume_preset == Some(preset.name.as_str());
                        if ui.selectable_label(selected, &preset.name).clicked() {
                            actions.push(MenuAction::ApplyVolumePreset(preset.name.clone()));
                        }
                    }
                });
        }
        MenuSection::VolumeRenderingOptions { quality_range } => {
            egui::CollapsingHeader::new(section.label())
                .id_salt(section.key())
                .show(ui, |ui| {
                    let mut quality = quality_range.clamp(view.volume_quality);
                    let slider = egui::Slider::new(
                        &mut quality,
                        quality_range.min..=quality_range.max,
                    )
                    .step_by(f64::from(quality_range.step))
                    .text("Quality");
                    if ui.add(slider).changed() {
                        actions.push(MenuAction::SetVolumeQuality(quality));
                    }
                });
        }
    }
}
