use crate::colorbar::{ColorbarProperties, Colormap};
use crate::display_set::{window_level_display_sets, DisplaySet};
use crate::presets::{ModalityPresets, ViewportPreset, VolumeRenderingQualityRange};
use crate::services::ViewportId;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportContext {
    pub viewport_id: ViewportId,
    pub display_sets: Vec<DisplaySet>,
    pub colorbar: ColorbarProperties,
    pub presets: Vec<ModalityPresets>,
    pub volume_rendering_presets: Option<Vec<ViewportPreset>>,
    pub volume_rendering_quality_range: Option<VolumeRenderingQualityRange>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuSection {
    Colorbar {
        display_sets: Vec<DisplaySet>,
    },
    ColorLut {
        colormaps: Vec<Colormap>,
        display_sets: Vec<DisplaySet>,
    },
    WindowLevelPresets {
        presets: Vec<ModalityPresets>,
    },
    VolumeRenderingPresets {
        presets: Vec<ViewportPreset>,
    },
    VolumeRenderingOptions {
        quality_range: VolumeRenderingQualityRange,
    },
}

impl MenuSection {
    pub fn key(&self) -> &'static str {
        match self {
            MenuSection::Colorbar { .. } => "colorbar",
            MenuSection::ColorLut { .. } => "colorLUTPresets",
            MenuSection::WindowLevelPresets { .. } => "windowLevelPresets",
            MenuSection::VolumeRenderingPresets { .. } => "volumeRenderingPresets",
            MenuSection::VolumeRenderingOptions { .. } => "volumeRenderingOptions",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuSection::Colorbar { .. } => "Display Color bar",
            MenuSection::ColorLut { .. } => "Color LUT",
            MenuSection::WindowLevelPresets { .. } => "Modality Window Presets",
            MenuSection::VolumeRenderingPresets { .. } => "Rendering Presets",
            MenuSection::VolumeRenderingOptions { .. } => "Rendering Options",
        }
    }
}

/// Sections whose data is missing are left out rather than disabled.
pub fn select_sections(context: &ViewportContext, is_3d_volume: bool) -> Vec<MenuSection> {
    let mut sections = Vec::new();

    if is_3d_volume {
        if let Some(presets) = context.volume_rendering_presets.as_ref() {
            sections.push(MenuSection::VolumeRenderingPresets {
                presets: presets.clone(),
            });
        }
        if let Some(quality_range) = context.volume_rendering_quality_range {
            sections.push(MenuSection::VolumeRenderingOptions { quality_range });
        }
        return sections;
    }

    let display_sets = window_level_display_sets(&context.display_sets);
    sections.push(MenuSection::Colorbar {
        display_sets: display_sets.clone(),
    });
    if let Some(colormaps) = context.colorbar.configured_colormaps() {
        sections.push(MenuSection::ColorLut {
            colormaps: colormaps.to_vec(),
            display_sets,
        });
    }

    if !context.presets.is_empty() {
        sections.push(MenuSection::WindowLevelPresets {
            presets: context.presets.clone(),
        });
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::WindowLevelPreset;

    fn context(display_sets: Vec<DisplaySet>) -> ViewportContext {
        ViewportContext {
            viewport_id: ViewportId::new("vp-1"),
            display_sets,
            colorbar: ColorbarProperties::default(),
            presets: vec![ModalityPresets {
                modality: "CT".to_string(),
                presets: vec![
                    WindowLevelPreset::new("A", 400.0, 40.0),
                    WindowLevelPreset::new("B", 1500.0, -600.0),
                ],
            }],
            volume_rendering_presets: None,
            volume_rendering_quality_range: None,
        }
    }

    fn keys(sections: &[MenuSection]) -> Vec<&'static str> {
        sections.iter().map(MenuSection::key).collect()
    }

    #[test]
    fn ct_stack_shows_2d_sections() {
        let context = context(vec![DisplaySet::new("ct", "CT")]);
        let sections = select_sections(&context, false);
        assert_eq!(
            keys(&sections),
            vec!["colorbar", "colorLUTPresets", "windowLevelPresets"]
        );
    }

    #[test]
    fn volume_with_presets_only_shows_vr_presets() {
        let mut context = context(vec![DisplaySet::new("ct", "CT")]);
        context.volume_rendering_presets = Some(vec![ViewportPreset::named("CT-Bone")]);

        let sections = select_sections(&context, true);
        assert_eq!(keys(&sections), vec!["volumeRenderingPresets"]);
    }

    #[test]
    fn volume_never_shows_2d_sections() {
        let mut context = context(vec![DisplaySet::new("ct", "CT")]);
        context.volume_rendering_presets = Some(vec![ViewportPreset::named("CT-Bone")]);
        context.volume_rendering_quality_range = Some(VolumeRenderingQualityRange::default());

        let sections = select_sections(&context, true);
        assert_eq!(
            keys(&sections),
            vec!["volumeRenderingPresets", "volumeRenderingOptions"]
        );

        context.volume_rendering_presets = None;
        context.volume_rendering_quality_range = None;
        assert!(select_sections(&context, true).is_empty());
    }

    #[test]
    fn segmentation_gets_empty_filtered_display_sets() {
        let context = context(vec![DisplaySet::new("seg", "SEG")]);
        let sections = select_sections(&context, false);

        assert_eq!(
            keys(&sections),
            vec!["colorbar", "colorLUTPresets", "windowLevelPresets"]
        );
        match &sections[0] {
            MenuSection::Colorbar { display_sets } => assert!(display_sets.is_empty()),
            other => panic!("unexpected section {other:?}"),
        }
        match &sections[1] {
            MenuSection::ColorLut { display_sets, .. } => assert!(display_sets.is_empty()),
            other => panic!("unexpected section {other:?}"),
        }
    }

    #[test]
    fn missing_configuration_omits_sections() {
        let mut context = context(vec![DisplaySet::new("ct", "CT")]);
        context.presets.clear();
        context.colorbar.colormaps = None;

        let sections = select_sections(&context, false);
        assert_eq!(keys(&sections), vec!["colorbar"]);
    }

    #[test]
    fn empty_colormap_list_still_shows_color_lut() {
        let mut context = context(vec![DisplaySet::new("ct", "CT")]);
        context.colorbar.colormaps = Some(Vec::new());

        let sections = select_sections(&context, false);
        assert_eq!(
            keys(&sections),
            vec!["colorbar", "colorLUTPresets", "windowLevelPresets"]
        );
        match &sections[1] {
            MenuSection::ColorLut { colormaps, .. } => assert!(colormaps.is_empty()),
            other => panic!("unexpected section {other:?}"),
        }
    }

    #[test]
    fn mixed_display_sets_are_filtered_for_colorbar() {
        let context = context(vec![
            DisplaySet::new("pt", "PT"),
            DisplaySet::new("rt", "RTSTRUCT"),
            DisplaySet::new("ct", "CT"),
        ]);
        let sections = select_sections(&context, false);
        for section in &sections {
            let display_sets = match section {
                MenuSection::Colorbar { display_sets } => display_sets,
                MenuSection::ColorLut { display_sets, .. } => display_sets,
                _ => continue,
            };
            let uids = display_sets.iter().map(|ds| ds.uid.as_str()).collect::<Vec<_>>();
            assert_eq!(uids, vec!["pt", "ct"]);
        }
    }
}
