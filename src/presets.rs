use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowLevelPreset {
    pub description: String,
    pub window: f32,
    pub level: f32,
}

impl WindowLevelPreset {
    pub fn new(description: impl Into<String>, window: f32, level: f32) -> Self {
        Self {
            description: description.into(),
            window,
            level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalityPresets {
    pub modality: String,
    pub presets: Vec<WindowLevelPreset>,
}

/// A named 3D transfer-function preset. The transfer-function fields are passed
/// through untouched to the rendering engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportPreset {
    pub name: String,
    #[serde(default)]
    pub color_transfer: String,
    #[serde(default)]
    pub scalar_opacity: String,
    #[serde(default)]
    pub gradient_opacity: String,
}

impl ViewportPreset {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color_transfer: String::new(),
            scalar_opacity: String::new(),
            gradient_opacity: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeRenderingQualityRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl VolumeRenderingQualityRange {
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min.min(self.max), self.max.max(self.min))
    }
}

impl Default for VolumeRenderingQualityRange {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 4.0,
            step: 1.0,
        }
    }
}

pub fn default_window_level_presets() -> Vec<ModalityPresets> {
    vec![
        ModalityPresets {
            modality: "CT".to_string(),
            presets: vec![
                WindowLevelPreset::new("Soft tissue", 400.0, 40.0),
                WindowLevelPreset::new("Lung", 1500.0, -600.0),
                WindowLevelPreset::new("Liver", 150.0, 90.0),
                WindowLevelPreset::new("Bone", 2500.0, 480.0),
                WindowLevelPreset::new("Brain", 80.0, 40.0),
            ],
        },
        ModalityPresets {
            modality: "PT".to_string(),
            presets: vec![
                WindowLevelPreset::new("Default", 5.0, 2.5),
                WindowLevelPreset::new("SUV 3", 0.0, 3.0),
                WindowLevelPreset::new("SUV 5", 0.0, 5.0),
                WindowLevelPreset::new("SUV 7", 0.0, 7.0),
                WindowLevelPreset::new("SUV 8", 0.0, 8.0),
                WindowLevelPreset::new("SUV 10", 0.0, 10.0),
                WindowLevelPreset::new("SUV 15", 0.0, 15.0),
            ],
        },
    ]
}

pub fn default_volume_rendering_presets() -> Vec<ViewportPreset> {
    [
        "CT-AAA",
        "CT-Bone",
        "CT-Cardiac",
        "CT-Chest-Contrast-Enhanced",
        "CT-Lung",
        "CT-MIP",
        "CT-Soft-Tissue",
        "MR-Default",
        "MR-MIP",
    ]
    .into_iter()
    .map(ViewportPreset::named)
    .collect()
}
