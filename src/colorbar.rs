use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colormap {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Colormap {
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickPosition {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerPosition {
    Left,
    #[default]
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorbarProperties {
    pub colormaps: Option<Vec<Colormap>>,
    pub tick_position: TickPosition,
    pub width: f32,
    pub container_position: ContainerPosition,
    pub initial_colormap: Option<String>,
}

impl ColorbarProperties {
    pub fn configured_colormaps(&self) -> Option<&[Colormap]> {
        self.colormaps.as_deref()
    }

    pub fn options(&self) -> ColorbarOptions {
        ColorbarOptions {
            colormaps: self.colormaps.clone().unwrap_or_default(),
            ticks_position: self.tick_position,
            width: self.width,
            position: self.container_position,
            active_colormap_name: self.initial_colormap.clone(),
        }
    }
}

impl Default for ColorbarProperties {
    fn default() -> Self {
        Self {
            colormaps: Some(default_colormaps()),
            tick_position: TickPosition::default(),
            width: 16.0,
            container_position: ContainerPosition::default(),
            initial_colormap: Some("Grayscale".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorbarOptions {
    pub colormaps: Vec<Colormap>,
    pub ticks_position: TickPosition,
    pub width: f32,
    pub position: ContainerPosition,
    pub active_colormap_name: Option<String>,
}

impl ColorbarOptions {
    pub fn with_active_colormap(mut self, name: impl Into<String>) -> Self {
        self.active_colormap_name = Some(name.into());
        self
    }

    /// Falls back to the first configured colormap when no name was requested.
    pub fn resolve_active_colormap(&self) -> Result<&Colormap, ColorbarError> {
        let Some(first) = self.colormaps.first() else {
            return Err(ColorbarError::NoColormaps);
        };
        match self.active_colormap_name.as_deref() {
            Some(name) => self
                .colormaps
                .iter()
                .find(|colormap| colormap.name == name)
                .ok_or_else(|| ColorbarError::UnknownColormap(name.to_string())),
            None => Ok(first),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorbarError {
    #[error("No colormaps configured")]
    NoColormaps,

    #[error("Colormap {0} is not configured")]
    UnknownColormap(String),

    #[error("No window/level capable display sets")]
    NoDisplaySets,
}

pub fn default_colormaps() -> Vec<Colormap> {
    [
        ("Grayscale", "Grayscale"),
        ("X Ray", "X Ray"),
        ("HSV", "HSV"),
        ("hot_iron", "Hot Iron"),
        ("red_hot", "Red Hot"),
        ("s_pet", "S PET"),
        ("perfusion", "Perfusion"),
        ("rainbow_2", "Rainbow"),
        ("suv", "SUV"),
        ("ge_256", "GE 256"),
        ("ge", "GE"),
        ("siemens", "Siemens"),
    ]
    .into_iter()
    .map(|(name, description)| Colormap {
        name: name.to_string(),
        description: Some(description.to_string()),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_missing_colormap_list_counts_as_unconfigured() {
        let properties = ColorbarProperties {
            colormaps: Some(Vec::new()),
            ..ColorbarProperties::default()
        };
        assert_eq!(properties.configured_colormaps().map(|colormaps| colormaps.len()), Some(0));

        let properties = ColorbarProperties {
            colormaps: None,
            ..ColorbarProperties::default()
        };
        assert!(properties.configured_colormaps().is_none());
    }

    #[test]
    fn active_colormap_defaults_to_first() {
        let options = ColorbarOptions {
            active_colormap_name: None,
            ..ColorbarProperties::default().options()
        };
        let active = options
            .resolve_active_colormap()
            .expect("first colormap should resolve");
        assert_eq!(active.name, "Grayscale");
    }

    #[test]
    fn unknown_active_colormap_is_an_error() {
        let options = ColorbarProperties::default()
            .options()
            .with_active_colormap("nope");
        assert_eq!(
            options.resolve_active_colormap(),
            Err(ColorbarError::UnknownColormap("nope".to_string()))
        );
    }

    #[test]
    fn resolving_without_colormaps_fails() {
        let properties = ColorbarProperties {
            colormaps: None,
            ..ColorbarProperties::default()
        };
        assert_eq!(
            properties.options().resolve_active_colormap(),
            Err(ColorbarError::NoColormaps)
        );
    }
}
