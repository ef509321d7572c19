use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use dicom_object::{open_file, DefaultDicomObject};

/// Modalities without a meaningful intensity window. Tokens are case-sensitive.
pub const NON_WL_MODALITIES: &[&str] = &["SR", "SEG", "SM", "RTSTRUCT", "RTPLAN", "RTDOSE"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySet {
    pub uid: String,
    pub modality: String,
    pub description: Option<String>,
    pub paths: Vec<PathBuf>,
}

impl DisplaySet {
    pub fn new(uid: impl Into<String>, modality: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            modality: modality.into(),
            description: None,
            paths: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn supports_window_level(&self) -> bool {
        supports_window_level(&self.modality)
    }

    pub fn label(&self) -> String {
        match self.description.as_deref() {
            Some(description) => format!("{} ({description})", self.modality),
            None => self.modality.clone(),
        }
    }
}

pub fn supports_window_level(modality: &str) -> bool {
    !NON_WL_MODALITIES.contains(&modality)
}

pub fn window_level_display_sets(display_sets: &[DisplaySet]) -> Vec<DisplaySet> {
    display_sets
        .iter()
        .filter(|display_set| display_set.supports_window_level())
        .cloned()
        .collect()
}

/// Builds one display set from the files of a single series. Series identity
/// and modality come from the first file; files from another series are rejected.
pub fn load_display_set(paths: &[PathBuf]) -> Result<DisplaySet> {
    let Some(first) = paths.first() else {
        bail!("No DICOM files selected");
    };

    let obj = open_dicom_object(first)?;
    let modality = read_string(&obj, "Modality")
        .with_context(|| format!("{} has no Modality", first.display()))?;
    let uid = read_string(&obj, "SeriesInstanceUID")
        .with_context(|| format!("{} has no SeriesInstanceUID", first.display()))?;
    let description = read_string(&obj, "SeriesDescription");

    for path in &paths[1..] {
        let other = open_dicom_object(path)?;
        let other_uid = read_string(&other, "SeriesInstanceUID").unwrap_or_default();
        if other_uid != uid {
            bail!(
                "{} belongs to series {} (expected {})",
                path.display(),
                if other_uid.is_empty() {
                    "<none>"
                } else {
                    other_uid.as_str()
                },
                uid
            );
        }
    }

    log::info!(
        "Imported {} series {uid} ({} file(s))",
        modality,
        paths.len()
    );

    Ok(DisplaySet {
        uid,
        modality,
        description,
        paths: paths.to_vec(),
    })
}

fn open_dicom_object(path: &Path) -> Result<DefaultDicomObject> {
    open_file(path).with_context(|| format!("Could not open {}", path.display()))
}

fn read_string(obj: &DefaultDicomObject, name: &str) -> Option<String> {
    obj.element_by_name(name)
        .ok()
        .and_then(|el| el.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
