use std::collections::BTreeMap;
use std::fmt;

use crate::colorbar::{ColorbarError, ColorbarOptions, ContainerPosition, TickPosition};
use crate::display_set::DisplaySet;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewportId(String);

impl ViewportId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewportId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportKind {
    Stack,
    Orthographic,
    Volume3D,
}

impl ViewportKind {
    pub fn label(self) -> &'static str {
        match self {
            ViewportKind::Stack => "Stack",
            ViewportKind::Orthographic => "MPR",
            ViewportKind::Volume3D => "3D",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportInstance {
    pub kind: ViewportKind,
    pub generation: u64,
}

impl ViewportInstance {
    pub fn is_3d_volume(&self) -> bool {
        self.kind == ViewportKind::Volume3D
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportInfo {
    pub background: Option<[f32; 3]>,
}

pub trait ViewportService {
    fn viewport_info(&self, id: &ViewportId) -> Option<ViewportInfo>;
    fn viewport(&self, id: &ViewportId) -> Option<ViewportInstance>;
}

pub trait ColorbarService {
    fn has_colorbar(&self, id: &ViewportId) -> bool;
    fn active_colormap(&self, id: &ViewportId) -> Option<String>;
    fn remove_colorbar(&mut self, id: &ViewportId);
    fn set_viewport_colorbar(
        &mut self,
        id: &ViewportId,
        display_sets: &[DisplaySet],
        options: &ColorbarOptions,
    ) -> Result<(), ColorbarError>;
}

/// Focus state of the surrounding viewport grid. `revision` changes whenever
/// the grid layout changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridState {
    pub active_viewport_id: Option<ViewportId>,
    pub revision: u64,
}

impl GridState {
    pub fn is_active(&self, id: &ViewportId) -> bool {
        self.active_viewport_id.as_ref() == Some(id)
    }
}

struct RegisteredViewport {
    instance: ViewportInstance,
    info: ViewportInfo,
}

#[derive(Default)]
pub struct ViewportRegistry {
    viewports: BTreeMap<ViewportId, RegisteredViewport>,
    next_generation: u64,
}

impl ViewportRegistry {
    pub fn create(
        &mut self,
        id: ViewportId,
        kind: ViewportKind,
        background: Option<[f32; 3]>,
    ) -> ViewportInstance {
        self.next_generation += 1;
        let instance = ViewportInstance {
            kind,
            generation: self.next_generation,
        };
        self.viewports.insert(
            id,
            RegisteredViewport {
                instance,
                info: ViewportInfo { background },
            },
        );
        instance
    }

    pub fn destroy(&mut self, id: &ViewportId) {
        self.viewports.remove(id);
    }
}

impl ViewportService for ViewportRegistry {
    fn viewport_info(&self, id: &ViewportId) -> Option<ViewportInfo> {
        self.viewports.get(id).map(|viewport| viewport.info)
    }

    fn viewport(&self, id: &ViewportId) -> Option<ViewportInstance> {
        self.viewports.get(id).map(|viewport| viewport.instance)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorbarOverlay {
    pub display_set_uids: Vec<String>,
    pub active_colormap: String,
    pub ticks_position: TickPosition,
    pub width: f32,
    pub position: ContainerPosition,
}

/// In-memory colorbar service: one overlay per viewport at most.
#[derive(Default)]
pub struct ColorbarOverlays {
    overlays: BTreeMap<ViewportId, ColorbarOverlay>,
    created: u64,
}

impl ColorbarOverlays {
    pub fn overlay(&self, id: &ViewportId) -> Option<&ColorbarOverlay> {
        self.overlays.get(id)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn created_count(&self) -> u64 {
        self.created
    }
}

impl ColorbarService for ColorbarOverlays {
    fn has_colorbar(&self, id: &ViewportId) -> bool {
        self.overlays.contains_key(id)
    }

    fn active_colormap(&self, id: &ViewportId) -> Option<String> {
        self.overlays
            .get(id)
            .map(|overlay| overlay.active_colormap.clone())
    }

    fn remove_colorbar(&mut self, id: &ViewportId) {
        self.overlays.remove(id);
    }

    fn set_viewport_colorbar(
        &mut self,
        id: &ViewportId,
        display_sets: &[DisplaySet],
        options: &ColorbarOptions,
    ) -> Result<(), ColorbarError> {
        if display_sets.is_empty() {
            return Err(ColorbarError::NoDisplaySets);
        }
        let active = options.resolve_active_colormap()?;

        let overlay = ColorbarOverlay {
            display_set_uids: display_sets.iter().map(|ds| ds.uid.clone()).collect(),
            active_colormap: active.name.clone(),
            ticks_position: options.ticks_position,
            width: options.width,
            position: options.position,
        };
        self.overlays.insert(id.clone(), overlay);
        self.created += 1;
        Ok(())
    }
}
