use crate::services::{ViewportId, ViewportService};

/// Unregistered viewports classify as not 3D.
pub fn is_3d_volume(viewports: &dyn ViewportService, id: &ViewportId) -> bool {
    viewports
        .viewport(id)
        .map(|instance| instance.is_3d_volume())
        .unwrap_or(false)
}
