use crate::services::{GridState, ViewportId, ViewportInfo};

pub const MENU_CHROME_ALLOWANCE: f32 = 32.0;
pub const MENU_MIN_WIDTH: f32 = 218.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconVisibility {
    Always,
    OnHover,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconStyle {
    pub visibility: IconVisibility,
    pub light_background: bool,
}

impl IconStyle {
    pub fn is_visible(&self, pane_hovered: bool) -> bool {
        match self.visibility {
            IconVisibility::Always => true,
            IconVisibility::OnHover => pane_hovered,
        }
    }
}

#[derive(Debug, Default)]
pub struct MenuLayout {
    height_hint: Option<f32>,
    open: bool,
}

impl MenuLayout {
    pub fn height_hint(&self) -> Option<f32> {
        self.height_hint
    }

    pub fn observe_element_height(&mut self, height: Option<f32>) -> bool {
        if self.height_hint == height {
            return false;
        }
        self.height_hint = height;
        true
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Records the popup state. On a toggle the container height is re-read,
    /// since it may have resized while the menu was closed.
    pub fn on_visibility_change(&mut self, open: bool, height: Option<f32>) -> bool {
        if self.open == open {
            return false;
        }
        self.open = open;
        self.height_hint = height;
        true
    }

    pub fn max_menu_height(&self) -> Option<f32> {
        self.height_hint.map(available_menu_height)
    }

    /// Uses `container_height` when no hint has been observed yet.
    pub fn max_menu_height_or(&self, container_height: f32) -> f32 {
        available_menu_height(self.height_hint.unwrap_or(container_height))
    }
}

fn available_menu_height(height: f32) -> f32 {
    (height - MENU_CHROME_ALLOWANCE).max(0.0)
}

pub fn icon_style(
    viewport_id: &ViewportId,
    grid: &GridState,
    info: Option<ViewportInfo>,
) -> IconStyle {
    let visibility = if grid.is_active(viewport_id) {
        IconVisibility::Always
    } else {
        IconVisibility::OnHover
    };
    let light_background = info
        .and_then(|info| info.background)
        .map(|background| background == [1.0, 1.0, 1.0])
        .unwrap_or(false);

    IconStyle {
        visibility,
        light_background,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_height_subtracts_chrome() {
        let mut layout = MenuLayout::default();
        assert_eq!(layout.max_menu_height(), None);

        assert!(layout.observe_element_height(Some(500.0)));
        assert_eq!(layout.max_menu_height(), Some(468.0));

        assert!(!layout.observe_element_height(Some(500.0)));
        assert_eq!(layout.height_hint(), Some(500.0));
    }

    #[test]
    fn visibility_change_rereads_height() {
        let mut layout = MenuLayout::default();
        layout.observe_element_height(Some(500.0));

        assert!(layout.on_visibility_change(true, Some(300.0)));
        assert!(layout.is_open());
        assert_eq!(layout.max_menu_height(), Some(268.0));

        assert!(!layout.on_visibility_change(true, Some(200.0)));
        assert_eq!(layout.max_menu_height(), Some(268.0));

        assert!(layout.on_visibility_change(false, Some(640.0)));
        assert_eq!(layout.max_menu_height(), Some(608.0));
    }

    #[test]
    fn tiny_container_never_yields_negative_height() {
        let mut layout = MenuLayout::default();
        layout.observe_element_height(Some(10.0));
        assert_eq!(layout.max_menu_height(), Some(0.0));
    }

    #[test]
    fn fallback_height_still_subtracts_chrome() {
        let mut layout = MenuLayout::default();
        assert_eq!(layout.max_menu_height_or(400.0), 368.0);
        assert_eq!(layout.max_menu_height_or(20.0), 0.0);

        layout.observe_element_height(Some(300.0));
        assert_eq!(layout.max_menu_height_or(400.0), 268.0);
    }

    #[test]
    fn active_viewport_icon_is_always_visible() {
        let active = ViewportId::new("vp-1");
        let other = ViewportId::new("vp-2");
        let grid = GridState {
            active_viewport_id: Some(active.clone()),
            revision: 3,
        };

        let style = icon_style(&active, &grid, None);
        assert_eq!(style.visibility, IconVisibility::Always);
        assert!(style.is_visible(false));

        let style = icon_style(&other, &grid, None);
        assert_eq!(style.visibility, IconVisibility::OnHover);
        assert!(!style.is_visible(false));
        assert!(style.is_visible(true));
    }

    #[test]
    fn white_background_is_light() {
        let id = ViewportId::new("vp-1");
        let grid = GridState::default();
        let white = ViewportInfo {
            background: Some([1.0, 1.0, 1.0]),
        };
        let black = ViewportInfo {
            background: Some([0.0, 0.0, 0.0]),
        };

        assert!(icon_style(&id, &grid, Some(white)).light_background);
        assert!(!icon_style(&id, &grid, Some(black)).light_background);
        assert!(!icon_style(&id, &grid, None).light_background);
    }
}
