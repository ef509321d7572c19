use crate::classifier::is_3d_volume;
use crate::layout::{icon_style, IconStyle, MenuLayout};
use crate::menu::{select_sections, MenuSection, ViewportContext};
use crate::services::{ColorbarService, GridState, ViewportService};
use crate::sync::ColorbarSync;

/// Section list for one remount epoch. Widget state keyed by an older epoch
/// must be discarded by the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuContent {
    pub epoch: u64,
    pub is_3d_volume: bool,
    pub sections: Vec<MenuSection>,
}

#[derive(Debug, Clone, PartialEq)]
struct StructuralInputs {
    context: ViewportContext,
    grid: GridState,
    generation: Option<u64>,
}

#[derive(Debug, Default)]
pub struct WindowLevelMenu {
    content: MenuContent,
    last_inputs: Option<StructuralInputs>,
    layout: MenuLayout,
    colorbar_sync: ColorbarSync,
}

impl WindowLevelMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &MenuContent {
        &self.content
    }

    pub fn remount_epoch(&self) -> u64 {
        self.content.epoch
    }

    pub fn is_3d_volume(&self) -> bool {
        self.content.is_3d_volume
    }

    pub fn layout(&self) -> &MenuLayout {
        &self.layout
    }

    /// Reconciles the menu with the host's current inputs. Returns `true` when
    /// the epoch was bumped and the section list rebuilt.
    pub fn update(
        &mut self,
        context: &ViewportContext,
        grid: &GridState,
        element_height: Option<f32>,
        viewports: &dyn ViewportService,
        colorbars: &dyn ColorbarService,
    ) -> bool {
        self.layout.observe_element_height(element_height);

        let instance = viewports.viewport(&context.viewport_id);
        self.colorbar_sync.observe(
            &context.viewport_id,
            &context.display_sets,
            &context.colorbar,
            instance,
            colorbars,
        );

        let generation = instance.map(|instance| instance.generation);
        let unchanged = self.last_inputs.as_ref().is_some_and(|last| {
            last.generation == generation && &last.grid == grid && &last.context == context
        });
        if unchanged {
            return false;
        }

        let is_3d = is_3d_volume(viewports, &context.viewport_id);
        self.content = MenuContent {
            epoch: self.content.epoch + 1,
            is_3d_volume: is_3d,
            sections: select_sections(context, is_3d),
        };
        self.last_inputs = Some(StructuralInputs {
            context: context.clone(),
            grid: grid.clone(),
            generation,
        });
        log::debug!(
            "Menu for {} remounted at epoch {} ({})",
            context.viewport_id,
            self.content.epoch,
            if is_3d { "3D volume" } else { "2D" }
        );
        true
    }

    /// Runs colorbar resyncs queued during the previous frame.
    pub fn run_deferred(&mut self, colorbars: &mut dyn ColorbarService) -> usize {
        self.colorbar_sync.run_pending(colorbars)
    }

    pub fn has_deferred_work(&self) -> bool {
        self.colorbar_sync.has_pending()
    }

    pub fn on_visibility_change(&mut self, open: bool, element_height: Option<f32>) -> bool {
        self.layout.on_visibility_change(open, element_height)
    }

    pub fn max_menu_height(&self) -> Option<f32> {
        self.layout.max_menu_height()
    }

    pub fn icon_style(&self, grid: &GridState, viewports: &dyn ViewportService) -> Option<IconStyle> {
        let inputs = self.last_inputs.as_ref()?;
        let id = &inputs.context.viewport_id;
        Some(icon_style(id, grid, viewports.viewport_info(id)))
    }
}
