use std::collections::BTreeMap;

use crate::colorbar::{ColorbarOptions, ColorbarProperties};
use crate::display_set::{window_level_display_sets, DisplaySet};
use crate::services::{ColorbarService, ViewportId, ViewportInstance};

#[derive(Debug, Clone, PartialEq, Eq)]
struct SyncKey {
    viewport_id: ViewportId,
    display_sets: Vec<(String, String)>,
    generation: Option<u64>,
}

impl SyncKey {
    fn new(
        viewport_id: &ViewportId,
        display_sets: &[DisplaySet],
        instance: Option<ViewportInstance>,
    ) -> Self {
        Self {
            viewport_id: viewport_id.clone(),
            display_sets: display_sets
                .iter()
                .map(|ds| (ds.uid.clone(), ds.modality.clone()))
                .collect(),
            generation: instance.map(|instance| instance.generation),
        }
    }
}

#[derive(Debug, Clone)]
struct PendingResync {
    display_sets: Vec<DisplaySet>,
    options: ColorbarOptions,
}

#[derive(Debug, Default)]
pub struct ColorbarSync {
    last_key: Option<SyncKey>,
    pending: BTreeMap<ViewportId, PendingResync>,
}

impl ColorbarSync {
    /// Records the current inputs and queues a resync when they changed and
    /// the viewport currently shows a colorbar. Returns whether work was queued.
    pub fn observe(
        &mut self,
        viewport_id: &ViewportId,
        display_sets: &[DisplaySet],
        properties: &ColorbarProperties,
        instance: Option<ViewportInstance>,
        colorbars: &dyn ColorbarService,
    ) -> bool {
        let key = SyncKey::new(viewport_id, display_sets, instance);
        if self.last_key.as_ref() == Some(&key) {
            return false;
        }
        self.last_key = Some(key);

        if !colorbars.has_colorbar(viewport_id) {
            return false;
        }

        let replaced = self
            .pending
            .insert(
                viewport_id.clone(),
                PendingResync {
                    display_sets: window_level_display_sets(display_sets),
                    options: properties.options(),
                },
            )
            .is_some();
        log::debug!(
            "Colorbar resync queued for {viewport_id}{}",
            if replaced { " (coalesced)" } else { "" }
        );
        true
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Applies all queued resyncs, keeping each overlay's active colormap.
    /// Returns the number of overlays rebuilt.
    pub fn run_pending(&mut self, colorbars: &mut dyn ColorbarService) -> usize {
        let mut rebuilt = 0;
        for (viewport_id, resync) in std::mem::take(&mut self.pending) {
            // Turned off since it was queued.
            if !colorbars.has_colorbar(&viewport_id) {
                continue;
            }

            let mut options = resync.options;
            if let Some(name) = colorbars.active_colormap(&viewport_id) {
                if options.colormaps.iter().any(|colormap| colormap.name == name) {
                    options = options.with_active_colormap(name);
                }
            }

            colorbars.remove_colorbar(&viewport_id);
            match colorbars.set_viewport_colorbar(&viewport_id, &resync.display_sets, &options) {
                Ok(()) => rebuilt += 1,
                Err(err) => log::warn!("Could not recreate colorbar for {viewport_id}: {err}"),
            }
        }
        rebuilt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ColorbarOverlays, ViewportKind};

    fn instance(generation: u64) -> Option<ViewportInstance> {
        Some(ViewportInstance {
            kind: ViewportKind::Stack,
            generation,
        })
    }

    fn overlays_with_colorbar(id: &ViewportId, display_sets: &[DisplaySet]) -> ColorbarOverlays {
        let mut overlays = ColorbarOverlays::default();
        overlays
            .set_viewport_colorbar(
                id,
                display_sets,
                &ColorbarProperties::default().options(),
            )
            .expect("initial overlay should be created");
        overlays
    }

    #[test]
    fn without_colorbar_nothing_is_queued() {
        let id = ViewportId::new("vp-1");
        let mut overlays = ColorbarOverlays::default();
        let mut sync = ColorbarSync::default();

        let queued = sync.observe(
            &id,
            &[DisplaySet::new("ct", "CT")],
            &ColorbarProperties::default(),
            instance(1),
            &overlays,
        );

        assert!(!queued);
        assert!(!sync.has_pending());
        assert_eq!(sync.run_pending(&mut overlays), 0);
        assert!(overlays.is_empty());
    }

    #[test]
    fn resync_is_deferred_until_run() {
        let id = ViewportId::new("vp-1");
        let mut overlays = overlays_with_colorbar(&id, &[DisplaySet::new("ct", "CT")]);
        let mut sync = ColorbarSync::default();
        let properties = ColorbarProperties::default();

        sync.observe(&id, &[DisplaySet::new("ct", "CT")], &properties, instance(1), &overlays);
        sync.run_pending(&mut overlays);

        let next = [DisplaySet::new("pt", "PT")];
        assert!(sync.observe(&id, &next, &properties, instance(1), &overlays));
        let before = overlays.overlay(&id).expect("overlay").display_set_uids.clone();
        assert_eq!(before, vec!["ct".to_string()]);

        assert_eq!(sync.run_pending(&mut overlays), 1);
        let after = overlays.overlay(&id).expect("overlay").display_set_uids.clone();
        assert_eq!(after, vec!["pt".to_string()]);
    }

    #[test]
    fn unchanged_inputs_do_not_requeue() {
        let id = ViewportId::new("vp-1");
        let display_sets = [DisplaySet::new("ct", "CT")];
        let mut overlays = overlays_with_colorbar(&id, &display_sets);
        let mut sync = ColorbarSync::default();
        let properties = ColorbarProperties::default();

        assert!(sync.observe(&id, &display_sets, &properties, instance(1), &overlays));
        sync.run_pending(&mut overlays);
        assert!(!sync.observe(&id, &display_sets, &properties, instance(1), &overlays));
    }

    #[test]
    fn bursts_coalesce_into_one_overlay_for_final_state() {
        let id = ViewportId::new("vp-1");
        let mut overlays = overlays_with_colorbar(&id, &[DisplaySet::new("ct", "CT")]);
        let mut sync = ColorbarSync::default();
        let properties = ColorbarProperties::default();
        let created_before = overlays.created_count();

        sync.observe(&id, &[DisplaySet::new("a", "CT")], &properties, instance(1), &overlays);
        sync.observe(&id, &[DisplaySet::new("b", "MR")], &properties, instance(1), &overlays);

        assert_eq!(sync.run_pending(&mut overlays), 1);
        assert_eq!(overlays.created_count(), created_before + 1);
        assert_eq!(overlays.len(), 1);
        let overlay = overlays.overlay(&id).expect("overlay");
        assert_eq!(overlay.display_set_uids, vec!["b".to_string()]);
    }

    #[test]
    fn new_viewport_instance_triggers_resync() {
        let id = ViewportId::new("vp-1");
        let display_sets = [DisplaySet::new("ct", "CT")];
        let mut overlays = overlays_with_colorbar(&id, &display_sets);
        let mut sync = ColorbarSync::default();
        let properties = ColorbarProperties::default();

        sync.observe(&id, &display_sets, &properties, instance(1), &overlays);
        sync.run_pending(&mut overlays);

        assert!(sync.observe(&id, &display_sets, &properties, instance(2), &overlays));
    }

    #[test]
    fn excluded_modalities_never_reach_the_overlay() {
        let id = ViewportId::new("vp-1");
        let mut overlays = overlays_with_colorbar(&id, &[DisplaySet::new("ct", "CT")]);
        let mut sync = ColorbarSync::default();

        let display_sets = [DisplaySet::new("ct", "CT"), DisplaySet::new("seg", "SEG")];
        sync.observe(
            &id,
            &display_sets,
            &ColorbarProperties::default(),
            instance(1),
            &overlays,
        );
        sync.run_pending(&mut overlays);

        let overlay = overlays.overlay(&id).expect("overlay");
        assert_eq!(overlay.display_set_uids, vec!["ct".to_string()]);
    }

    #[test]
    fn resync_keeps_selected_colormap() {
        let id = ViewportId::new("vp-1");
        let mut overlays = ColorbarOverlays::default();
        let properties = ColorbarProperties::default();
        overlays
            .set_viewport_colorbar(
                &id,
                &[DisplaySet::new("ct", "CT")],
                &properties.options().with_active_colormap("hot_iron"),
            )
            .expect("initial overlay should be created");
        let mut sync = ColorbarSync::default();

        sync.observe(&id, &[DisplaySet::new("mr", "MR")], &properties, instance(1), &overlays);
        assert_eq!(sync.run_pending(&mut overlays), 1);

        let overlay = overlays.overlay(&id).expect("overlay");
        assert_eq!(overlay.display_set_uids, vec!["mr".to_string()]);
        assert_eq!(overlay.active_colormap, "hot_iron");
    }

    #[test]
    fn failed_recreation_leaves_no_overlay() {
        let id = ViewportId::new("vp-1");
        let mut overlays = overlays_with_colorbar(&id, &[DisplaySet::new("ct", "CT")]);
        let mut sync = ColorbarSync::default();

        sync.observe(
            &id,
            &[DisplaySet::new("seg", "SEG")],
            &ColorbarProperties::default(),
            instance(1),
            &overlays,
        );

        assert_eq!(sync.run_pending(&mut overlays), 0);
        assert!(!overlays.has_colorbar(&id));
    }

    #[test]
    fn overlay_removed_before_run_is_not_recreated() {
        let id = ViewportId::new("vp-1");
        let mut overlays = overlays_with_colorbar(&id, &[DisplaySet::new("ct", "CT")]);
        let mut sync = ColorbarSync::default();

        sync.observe(
            &id,
            &[DisplaySet::new("pt", "PT")],
            &ColorbarProperties::default(),
            instance(1),
            &overlays,
        );
        overlays.remove_colorbar(&id);

        assert_eq!(sync.run_pending(&mut overlays), 0);
        assert!(!overlays.has_colorbar(&id));
    }
}
