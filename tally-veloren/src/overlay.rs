//! Floating-label overlay pass.
//!
//! Runs from the render frame, which can tick at a different cadence (and
//! on a different thread) than the logic step. It only *reads*: avatar
//! positions come from the renderer's own interpolated view, counters
//! from the [`CounterStore`] via its concurrent maps. The screen-space
//! transform and the actual text drawing belong to the renderer.

use tally_core::config::TallyConfig;
use tally_core::label;
use tally_core::store::CounterStore;
use tally_core::types::{ActorId, EventKind, Location, TransientHandle};

/// One avatar as the renderer sees it this frame.
#[derive(Debug, Clone, Copy)]
pub struct AvatarView {
    /// The avatar entity's transient handle.
    pub handle: TransientHandle,
    /// Interpolated world position this frame.
    pub position: Location,
    /// Avatar height, for anchoring the label above the head.
    pub height: f32,
}

/// A label ready for the renderer to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLabel {
    /// Which avatar the label belongs to.
    pub handle: TransientHandle,
    /// World-space anchor point of the label.
    pub anchor: Location,
    /// Displayable text.
    pub text: String,
    /// Whether to draw the translucent background.
    pub background: bool,
}

/// Collect the labels to draw this frame.
///
/// Avatars with a zero count get no label; the local actor is skipped
/// when self-counting is off, matching what the counters themselves do.
#[must_use]
pub fn collect_labels(
    avatars: &[AvatarView],
    store: &CounterStore,
    config: &TallyConfig,
    local_actor: Option<ActorId>,
    kind: EventKind,
) -> Vec<OverlayLabel> {
    if !config.general.enabled || !config.overlay.show_on_player_name {
        return Vec::new();
    }

    avatars
        .iter()
        .filter_map(|avatar| {
            let actor = store.actor_for_handle(avatar.handle)?;
            if !config.counting.count_self && local_actor == Some(actor) {
                return None;
            }
            let count = store.get(actor);
            if count == 0 {
                return None;
            }
            let mut anchor = avatar.position;
            anchor.z +=
                avatar.height + config.overlay.label_height_offset + label::stack_offset(kind);
            Some(OverlayLabel {
                handle: avatar.handle,
                anchor,
                text: label::build_label(count, kind),
                background: config.overlay.show_background,
            })
        })
        .collect()
}
