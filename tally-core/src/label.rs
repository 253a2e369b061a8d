//! Floating-label text for the overlay.
//!
//! Pure formatting only — the renderer owns fonts, colors, and the
//! screen-space transform. Each event kind has a private-use icon glyph
//! resolved by the overlay font, and a vertical stacking offset so
//! multiple counters above the same avatar do not overlap.

use crate::types::EventKind;

/// Private-use glyph for the placement counter icon.
pub const PLACEMENT_ICON: char = '\u{E200}';
/// Private-use glyph for the consumption counter icon.
pub const CONSUMPTION_ICON: char = '\u{E201}';
/// Private-use glyph for the projectile counter icon.
pub const PROJECTILE_ICON: char = '\u{E202}';

/// Icon glyph for an event kind.
#[must_use]
pub fn icon(kind: EventKind) -> char {
    match kind {
        EventKind::Placement => PLACEMENT_ICON,
        EventKind::Consumption => CONSUMPTION_ICON,
        EventKind::ProjectileRelease => PROJECTILE_ICON,
    }
}

/// Extra height (world units) added per kind so stacked counters sit in a
/// stable order above the avatar.
#[must_use]
pub fn stack_offset(kind: EventKind) -> f32 {
    match kind {
        EventKind::Consumption => 0.0,
        EventKind::Placement => 0.3,
        EventKind::ProjectileRelease => 0.6,
    }
}

/// Build the displayable counter text: the count followed by the kind's
/// icon glyph. Pure; no side effects.
#[must_use]
pub fn build_label(count: u32, kind: EventKind) -> String {
    format!("{count} {}", icon(kind))
}
