//! Configuration for the tally engine.
//!
//! Maps directly to `tally.toml`. The engine reads these values once per
//! step and never writes them; the integration layer owns the file itself.

use serde::{Deserialize, Serialize};

/// Top-level tally configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallyConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// What gets counted, and for whom.
    #[serde(default)]
    pub counting: CountingConfig,
    /// Detection tuning knobs (tick budgets, attribution radii).
    #[serde(default)]
    pub tuning: TuningConfig,
    /// Floating-label overlay settings.
    #[serde(default)]
    pub overlay: OverlayConfig,
}

impl TallyConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `TallyError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::TallyError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serialize this configuration back to TOML.
    ///
    /// # Errors
    /// Returns `TallyError::Config` if serialization fails.
    pub fn to_toml(&self) -> crate::error::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::TallyError::Config(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Master toggle for all detection work.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
        }
    }
}

/// What gets counted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountingConfig {
    /// Whether the local viewing actor's own actions are counted.
    ///
    /// When false, the local actor is removed from the attribution
    /// candidate set entirely, so a farther actor within the cutoff may
    /// receive credit for the local actor's action. Accepted heuristic
    /// inaccuracy.
    #[serde(default = "default_true")]
    pub count_self: bool,
    /// Count tracked block placements.
    #[serde(default = "default_true")]
    pub count_placements: bool,
    /// Count completed consumptions of the tracked item.
    #[serde(default = "default_true")]
    pub count_consumptions: bool,
    /// Count tracked projectile throws.
    #[serde(default = "default_true")]
    pub count_projectiles: bool,
    /// Count the plain variant of the tracked consumable.
    #[serde(default = "default_true")]
    pub count_plain_consumable: bool,
    /// Count the empowered variant of the tracked consumable.
    #[serde(default = "default_true")]
    pub count_empowered_consumable: bool,
    /// Minimum potency tier a healing projectile must carry to count.
    #[serde(default = "default_potency")]
    pub min_projectile_potency: u8,
}

impl Default for CountingConfig {
    fn default() -> Self {
        Self {
            count_self: true,
            count_placements: true,
            count_consumptions: true,
            count_projectiles: true,
            count_plain_consumable: true,
            count_empowered_consumable: true,
            min_projectile_potency: 1,
        }
    }
}

/// Detection tuning knobs. All tick values are simulation steps, not
/// wall-clock time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningConfig {
    /// Steps to hold an ambiguous stopped-consuming state open before
    /// treating it as a false start. Tolerates the lag between the client
    /// showing "stopped using" and the follow-up inventory sync.
    #[serde(default = "default_grace_ticks")]
    pub grace_ticks: u32,
    /// Steps to retry classifying an entity whose payload has not
    /// replicated yet before giving up on it.
    #[serde(default = "default_retry_ticks")]
    pub classify_retry_ticks: u32,
    /// Attribution cutoff for block placements (approximates interaction
    /// reach).
    #[serde(default = "default_placement_radius")]
    pub placement_radius: f32,
    /// Attribution cutoff for thrown projectiles (accounts for travel
    /// distance before the entity becomes visible).
    #[serde(default = "default_projectile_radius")]
    pub projectile_radius: f32,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            grace_ticks: 6,
            classify_retry_ticks: 20,
            placement_radius: 7.0,
            projectile_radius: 20.0,
        }
    }
}

/// Floating-label overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Show counters above player avatars.
    #[serde(default = "default_true")]
    pub show_on_player_name: bool,
    /// Draw a translucent background behind the label.
    #[serde(default = "default_true")]
    pub show_background: bool,
    /// Vertical offset above the avatar's head, in world units.
    #[serde(default = "default_label_offset")]
    pub label_height_offset: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            show_on_player_name: true,
            show_background: true,
            label_height_offset: 0.6,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_potency() -> u8 { 1 }
fn default_grace_ticks() -> u32 { 6 }
fn default_retry_ticks() -> u32 { 20 }
fn default_placement_radius() -> f32 { 7.0 }
fn default_projectile_radius() -> f32 { 20.0 }
fn default_label_offset() -> f32 { 0.6 }
