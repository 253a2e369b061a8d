//! Core type definitions for the tally engine.
//!
//! Everything here is plain data; the inference logic lives in the
//! component modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Stable identity of a player for the duration of a session.
///
/// Independent of the per-connection network handle the host assigns to the
/// player's entity — that handle is a [`TransientHandle`] and must be
/// re-resolved every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Create a new random actor ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host-assigned handle for a currently-loaded entity.
///
/// Valid only while the entity stays loaded; not stable across
/// disconnect/reconnect. The [`crate::store::CounterStore`] keeps a
/// handle→actor index refreshed from each step's roster so the renderer
/// can resolve handles without a roster scan of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransientHandle(pub u32);

/// Network id of a tracked world entity (projectile, placed block entity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityKey(pub u32);

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Spatial
// ---------------------------------------------------------------------------

/// A 3D position in the game world.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

impl Location {
    /// Create a location from its components.
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another location.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

/// A world grid cell, used to key block placements.
///
/// Two detection paths reporting the same placement report the same cell,
/// which is what the per-step deduplication scope keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    /// X cell index.
    pub x: i32,
    /// Y cell index.
    pub y: i32,
    /// Z cell index.
    pub z: i32,
}

impl CellPos {
    /// Center of this cell as a world location.
    #[must_use]
    pub fn center(&self) -> Location {
        Location::new(self.x as f32 + 0.5, self.y as f32 + 0.5, self.z as f32 + 0.5)
    }
}

// ---------------------------------------------------------------------------
// Hands & Held Items
// ---------------------------------------------------------------------------

/// Which hand slot an item is held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandSlot {
    /// The primary (main) hand.
    Main,
    /// The secondary (off) hand.
    Off,
}

impl HandSlot {
    /// Both slots, iteration order Main then Off.
    pub const ALL: [Self; 2] = [Self::Main, Self::Off];

    /// Index into a two-element slot array.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Main => 0,
            Self::Off => 1,
        }
    }
}

/// Sub-kind of the tracked consumable.
///
/// The plain and empowered variants are counted into the same tally but can
/// be toggled independently in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsumableKind {
    /// The ordinary variant.
    Plain,
    /// The rare, empowered variant.
    Empowered,
}

/// What an actor holds in one hand slot, as far as counting is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotView {
    /// The slot holds nothing.
    Empty,
    /// The slot holds an item we do not track.
    Untracked,
    /// The slot holds a stack of the tracked consumable.
    Tracked {
        /// Which sub-kind of the consumable.
        kind: ConsumableKind,
        /// Units remaining in the stack.
        count: u32,
    },
}

impl SlotView {
    /// Stack count if the slot holds the tracked consumable.
    #[must_use]
    pub fn tracked_count(&self) -> Option<u32> {
        match self {
            Self::Tracked { count, .. } => Some(*count),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tracked Entities & Classification
// ---------------------------------------------------------------------------

/// The kind of occurrence being counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A tracked block appeared in the world.
    Placement,
    /// An actor finished consuming one unit of the tracked item.
    Consumption,
    /// A tracked projectile was released.
    ProjectileRelease,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placement => write!(f, "placement"),
            Self::Consumption => write!(f, "consumption"),
            Self::ProjectileRelease => write!(f, "projectile"),
        }
    }
}

/// Kind of a block that appeared in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// The tracked web block.
    Web,
    /// Anything else.
    Other,
}

/// Effect category of a projectile payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// A healing effect.
    Heal,
    /// Anything else.
    Other,
}

/// The effect carried by a thrown projectile, once replicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectileEffect {
    /// Effect category.
    pub effect: EffectKind,
    /// Effect strength tier (0 = weakest).
    pub potency: u8,
}

/// Classification-relevant replicated data for a tracked entity.
///
/// Block identity is known the moment the block becomes visible; projectile
/// effect data arrives asynchronously, a small and variable number of steps
/// after the entity itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityPayload {
    /// A block appearance.
    Block(BlockKind),
    /// A projectile with its effect payload.
    Projectile(ProjectileEffect),
}

/// Outcome of classifying a tracked entity against the counting criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Matches the tracked criteria — count it.
    Confirmed,
    /// Definitively does not match — never re-check.
    Rejected,
    /// Payload not replicated yet — retry next step.
    Indeterminate,
}

/// A confirmed occurrence ready for attribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedEvent {
    /// What kind of occurrence this is.
    pub kind: EventKind,
    /// World position at occurrence time.
    pub position: Location,
    /// The originating entity, when there is one.
    pub entity: Option<EntityKey>,
}
