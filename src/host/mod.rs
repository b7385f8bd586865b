//! Simulation host capability surface
//!
//! The simulation that owns the authoritative fishing state is an external
//! collaborator. The bridge never touches its internals; it sees only this
//! narrow trait: typed read views over player/rod/minigame state plus a
//! handful of control writes. Minigame scalar access is fallible because the
//! host's internal layout is not under the bridge's control - a field the
//! adapter expects may simply not be there in a given host build.

pub mod demo;

pub use demo::DemoHost;

/// Contextual tags describing where and when the player is fishing
#[derive(Debug, Clone, Default)]
pub struct ContextView {
    pub player_tile_x: i32,
    pub player_tile_y: i32,
    pub rod_type: String,
    pub location: String,
    pub weather: String,
    pub season: String,
    pub time_of_day: i32,
}

/// Fishing rod state, present only while a rod is equipped
#[derive(Debug, Clone, Default)]
pub struct RodView {
    /// Charge level of the cast (0.0 - 1.0)
    pub casting_power: f32,
    /// Line is in the water
    pub is_fishing: bool,
    /// A fish is nibbling and can be hooked
    pub is_nibbling: bool,
    /// Bobber pixel position, if one is floating
    pub bobber: Option<(f32, f32)>,
}

/// One read of the reel-in minigame's internal scalars
#[derive(Debug, Clone, Default)]
pub struct MinigameView {
    pub fish_position: f32,
    pub bar_position: f32,
    pub bar_height: i32,
    pub bar_velocity: f32,
    pub fish_velocity: f32,
    pub fish_target_position: f32,
    /// Catch meter fill (0.0 - 1.0)
    pub distance_from_catching: f32,
    pub treasure_appeared: bool,
    pub treasure_position: f32,
    pub difficulty: i32,
}

/// Errors raised by the host adapter's scalar capability
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Host field unavailable: {0}")]
    FieldUnavailable(&'static str),

    #[error("Minigame is not active")]
    MinigameInactive,
}

/// Narrow capability interface over the external simulation.
///
/// Reads drive the state sampler; writes carry the agent's command back in.
/// Implementations live outside the bridge (the adapter owns whatever
/// reflection or direct access the host requires).
pub trait SimulationHost: Send {
    /// Contextual tags; always available
    fn context(&self) -> ContextView;

    /// Rod state, or `None` when no rod is equipped
    fn rod(&self) -> Option<RodView>;

    /// Whether the reel-in minigame menu is currently open.
    /// Derived structurally, independent of scalar field availability.
    fn minigame_active(&self) -> bool;

    /// Read the minigame's internal scalars; fails if the host's
    /// field lookup fails
    fn read_minigame(&self) -> Result<MinigameView, HostError>;

    /// Set the minigame's continuous-hold input flag
    fn set_hold(&mut self, held: bool);

    /// Current catch-bar velocity
    fn bar_velocity(&self) -> Result<f32, HostError>;

    /// Overwrite the catch-bar velocity
    fn set_bar_velocity(&mut self, velocity: f32) -> Result<(), HostError>;

    /// Clear any residual input latch (the host's explicit release)
    fn release_input(&mut self);

    /// Single-click hook while a fish is nibbling
    fn hook_fish(&mut self);
}
