//! In-process reference host
//!
//! A stand-in simulation for running the bridge end to end without the real
//! game: fixed contextual tags, settable rod/minigame state and a minimal
//! kinematic step. It deliberately does not reproduce the game's closed-form
//! reel-in physics; there is just enough motion for an agent on the other
//! end of the socket to have something to react to.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{ContextView, HostError, MinigameView, RodView, SimulationHost};

/// Minigame track length in pixels (bar and fish positions live in 0..track)
const TRACK_HEIGHT: f32 = 568.0;

/// Demo simulation host with deterministic fish drift
pub struct DemoHost {
    context: ContextView,
    rod: Option<RodView>,
    minigame: Option<MinigameView>,
    hold: bool,
    hooks: u32,
    releases: u32,
    /// When set, scalar reads fail as if the host's field lookup broke
    fail_reads: bool,
    rng: ChaCha8Rng,
}

impl DemoHost {
    pub fn new(seed: u64) -> Self {
        Self {
            context: ContextView {
                player_tile_x: 68,
                player_tile_y: 18,
                rod_type: "Bamboo Pole".to_string(),
                location: "Beach".to_string(),
                weather: "Sunny".to_string(),
                season: "spring".to_string(),
                time_of_day: 600,
            },
            rod: None,
            minigame: None,
            hold: false,
            hooks: 0,
            releases: 0,
            fail_reads: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Equip a rod with the line already in the water
    pub fn equip_rod(&mut self) {
        self.rod = Some(RodView {
            casting_power: 1.0,
            is_fishing: true,
            is_nibbling: false,
            bobber: Some((2180.0, 980.0)),
        });
    }

    pub fn set_nibbling(&mut self, nibbling: bool) {
        if let Some(rod) = self.rod.as_mut() {
            rod.is_nibbling = nibbling;
        }
    }

    /// Open the reel-in minigame at the given difficulty
    pub fn start_minigame(&mut self, difficulty: i32) {
        self.minigame = Some(MinigameView {
            fish_position: TRACK_HEIGHT / 2.0,
            bar_position: TRACK_HEIGHT - 96.0,
            bar_height: 96,
            bar_velocity: 0.0,
            fish_velocity: 0.0,
            fish_target_position: TRACK_HEIGHT / 2.0,
            distance_from_catching: 0.3,
            treasure_appeared: false,
            treasure_position: 0.0,
            difficulty,
        });
    }

    pub fn end_minigame(&mut self) {
        self.minigame = None;
        self.hold = false;
    }

    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn hold_flag(&self) -> bool {
        self.hold
    }

    pub fn hook_count(&self) -> u32 {
        self.hooks
    }

    pub fn release_count(&self) -> u32 {
        self.releases
    }

    /// Advance the stub physics by one tick
    pub fn step(&mut self, dt: f32) {
        let hold = self.hold;
        let Some(game) = self.minigame.as_mut() else {
            return;
        };

        // Fish wanders toward a drifting target
        if (game.fish_position - game.fish_target_position).abs() < 8.0 {
            let span = TRACK_HEIGHT - 40.0;
            game.fish_target_position = self.rng.gen_range(0.0..span);
        }
        let pull = (game.fish_target_position - game.fish_position).signum();
        game.fish_velocity = (game.fish_velocity + pull * game.difficulty as f32 * dt)
            .clamp(-300.0, 300.0);
        game.fish_position =
            (game.fish_position + game.fish_velocity * dt).clamp(0.0, TRACK_HEIGHT);

        // Bar rises while held, sinks under gravity otherwise
        let accel = if hold { -500.0 } else { 450.0 };
        game.bar_velocity = (game.bar_velocity + accel * dt).clamp(-480.0, 480.0);
        game.bar_position = (game.bar_position + game.bar_velocity * dt)
            .clamp(0.0, TRACK_HEIGHT - game.bar_height as f32);
        if game.bar_position <= 0.0 || game.bar_position >= TRACK_HEIGHT - game.bar_height as f32 {
            game.bar_velocity = 0.0;
        }

        // Catch meter fills while the fish sits inside the bar
        let inside = game.fish_position >= game.bar_position
            && game.fish_position <= game.bar_position + game.bar_height as f32;
        let delta = if inside { 0.1 } else { -0.05 };
        game.distance_from_catching = (game.distance_from_catching + delta * dt).clamp(0.0, 1.0);
    }
}

impl SimulationHost for DemoHost {
    fn context(&self) -> ContextView {
        self.context.clone()
    }

    fn rod(&self) -> Option<RodView> {
        self.rod.clone()
    }

    fn minigame_active(&self) -> bool {
        self.minigame.is_some()
    }

    fn read_minigame(&self) -> Result<MinigameView, HostError> {
        if self.fail_reads {
            return Err(HostError::FieldUnavailable("bobberBarPos"));
        }
        self.minigame
            .clone()
            .ok_or(HostError::MinigameInactive)
    }

    fn set_hold(&mut self, held: bool) {
        self.hold = held;
    }

    fn bar_velocity(&self) -> Result<f32, HostError> {
        if self.fail_reads {
            return Err(HostError::FieldUnavailable("bobberBarSpeed"));
        }
        self.minigame
            .as_ref()
            .map(|g| g.bar_velocity)
            .ok_or(HostError::MinigameInactive)
    }

    fn set_bar_velocity(&mut self, velocity: f32) -> Result<(), HostError> {
        if self.fail_reads {
            return Err(HostError::FieldUnavailable("bobberBarSpeed"));
        }
        match self.minigame.as_mut() {
            Some(game) => {
                game.bar_velocity = velocity;
                Ok(())
            }
            None => Err(HostError::MinigameInactive),
        }
    }

    fn release_input(&mut self) {
        self.releases += 1;
    }

    fn hook_fish(&mut self) {
        self.hooks += 1;
        if let Some(rod) = self.rod.as_mut() {
            rod.is_nibbling = false;
        }
    }
}
