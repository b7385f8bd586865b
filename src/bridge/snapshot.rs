//! Snapshot model and the shared cell the session reads it from

use parking_lot::RwLock;
use serde::Serialize;

/// One sampled view of simulation state, sent to the agent each exchange.
///
/// Field order matches the outbound wire schema. Minigame fields are
/// meaningful only while `minigame_active` is true; bobber fields only while
/// `bobber_exists` is true. The bobber fields are part of the sampled state
/// but are not on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Snapshot {
    pub has_fishing_rod: bool,
    pub casting_power: f32,
    pub is_fishing: bool,
    pub is_nibbling: bool,
    pub player_tile_x: i32,
    pub player_tile_y: i32,
    pub minigame_active: bool,
    pub fish_position: f32,
    pub bobber_bar_position: f32,
    pub bobber_bar_height: i32,
    pub fish_target_position: f32,
    pub distance_from_catching: f32,
    pub treasure_appeared: bool,
    pub treasure_position: f32,
    pub bobber_bar_velocity: f32,
    pub fish_velocity: f32,
    pub difficulty: i32,
    pub rod_type: String,
    pub location: String,
    pub weather: String,
    pub season: String,
    pub time_of_day: i32,

    #[serde(skip)]
    pub bobber_exists: bool,
    #[serde(skip)]
    pub bobber_x: f32,
    #[serde(skip)]
    pub bobber_y: f32,
}

/// Shared holder for the latest committed snapshot.
///
/// The tick side stores a whole value under the write lock; the session side
/// clones under the read lock. A reader never observes a half-updated
/// snapshot.
#[derive(Debug, Default)]
pub struct SnapshotCell {
    inner: RwLock<Snapshot>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held snapshot
    pub fn store(&self, snapshot: Snapshot) {
        *self.inner.write() = snapshot;
    }

    /// Copy out the latest committed snapshot
    pub fn load(&self) -> Snapshot {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_starts_with_default_snapshot() {
        let cell = SnapshotCell::new();
        assert_eq!(cell.load(), Snapshot::default());
    }

    #[test]
    fn store_replaces_whole_value() {
        let cell = SnapshotCell::new();
        let snapshot = Snapshot {
            minigame_active: true,
            fish_position: 120.5,
            location: "Mountain".to_string(),
            ..Snapshot::default()
        };
        cell.store(snapshot.clone());
        assert_eq!(cell.load(), snapshot);
    }
}
