//! Tick coordinator - runs once per simulation tick
//!
//! Reads the latest agent command, republishes a fresh snapshot (sampling
//! cadence follows the simulation tick, not the network), then applies the
//! command through the host's control capabilities. Nothing here blocks and
//! no host failure escapes past a log line.

use std::sync::Arc;

use tracing::{debug, error};

use crate::host::SimulationHost;

use super::command::{Command, CommandMailbox, ACTION_APPLY_FORCE, ACTION_RELEASE};
use super::sampler;
use super::snapshot::{Snapshot, SnapshotCell};

/// Force magnitudes at or below this are treated as "hold only, no boost"
const FORCE_EPSILON: f32 = 0.001;

pub struct TickCoordinator {
    /// Persistent sample; failed host reads leave its previous values intact
    snapshot: Snapshot,
    cell: Arc<SnapshotCell>,
    mailbox: Arc<CommandMailbox>,
}

impl TickCoordinator {
    pub fn new(cell: Arc<SnapshotCell>, mailbox: Arc<CommandMailbox>) -> Self {
        Self {
            snapshot: Snapshot::default(),
            cell,
            mailbox,
        }
    }

    /// One simulation tick: read command, re-sample, apply
    pub fn on_tick(&mut self, host: &mut dyn SimulationHost) {
        let command = self.mailbox.read();

        sampler::sample(host, &mut self.snapshot);
        self.cell.store(self.snapshot.clone());

        self.apply(host, command);
    }

    /// Apply the agent's command to the host. Outside a controllable state
    /// the command is read but has no effect this tick.
    fn apply(&self, host: &mut dyn SimulationHost, command: Command) {
        if host.minigame_active() {
            match command.action {
                ACTION_APPLY_FORCE => {
                    host.set_hold(true);

                    // Accumulate, never replace: the same command keeps
                    // injecting force every tick until the agent sends a
                    // near-zero magnitude
                    if command.interval.abs() > FORCE_EPSILON {
                        match host.bar_velocity() {
                            Ok(velocity) => {
                                let boosted = velocity + command.interval;
                                if let Err(e) = host.set_bar_velocity(boosted) {
                                    error!(error = %e, "Velocity write failed, force not applied");
                                } else {
                                    debug!(force = command.interval, velocity = boosted, "Force applied to catch bar");
                                }
                            }
                            Err(e) => {
                                error!(error = %e, "Velocity read failed, force not applied");
                            }
                        }
                    }
                }
                ACTION_RELEASE => {
                    host.set_hold(false);
                    host.release_input();
                }
                other => {
                    debug!(action = other, "Ignoring unknown action code");
                }
            }
        } else if command.action == ACTION_APPLY_FORCE
            && host.rod().map(|rod| rod.is_nibbling).unwrap_or(false)
        {
            // Hooking phase: a single click sets the hook on a nibble
            host.hook_fish();
            debug!("Hooking nibbling fish");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DemoHost;

    fn coordinator() -> TickCoordinator {
        TickCoordinator::new(
            Arc::new(SnapshotCell::new()),
            Arc::new(CommandMailbox::new()),
        )
    }

    fn apply_force(host: &mut DemoHost, coordinator: &mut TickCoordinator, force: f32) {
        coordinator.mailbox.write(Command {
            action: ACTION_APPLY_FORCE,
            interval: force,
        });
        coordinator.on_tick(host);
    }

    #[test]
    fn force_accumulates_across_ticks() {
        let mut host = DemoHost::new(1);
        host.equip_rod();
        host.start_minigame(40);
        host.set_bar_velocity(10.0).unwrap();

        let mut coordinator = coordinator();
        apply_force(&mut host, &mut coordinator, 2.5);
        apply_force(&mut host, &mut coordinator, 2.5);

        // v0 + 2f, not v0 + f
        assert_eq!(host.bar_velocity().unwrap(), 15.0);
        assert!(host.hold_flag());
    }

    #[test]
    fn near_zero_force_only_holds() {
        let mut host = DemoHost::new(1);
        host.equip_rod();
        host.start_minigame(40);
        host.set_bar_velocity(10.0).unwrap();

        let mut coordinator = coordinator();
        apply_force(&mut host, &mut coordinator, 0.0005);

        assert_eq!(host.bar_velocity().unwrap(), 10.0);
        assert!(host.hold_flag());
    }

    #[test]
    fn release_clears_hold_and_input_latch() {
        let mut host = DemoHost::new(1);
        host.equip_rod();
        host.start_minigame(40);

        let mut coordinator = coordinator();
        apply_force(&mut host, &mut coordinator, 1.0);
        assert!(host.hold_flag());

        coordinator.mailbox.write(Command {
            action: ACTION_RELEASE,
            interval: 0.0,
        });
        coordinator.on_tick(&mut host);

        assert!(!host.hold_flag());
        assert_eq!(host.release_count(), 1);
    }

    #[test]
    fn nibble_plus_apply_force_hooks_the_fish() {
        let mut host = DemoHost::new(1);
        host.equip_rod();
        host.set_nibbling(true);

        let mut coordinator = coordinator();
        apply_force(&mut host, &mut coordinator, 0.0);

        assert_eq!(host.hook_count(), 1);
    }

    #[test]
    fn command_is_inert_without_a_controllable_state() {
        let mut host = DemoHost::new(1);

        let mut coordinator = coordinator();
        apply_force(&mut host, &mut coordinator, 5.0);

        assert!(!host.hold_flag());
        assert_eq!(host.hook_count(), 0);
        assert_eq!(host.release_count(), 0);
    }

    #[test]
    fn tick_publishes_fresh_snapshot() {
        let mut host = DemoHost::new(1);
        host.equip_rod();
        host.start_minigame(55);

        let mut coordinator = coordinator();
        coordinator.on_tick(&mut host);

        let published = coordinator.cell.load();
        assert!(published.minigame_active);
        assert_eq!(published.difficulty, 55);
    }

    #[test]
    fn failed_velocity_read_is_swallowed() {
        let mut host = DemoHost::new(1);
        host.equip_rod();
        host.start_minigame(40);
        host.set_fail_reads(true);

        let mut coordinator = coordinator();
        apply_force(&mut host, &mut coordinator, 3.0);

        // Hold still latches; the boost is simply skipped
        assert!(host.hold_flag());
    }
}
