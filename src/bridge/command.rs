//! Agent command and the single-slot mailbox it lands in

use parking_lot::Mutex;
use serde::Deserialize;

/// Release the catch bar / do nothing this tick
pub const ACTION_RELEASE: i32 = 0;
/// Apply force to the catch bar (or hook a nibbling fish)
pub const ACTION_APPLY_FORCE: i32 = 1;

/// One decoded agent instruction.
///
/// `interval` is repurposed on the wire to carry the signed force magnitude;
/// it is only interpreted when `action` is `ACTION_APPLY_FORCE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Command {
    pub action: i32,
    pub interval: f32,
}

/// Single-slot, latest-write-wins holder for the most recent command.
///
/// Both `write` and `read` cover the full struct under one lock, so a reader
/// always sees a complete, previously committed command. No queueing, no
/// backpressure; a new write simply supersedes the old value. Starts out
/// holding the zero command so the tick loop has a defined value before any
/// agent connects.
#[derive(Debug, Default)]
pub struct CommandMailbox {
    slot: Mutex<Command>,
}

impl CommandMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a new command, superseding whatever was held
    pub fn write(&self, command: Command) {
        *self.slot.lock() = command;
    }

    /// Read the latest committed command
    pub fn read(&self) -> Command {
        *self.slot.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn starts_with_zero_command() {
        let mailbox = CommandMailbox::new();
        assert_eq!(
            mailbox.read(),
            Command {
                action: ACTION_RELEASE,
                interval: 0.0
            }
        );
    }

    #[test]
    fn latest_write_wins() {
        let mailbox = CommandMailbox::new();
        mailbox.write(Command {
            action: ACTION_APPLY_FORCE,
            interval: 1.5,
        });
        mailbox.write(Command {
            action: ACTION_RELEASE,
            interval: -0.25,
        });
        assert_eq!(
            mailbox.read(),
            Command {
                action: ACTION_RELEASE,
                interval: -0.25
            }
        );
    }

    #[test]
    fn concurrent_reads_never_observe_torn_commands() {
        // Writers only ever commit (n, n as f32) pairs; any read where the
        // two halves disagree would be a torn command.
        let mailbox = Arc::new(CommandMailbox::new());
        let mut handles = Vec::new();

        for offset in 0..4 {
            let mailbox = mailbox.clone();
            handles.push(thread::spawn(move || {
                for i in 0..2_000 {
                    let n = offset * 2_000 + i;
                    mailbox.write(Command {
                        action: n,
                        interval: n as f32,
                    });
                }
            }));
        }

        let reader = {
            let mailbox = mailbox.clone();
            thread::spawn(move || {
                for _ in 0..10_000 {
                    let command = mailbox.read();
                    assert_eq!(command.action as f32, command.interval);
                }
            })
        };

        for handle in handles {
            handle.join().unwrap();
        }
        reader.join().unwrap();
    }
}
