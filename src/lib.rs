//! Reel Bridge - streams fishing-minigame state to an external agent
//!
//! The bridge couples two independently clocked contexts: the simulation's
//! fixed tick loop and a TCP peer with arbitrary latency. Each tick the
//! coordinator publishes a fresh state snapshot; the connection session
//! exchanges snapshots for agent commands at its own bounded pace, and the
//! latest decoded command is handed back to the tick loop through a
//! single-slot mailbox.

pub mod bridge;
pub mod config;
pub mod host;
