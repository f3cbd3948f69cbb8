//! Game rules and state management.
//!
//! This module composes the core data structures into a playable game:
//!
//! - [`GameSession`] - The state machine owning the grid, pieces and counters
//! - [`GameStats`] - Score, level, lines, combo and high score bookkeeping
//! - [`GameConfig`] - Grid size, speed curve and scoring constants
//! - [`PieceBag`] - 7-bag piece generation
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`GameEvent`] - Notifications for sound and persistence collaborators
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] from a validated [`GameConfig`] and start it
//! 2. Forward player input as method calls (move, rotate, drop, hold)
//! 3. Call [`GameSession::tick`] regularly; gravity drops the piece once per interval
//! 4. Locked pieces clear full rows, update the score and spawn the next piece
//! 5. The game ends when a new piece cannot spawn
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use brickfall_engine::{GameConfig, GameSession};
//!
//! let mut session = GameSession::new(GameConfig::default()).unwrap();
//! session.start(Duration::ZERO);
//!
//! let mut now = Duration::ZERO;
//! while session.state().is_running() {
//!     now += Duration::from_millis(100);
//!     session.tick(now);
//!     let _ = session.hard_drop();
//! }
//! println!("final score: {}", session.stats().score());
//! ```

pub use self::{bag::*, config::*, event::*, session::*, stats::*};

mod bag;
mod config;
mod event;
mod session;
mod stats;
