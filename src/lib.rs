//! Simulation core for a browser-based stock-options trading game.
//!
//! The host application owns the loop: it calls [`GameSession::tick`] (or
//! [`GameController::tick`] when it manages persistence itself) once per fixed
//! interval, then pulls [`UserState`] and quote data for rendering. Everything
//! here is synchronous, single-threaded arithmetic; there is no process
//! boundary, network surface, or UI concern in this crate.

pub mod config;
pub mod errors;
pub mod game;
pub mod ledger;
pub mod models;
pub mod save;
pub mod session;
pub mod sim;

pub use config::GameConfig;
pub use errors::{GameError, GameResult};
pub use game::{GameController, Quote, QuoteSheet, UserState};
pub use ledger::{available_strikes, OptionPosition, PlayerState, PositionLedger};
pub use models::OptionKind;
pub use save::{MemoryStore, SaveSnapshot, SaveStore, SqliteStore};
pub use session::GameSession;
pub use sim::{PriceProcess, StockParams};
