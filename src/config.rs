use crate::errors::{GameError, GameResult};
use std::path::PathBuf;

/// Tunables for a game session. Built from the environment with sensible
/// defaults so a bare `GameConfig::default()` reproduces the original game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Starting bankroll.
    pub initial_cash: f64,
    /// Starting price of the simulated underlying.
    pub initial_price: f64,
    /// Annualized volatility of the price process. 2.0 = 200%, meme-stock
    /// territory on purpose.
    pub sigma: f64,
    /// Annualized drift of the price process. Zero by default: pure noise.
    pub drift: f64,
    /// Risk-free rate fed to the pricer.
    pub risk_free_rate: f64,
    /// Volatility fed to the pricer (decoupled from `sigma` so quote pricing
    /// stays stable even if the process params change).
    pub pricing_sigma: f64,
    /// Game-time seconds advanced per tick.
    pub seconds_per_tick: f64,
    /// Expiries offered on the quote sheet, in game-time seconds.
    pub expiry_menu: Vec<f64>,
    /// Call quotes (and put quotes) generated per refresh.
    pub quotes_per_side: usize,
    /// Quotes priced below this are re-drawn rather than displayed.
    pub min_quote_premium: f64,
    /// Location of the SQLite save file.
    pub db_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_cash: 10.0,
            initial_price: 100.0,
            sigma: 2.0,
            drift: 0.0,
            risk_free_rate: 0.05,
            pricing_sigma: 2.0,
            seconds_per_tick: 900.0,
            expiry_menu: vec![3600.0, 7200.0, 10800.0, 14400.0],
            quotes_per_side: 3,
            min_quote_premium: 0.01,
            db_path: PathBuf::from("options_arcade.db"),
        }
    }
}

impl GameConfig {
    pub fn from_env() -> GameResult<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let expiry_menu = match std::env::var("ARCADE_EXPIRY_MENU") {
            Ok(raw) => raw
                .split(',')
                .map(|s| {
                    s.trim()
                        .parse::<f64>()
                        .map_err(|e| GameError::Config(format!("ARCADE_EXPIRY_MENU: {e}")))
                })
                .collect::<GameResult<Vec<f64>>>()?,
            Err(_) => defaults.expiry_menu,
        };

        Ok(Self {
            initial_cash: env_f64("ARCADE_INITIAL_CASH", defaults.initial_cash)?,
            initial_price: env_f64("ARCADE_INITIAL_PRICE", defaults.initial_price)?,
            sigma: env_f64("ARCADE_SIGMA", defaults.sigma)?,
            drift: env_f64("ARCADE_DRIFT", defaults.drift)?,
            risk_free_rate: env_f64("ARCADE_RISK_FREE_RATE", defaults.risk_free_rate)?,
            pricing_sigma: env_f64("ARCADE_PRICING_SIGMA", defaults.pricing_sigma)?,
            seconds_per_tick: env_f64("ARCADE_SECONDS_PER_TICK", defaults.seconds_per_tick)?,
            expiry_menu,
            quotes_per_side: env_usize("ARCADE_QUOTES_PER_SIDE", defaults.quotes_per_side)?,
            min_quote_premium: env_f64("ARCADE_MIN_QUOTE_PREMIUM", defaults.min_quote_premium)?,
            db_path: std::env::var("ARCADE_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
        })
    }
}

fn env_f64(key: &str, default: f64) -> GameResult<f64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<f64>()
            .map_err(|e| GameError::Config(format!("{key}: {e}"))),
        Err(_) => Ok(default),
    }
}

fn env_usize(key: &str, default: usize) -> GameResult<usize> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<usize>()
            .map_err(|e| GameError::Config(format!("{key}: {e}"))),
        Err(_) => Ok(default),
    }
}
