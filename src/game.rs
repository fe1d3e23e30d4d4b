use crate::config::GameConfig;
use crate::errors::GameResult;
use crate::ledger::{available_strikes, OptionPosition, PositionLedger};
use crate::models::OptionKind;
use crate::save::SaveSnapshot;
use crate::sim::{PriceProcess, StockParams};
use rand::Rng;

/// Candidate draws per side before quote generation gives up on filling the
/// sheet. Keeps the redraw loop total even with a hostile threshold.
const MAX_QUOTE_ATTEMPTS: usize = 64;

/// Read-only state snapshot for the rendering boundary. Data only; the core
/// never touches presentation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UserState {
    pub cash: f64,
    pub level: u32,
    pub xp: u32,
    pub stock_price: f64,
    pub options: Vec<OptionPosition>,
}

/// One tradable offer on the quote sheet.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Quote {
    pub strike: f64,
    pub expiry_seconds: f64,
    pub kind: OptionKind,
    pub premium: f64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct QuoteSheet {
    pub calls: Vec<Quote>,
    pub puts: Vec<Quote>,
}

/// Orchestrates one discrete simulation step: price process first, then the
/// position ledger, then leveling. Owns the RNG so price paths and quote
/// draws replay exactly under a seeded generator.
pub struct GameController<R: Rng> {
    config: GameConfig,
    rng: R,
    stock: PriceProcess,
    ledger: PositionLedger,
}

impl<R: Rng> GameController<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        let stock = PriceProcess::new(StockParams {
            initial_price: config.initial_price,
            sigma: config.sigma,
            drift: config.drift,
        });
        let ledger = PositionLedger::new(
            config.initial_cash,
            config.risk_free_rate,
            config.pricing_sigma,
        );
        Self {
            config,
            rng,
            stock,
            ledger,
        }
    }

    /// Advance one tick.
    pub fn tick(&mut self) -> GameResult<()> {
        self.stock.tick(&mut self.rng, self.config.seconds_per_tick);
        self.ledger
            .tick(self.stock.price(), self.config.seconds_per_tick)?;
        self.ledger.check_level_up();
        Ok(())
    }

    pub fn user_state(&self) -> UserState {
        let player = self.ledger.player();
        UserState {
            cash: player.cash,
            level: player.level,
            xp: player.xp,
            stock_price: self.stock.price(),
            options: self.ledger.positions().to_vec(),
        }
    }

    pub fn stock_price(&self) -> f64 {
        self.stock.price()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn available_strikes(&self) -> [f64; 5] {
        available_strikes(self.stock.price())
    }

    /// Price a candidate option at the current spot without buying it.
    pub fn quote_price(
        &self,
        strike: f64,
        expiry_seconds: f64,
        kind: OptionKind,
    ) -> GameResult<f64> {
        self.ledger
            .quote_price(self.stock.price(), strike, expiry_seconds, kind)
    }

    /// Buy at the current spot. `Ok(false)` means insufficient cash.
    pub fn buy(&mut self, strike: f64, expiry_seconds: f64, kind: OptionKind) -> GameResult<bool> {
        self.ledger
            .buy(self.stock.price(), strike, expiry_seconds, kind)
    }

    /// Draw a fresh quote sheet: `quotes_per_side` random (strike, expiry)
    /// offers per side, re-drawing any candidate priced below the display
    /// threshold so the sheet never shows a worthless offer.
    pub fn generate_quotes(&mut self) -> GameResult<QuoteSheet> {
        Ok(QuoteSheet {
            calls: self.draw_side(OptionKind::Call)?,
            puts: self.draw_side(OptionKind::Put)?,
        })
    }

    fn draw_side(&mut self, kind: OptionKind) -> GameResult<Vec<Quote>> {
        let strikes = self.available_strikes();
        let mut quotes = Vec::with_capacity(self.config.quotes_per_side);

        let mut attempts = 0;
        while quotes.len() < self.config.quotes_per_side && attempts < MAX_QUOTE_ATTEMPTS {
            attempts += 1;

            let strike = strikes[self.rng.gen_range(0..strikes.len())];
            let expiry_seconds =
                self.config.expiry_menu[self.rng.gen_range(0..self.config.expiry_menu.len())];

            // A crashed stock can push the low strikes to zero or below;
            // those are not priceable, redraw.
            if strike <= 0.0 {
                continue;
            }

            let premium = self.quote_price(strike, expiry_seconds, kind)?;
            if premium < self.config.min_quote_premium {
                continue;
            }

            quotes.push(Quote {
                strike,
                expiry_seconds,
                kind,
                premium,
            });
        }

        Ok(quotes)
    }

    /// The four scalar fields the persistence boundary carries.
    pub fn snapshot(&self) -> SaveSnapshot {
        let player = self.ledger.player();
        SaveSnapshot {
            cash: player.cash,
            level: player.level,
            xp: player.xp,
            stock_price: self.stock.price(),
        }
    }

    /// Overwrite the scalar state from a loaded snapshot. Open positions are
    /// not part of the save format and are left untouched.
    pub fn restore(&mut self, snapshot: &SaveSnapshot) {
        self.ledger
            .restore(snapshot.cash, snapshot.level, snapshot.xp);
        self.stock.set_price(snapshot.stock_price);
    }

    /// Reinitialize price and player state from the configured defaults,
    /// keeping the RNG stream. The give-up/restart path.
    pub fn reset(&mut self) {
        self.stock = PriceProcess::new(StockParams {
            initial_price: self.config.initial_price,
            sigma: self.config.sigma,
            drift: self.config.drift,
        });
        self.ledger = PositionLedger::new(
            self.config.initial_cash,
            self.config.risk_free_rate,
            self.config.pricing_sigma,
        );
    }
}
