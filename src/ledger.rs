use crate::errors::GameResult;
use crate::models::black_scholes::black_scholes;
use crate::models::{OptionKind, SECONDS_PER_YEAR};
use smallvec::SmallVec;

/// Cash and progression. `cash` only moves through the buy gate (debit) and
/// settlement (credit), so it cannot go negative.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PlayerState {
    pub cash: f64,
    pub level: u32,
    pub xp: u32,
}

/// One open option position. Owned exclusively by the ledger; `current_value`
/// is re-marked against the live spot every tick.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OptionPosition {
    pub strike: f64,
    /// Game-time seconds until expiry. Decreases by the tick size each tick.
    pub time_left: f64,
    pub kind: OptionKind,
    /// Premium paid at purchase. Fixed for the life of the position.
    pub purchase_price: f64,
    /// Latest mark-to-market value.
    pub current_value: f64,
}

/// Owns the player's cash, level, xp, and open positions, and applies the
/// buy / mark / settle / expire transitions. Storage-agnostic: callers decide
/// when to persist the state this returns.
#[derive(Debug, Clone)]
pub struct PositionLedger {
    player: PlayerState,
    positions: SmallVec<[OptionPosition; 4]>,
    /// Risk-free rate used for every quote and settlement.
    rate: f64,
    /// Volatility used for every quote and settlement.
    sigma: f64,
}

impl PositionLedger {
    pub fn new(initial_cash: f64, rate: f64, sigma: f64) -> Self {
        Self {
            player: PlayerState {
                cash: initial_cash,
                level: 1,
                xp: 0,
            },
            positions: SmallVec::new(),
            rate,
            sigma,
        }
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn positions(&self) -> &[OptionPosition] {
        &self.positions
    }

    /// Overwrite player scalars from a loaded snapshot.
    pub fn restore(&mut self, cash: f64, level: u32, xp: u32) {
        self.player = PlayerState { cash, level, xp };
    }

    /// Price an option at the current spot without touching any state.
    pub fn quote_price(
        &self,
        spot: f64,
        strike: f64,
        expiry_seconds: f64,
        kind: OptionKind,
    ) -> GameResult<f64> {
        let t = expiry_seconds / SECONDS_PER_YEAR;
        black_scholes(spot, strike, t, self.rate, self.sigma, kind)
    }

    /// Buy one option at the quoted premium. Returns `Ok(false)` when cash
    /// does not cover the premium; there are no partial fills.
    pub fn buy(
        &mut self,
        spot: f64,
        strike: f64,
        expiry_seconds: f64,
        kind: OptionKind,
    ) -> GameResult<bool> {
        let premium = self.quote_price(spot, strike, expiry_seconds, kind)?;

        if self.player.cash < premium {
            tracing::debug!(
                %kind,
                strike,
                premium,
                cash = self.player.cash,
                "buy rejected: insufficient cash"
            );
            return Ok(false);
        }

        self.player.cash -= premium;
        self.positions.push(OptionPosition {
            strike,
            time_left: expiry_seconds,
            kind,
            purchase_price: premium,
            current_value: premium,
        });

        tracing::info!(
            %kind,
            strike,
            expiry_seconds,
            premium,
            cash = self.player.cash,
            "bought option"
        );
        Ok(true)
    }

    /// Pay out an expired position: credit the intrinsic payoff and award
    /// xp on profit (10 xp per dollar, floored). Returns the payoff.
    ///
    /// The caller removes the position from the open set; `tick` does this
    /// for every position it settles.
    pub fn settle(&mut self, spot: f64, position: &OptionPosition) -> GameResult<f64> {
        // T = 0 forces the intrinsic-value path of the pricer.
        let payoff = black_scholes(spot, position.strike, 0.0, self.rate, self.sigma, position.kind)?;
        self.player.cash += payoff;

        let profit = payoff - position.purchase_price;
        if profit > 0.0 {
            self.player.xp += (profit * 10.0).floor() as u32;
        }

        tracing::info!(
            kind = %position.kind,
            strike = position.strike,
            payoff,
            profit,
            cash = self.player.cash,
            xp = self.player.xp,
            "settled option"
        );
        Ok(payoff)
    }

    /// Advance every open position by `seconds_per_tick`: settle anything at
    /// or past expiry, re-mark the rest against `spot`, then drop the settled
    /// positions from the open set.
    pub fn tick(&mut self, spot: f64, seconds_per_tick: f64) -> GameResult<()> {
        for i in 0..self.positions.len() {
            self.positions[i].time_left -= seconds_per_tick;
            let position = self.positions[i].clone();

            if position.time_left <= 0.0 {
                self.settle(spot, &position)?;
            } else {
                let t = position.time_left / SECONDS_PER_YEAR;
                self.positions[i].current_value =
                    black_scholes(spot, position.strike, t, self.rate, self.sigma, position.kind)?;
            }
        }

        self.positions.retain(|p| p.time_left > 0.0);
        Ok(())
    }

    /// Consume at most one xp threshold (level * 100) per call. Single-shot
    /// on purpose: a tick that grants several levels' worth of xp catches up
    /// over the following ticks, preserving the original game's pacing.
    pub fn check_level_up(&mut self) {
        let threshold = self.player.level * 100;
        if self.player.xp >= threshold {
            self.player.xp -= threshold;
            self.player.level += 1;
            tracing::info!(
                level = self.player.level,
                xp = self.player.xp,
                "level up"
            );
        }
    }
}

/// The five tradable strikes around `spot`: the nearest multiple of 5 plus
/// two steps out on each side.
pub fn available_strikes(spot: f64) -> [f64; 5] {
    let center = 5.0 * (spot / 5.0).round();
    [
        center - 10.0,
        center - 5.0,
        center,
        center + 5.0,
        center + 10.0,
    ]
}
