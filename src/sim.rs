use crate::models::SECONDS_PER_YEAR;
use rand::Rng;

/// Parameters of the simulated underlying. Immutable once the process exists.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StockParams {
    pub initial_price: f64,
    /// Annualized volatility, > 0.
    pub sigma: f64,
    /// Annualized drift.
    pub drift: f64,
}

impl Default for StockParams {
    fn default() -> Self {
        Self {
            initial_price: 100.0,
            sigma: 2.0,
            drift: 0.0,
        }
    }
}

/// Discrete-time geometric Brownian motion.
///
/// Each step multiplies the price by exp of a normally distributed log-return,
/// so the price stays strictly positive for any finite draw. The RNG is passed
/// in per step rather than owned, so price paths replay exactly under a seeded
/// generator.
#[derive(Debug, Clone)]
pub struct PriceProcess {
    price: f64,
    sigma: f64,
    drift: f64,
}

impl PriceProcess {
    pub fn new(params: StockParams) -> Self {
        Self {
            price: params.initial_price,
            sigma: params.sigma,
            drift: params.drift,
        }
    }

    /// Advance the price by `seconds` of game time. Returns the new price.
    pub fn tick<R: Rng>(&mut self, rng: &mut R, seconds: f64) -> f64 {
        let dt = seconds / SECONDS_PER_YEAR;
        let sigma_drift = (self.drift - 0.5 * self.sigma * self.sigma) * dt;
        let sigma_wiener = self.sigma * dt.sqrt() * standard_normal(rng);

        self.price *= (sigma_drift + sigma_wiener).exp();
        self.price
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Overwrite the current price. Only the snapshot-restore path uses this.
    pub fn set_price(&mut self, price: f64) {
        self.price = price;
    }
}

/// Standard normal variate via the Box-Muller transform.
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    // gen::<f64>() yields [0, 1); flip u1 to (0, 1] so ln() stays finite.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}
