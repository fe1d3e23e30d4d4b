use crate::errors::{GameError, GameResult};
use crate::models::normal::std_normal_cdf;
use crate::models::OptionKind;

/// Black-Scholes price of a European option.
///
/// call = S*Phi(d1) - K*e^(-rT)*Phi(d2)
/// put  = K*e^(-rT)*Phi(-d2) - S*Phi(-d1)
///
/// where d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma*sqrt(T))
/// and d2 = d1 - sigma*sqrt(T).
///
/// T <= 0 takes the intrinsic-value path; this is also how settlement at
/// expiry is computed. Pure function, never returns NaN: non-positive spot,
/// strike, or volatility is rejected up front.
pub fn black_scholes(
    s: f64,
    k: f64,
    t: f64,
    r: f64,
    sigma: f64,
    kind: OptionKind,
) -> GameResult<f64> {
    if !s.is_finite() || s <= 0.0 {
        return Err(GameError::InvalidParam(format!("spot must be > 0, got {s}")));
    }
    if !k.is_finite() || k <= 0.0 {
        return Err(GameError::InvalidParam(format!(
            "strike must be > 0, got {k}"
        )));
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(GameError::InvalidParam(format!(
            "sigma must be > 0, got {sigma}"
        )));
    }

    // Expired: the option is worth exactly its intrinsic value.
    if t <= 0.0 {
        return Ok(intrinsic_value(s, k, kind));
    }

    let sigma_sqrt_t = sigma * t.sqrt();
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / sigma_sqrt_t;
    let d2 = d1 - sigma_sqrt_t;
    let discount = (-r * t).exp();

    let price = match kind {
        OptionKind::Call => s * std_normal_cdf(d1) - k * discount * std_normal_cdf(d2),
        OptionKind::Put => k * discount * std_normal_cdf(-d2) - s * std_normal_cdf(-d1),
    };

    // The formula can dip a hair below zero from rounding in the tails.
    Ok(price.max(0.0))
}

/// Payoff of an option exercised right now.
pub fn intrinsic_value(s: f64, k: f64, kind: OptionKind) -> f64 {
    match kind {
        OptionKind::Call => (s - k).max(0.0),
        OptionKind::Put => (k - s).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_option_is_intrinsic() {
        let call = black_scholes(105.0, 100.0, 0.0, 0.05, 2.0, OptionKind::Call).unwrap();
        assert_eq!(call, 5.0);
        let put = black_scholes(105.0, 100.0, 0.0, 0.05, 2.0, OptionKind::Put).unwrap();
        assert_eq!(put, 0.0);
        let otm_call = black_scholes(95.0, 100.0, -1.0, 0.05, 2.0, OptionKind::Call).unwrap();
        assert_eq!(otm_call, 0.0);
        let itm_put = black_scholes(95.0, 100.0, 0.0, 0.05, 2.0, OptionKind::Put).unwrap();
        assert_eq!(itm_put, 5.0);
    }

    #[test]
    fn test_put_call_parity() {
        // call - put == S - K*e^(-rT)
        for (s, k, t) in [
            (100.0, 100.0, 0.5),
            (101.2, 95.0, 0.25),
            (80.0, 110.0, 1.0),
            (100.0, 105.0, 3600.0 / 31_536_000.0),
        ] {
            let r = 0.05;
            let sigma = 2.0;
            let call = black_scholes(s, k, t, r, sigma, OptionKind::Call).unwrap();
            let put = black_scholes(s, k, t, r, sigma, OptionKind::Put).unwrap();
            let forward = s - k * (-r * t).exp();
            assert!(
                (call - put - forward).abs() < 1e-9,
                "parity violated at S={s} K={k} T={t}: {} vs {forward}",
                call - put
            );
        }
    }

    #[test]
    fn test_prices_are_non_negative() {
        let deep_otm = black_scholes(100.0, 150.0, 0.001, 0.05, 0.1, OptionKind::Call).unwrap();
        assert!(deep_otm >= 0.0);
        let deep_itm = black_scholes(100.0, 50.0, 0.5, 0.05, 2.0, OptionKind::Call).unwrap();
        // ITM call is worth at least its discounted intrinsic.
        assert!(deep_itm > 50.0);
    }

    #[test]
    fn test_more_time_is_worth_more() {
        let short = black_scholes(100.0, 100.0, 0.1, 0.05, 2.0, OptionKind::Call).unwrap();
        let long = black_scholes(100.0, 100.0, 0.5, 0.05, 2.0, OptionKind::Call).unwrap();
        assert!(long > short, "ATM call: T=0.5 ({long}) <= T=0.1 ({short})");
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(black_scholes(0.0, 100.0, 0.5, 0.05, 2.0, OptionKind::Call).is_err());
        assert!(black_scholes(-5.0, 100.0, 0.5, 0.05, 2.0, OptionKind::Call).is_err());
        assert!(black_scholes(100.0, 0.0, 0.5, 0.05, 2.0, OptionKind::Put).is_err());
        assert!(black_scholes(100.0, 100.0, 0.5, 0.05, 0.0, OptionKind::Call).is_err());
        assert!(black_scholes(f64::NAN, 100.0, 0.5, 0.05, 2.0, OptionKind::Call).is_err());
    }
}
