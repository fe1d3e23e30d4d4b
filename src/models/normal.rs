//! Standard normal CDF via a truncated alternating power series.
//!
//! Phi(z) = 0.5 + phi(0) * (z - z^3/6 + z^5/40 - ...)
//!
//! The series alternates sign, so consecutive elements are folded into one
//! term per loop iteration to cancel leading floating-point error, and the
//! terms are accumulated smallest-magnitude first before the final sum.

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Number of folded term pairs. Covers series indices 0..100, which is enough
/// for full precision anywhere the series is used (|z| <= 6).
const PAIRS: usize = 50;

/// Cumulative distribution function of the standard normal.
/// Returns a value in [0, 1]; `std_normal_cdf(0.0)` is exactly 0.5.
pub fn std_normal_cdf(z: f64) -> f64 {
    // The power series is not stable in the extreme tails, but the true CDF
    // is within 1e-9 of the bound there anyway.
    if z < -6.0 {
        return 0.0;
    }
    if z > 6.0 {
        return 1.0;
    }

    let z2 = z * z;
    let z4 = z2 * z2;

    let mut m = 1.0; // 2^k / k!
    let mut b = z; // z^(2k + 1)
    let mut terms = [0.0_f64; PAIRS];

    for (i, slot) in terms.iter_mut().enumerate() {
        let k = (2 * i) as f64;
        let a = 2.0 * k + 1.0;
        // Fold series elements k and k+1 into a single term.
        let mut item = b / (a * m);
        item *= 1.0 - (a * z2) / ((a + 1.0) * (a + 2.0));
        *slot = item;
        m *= 4.0 * (k + 1.0) * (k + 2.0);
        b *= z4;
    }

    // Accumulate from the smallest terms up to minimize rounding error.
    let total: f64 = terms.iter().rev().sum();

    0.5 + FRAC_1_SQRT_2PI * total
}

/// CDF of a normal with mean `mu` and standard deviation `sigma`.
/// `sigma` must be positive; that is the caller's contract.
pub fn normal_cdf(x: f64, mu: f64, sigma: f64) -> f64 {
    std_normal_cdf((x - mu) / sigma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::distribution::{ContinuousCDF, Normal};

    #[test]
    fn test_cdf_at_zero_is_half() {
        assert!((std_normal_cdf(0.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_tail_saturation() {
        assert_eq!(std_normal_cdf(-6.0001), 0.0);
        assert_eq!(std_normal_cdf(6.0001), 1.0);
        assert_eq!(std_normal_cdf(-100.0), 0.0);
        assert_eq!(std_normal_cdf(100.0), 1.0);
    }

    #[test]
    fn test_symmetry() {
        for z in [0.1, 0.5, 1.0, 1.96, 2.5, 3.7, 5.0, 5.9] {
            let lo = std_normal_cdf(-z);
            let hi = std_normal_cdf(z);
            assert!(
                (lo + hi - 1.0).abs() < 1e-12,
                "cdf(-{z}) + cdf({z}) = {} should be 1",
                lo + hi
            );
        }
    }

    #[test]
    fn test_monotone_non_decreasing() {
        let mut prev = 0.0;
        let mut z = -6.5;
        while z <= 6.5 {
            let p = std_normal_cdf(z);
            assert!(p >= prev, "cdf not monotone at z={z}: {p} < {prev}");
            assert!((0.0..=1.0).contains(&p), "cdf({z}) = {p} out of [0,1]");
            prev = p;
            z += 0.05;
        }
    }

    #[test]
    fn test_matches_reference_distribution() {
        let reference = Normal::new(0.0, 1.0).unwrap();
        let mut z = -6.0;
        while z <= 6.0 {
            let ours = std_normal_cdf(z);
            let theirs = reference.cdf(z);
            assert!(
                (ours - theirs).abs() < 1e-7,
                "cdf({z}) = {ours}, reference = {theirs}"
            );
            z += 0.125;
        }
    }

    #[test]
    fn test_known_values() {
        // Phi(1.96) ~ 0.975, the familiar 95% two-sided quantile.
        assert!((std_normal_cdf(1.96) - 0.975_002_1).abs() < 1e-6);
        assert!((std_normal_cdf(-1.0) - 0.158_655_3).abs() < 1e-6);
    }

    #[test]
    fn test_normal_wrapper_standardizes() {
        assert!((normal_cdf(110.0, 100.0, 10.0) - std_normal_cdf(1.0)).abs() < 1e-15);
        assert!((normal_cdf(100.0, 100.0, 7.3) - 0.5).abs() < 1e-12);
    }
}
