use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Black-76 forward PV.
///
/// `kind` is +1 for a call and -1 for a put.
pub fn bs_pv_fwd(forward: f64, sigma: f64, strike: f64, t: f64, kind: f64) -> f64 {
    let f = (forward / strike).ln();
    let sigma_sq_t = sigma * t.sqrt();
    let dp = f / sigma_sq_t + sigma_sq_t / 2.0;
    let dn = f / sigma_sq_t - sigma_sq_t / 2.0;
    kind * (forward * norm_cdf(kind * dp) - strike * norm_cdf(kind * dn))
}

/// Black-Scholes present value with separate discounting (`r`) and projection (`p`) rates
pub fn bs_pv(spot: f64, sigma: f64, r: f64, p: f64, strike: f64, t: f64, kind: f64) -> f64 {
    let forward = (p * t).exp() * spot;
    let discount = (-r * t).exp();
    discount * bs_pv_fwd(forward, sigma, strike, t, kind)
}

/// SVI total variance (vol² · t) at log-moneyness `k`
pub fn svi_w(k: f64, a: f64, b: f64, rho: f64, m: f64, s: f64) -> f64 {
    a + b * (rho * (k - m) + ((k - m).powi(2) + s * s).sqrt())
}

/// SVI implied volatility at log-moneyness `k` for expiry `t`
pub fn svi_vol(k: f64, t: f64, a: f64, b: f64, rho: f64, m: f64, s: f64) -> f64 {
    (svi_w(k, a, b, rho, m, s) / t).sqrt()
}
