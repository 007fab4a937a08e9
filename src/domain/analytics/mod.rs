//! Closed-form helpers used to sanity-check values returned by the pricer.

pub mod options;
pub mod rates;

pub use options::{bs_pv, bs_pv_fwd, norm_cdf, svi_vol, svi_w};
pub use rates::flat_forward;
