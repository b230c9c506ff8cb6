//! Renormalized pomeron flux integrals.
//!
//! Both diffractive models normalize the pomeron flux to at most one
//! pomeron per collision and then integrate the renormalized flux over
//! the allowed rapidity-gap (double diffraction) or xi (single
//! diffraction) domain. Integration is a fixed-step trapezoid rule.

use std::f64::consts::PI;

use mbr_core::constants::GEV2_TO_MB;

use crate::config::ReggeParameters;

/// Trapezoid steps used for every flux integral.
pub const FLUX_STEPS: usize = 1_000_000;

/// Lower gap edge of the double-diffractive flux normalization.
const DD_NORMALIZATION_GAP_MIN: f64 = 2.3;

/// Upper xi edge of the single-diffractive flux normalization.
const SD_NORMALIZATION_XI_MAX: f64 = 0.1;

/// Pomeron-proton coupling fit of the single-diffractive flux, mb^1/2.
const SD_COUPLING: f64 = 6.566;

/// Two-exponential proton form factor fit `a1 e^{b1 t} + a2 e^{b2 t}`.
const SD_FORM_FACTOR: [(f64, f64); 2] = [(0.9, 4.6), (0.1, 0.6)];

/// Below this gap the closed form loses precision and a series is used.
const SMALL_GAP: f64 = 0.01;

/// Result of a trapezoid integration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quadrature {
    /// Integral estimate.
    pub integral: f64,
    /// Largest integrand value over the interior grid points.
    pub interior_max: f64,
}

/// Integrate `f` over `[lo, hi]` with `steps` trapezoids.
pub fn trapezoid(lo: f64, hi: f64, steps: usize, f: impl Fn(f64) -> f64) -> Quadrature {
    let steps = steps.max(1);
    let h = (hi - lo) / steps as f64;
    let mut sum = 0.5 * (f(lo) + f(hi));
    let mut interior_max = 0.0f64;
    for i in 1..steps {
        let v = f(lo + i as f64 * h);
        sum += v;
        interior_max = interior_max.max(v);
    }
    Quadrature {
        integral: sum * h,
        interior_max,
    }
}

// ── Double diffraction ─────────────────────────────────────────────

/// Gap-width density of double diffraction, up to normalization.
///
/// `exponent` multiplies the gap in the Regge growth factor `e^{k dy}`:
/// the flux normalization uses `2 epsilon`, the cross section and the
/// sampler use `epsilon`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GapDensity {
    /// `ln(s / mass_min^4)`, the largest allowed gap.
    pub log_range: f64,
    /// Pomeron slope alpha'.
    pub alpha_prime: f64,
    /// Growth exponent per unit gap.
    pub exponent: f64,
}

impl GapDensity {
    /// Evaluate at gap width `dy`.
    pub fn eval(&self, dy: f64) -> f64 {
        let a = self.alpha_prime;
        let growth = (self.exponent * dy).exp();
        let bracket = (-2.0 * a * dy * (-dy).exp()).exp() - (-2.0 * a * dy * dy.exp()).exp();
        if dy > SMALL_GAP {
            (self.log_range - dy) * growth * bracket / dy
        } else {
            let series = dy * 4.0 * a - dy * dy * 8.0 * a * a
                + dy.powi(3) * (2.0 * a / 3.0 + 8.0 * a * a * a);
            self.log_range * growth * series - growth * bracket
        }
    }
}

/// Double-diffractive flux integrals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoubleDiffractiveFlux {
    /// Flux normalization, clamped to at least one.
    pub normalization: f64,
    /// Renormalized double-diffractive cross section, mb.
    pub sigma: f64,
    /// Largest gap density on the integration grid; the sampler's envelope.
    pub density_max: f64,
}

/// Integrate the double-diffractive flux for `s` and mass floor `mass_min`.
pub fn double_diffractive_flux(s: f64, mass_min: f64, gap_min: f64, regge: &ReggeParameters) -> DoubleDiffractiveFlux {
    let sigma0 = regge.sigma_pomeron_proton;
    let alpha = regge.alpha_prime;
    let eps = regge.epsilon;
    let c0 = sigma0 * sigma0 / (16.0 * PI * GEV2_TO_MB);
    let log_range = (s / mass_min.powi(4)).ln();

    let normalizing = GapDensity {
        log_range,
        alpha_prime: alpha,
        exponent: 2.0 * eps,
    };
    let c1 = c0 / (2.0 * alpha * sigma0);
    let flux = trapezoid(DD_NORMALIZATION_GAP_MIN, log_range, FLUX_STEPS, |dy| {
        c1 * normalizing.eval(dy)
    });
    let normalization = flux.integral.max(1.0);

    let density = GapDensity {
        log_range,
        alpha_prime: alpha,
        exponent: eps,
    };
    let c1 = c0 * s.powf(eps) / (2.0 * alpha);
    let q = trapezoid(gap_min, log_range, FLUX_STEPS, |dy| density.eval(dy));
    DoubleDiffractiveFlux {
        normalization,
        sigma: c1 * q.integral / normalization,
        density_max: q.interior_max,
    }
}

// ── Single diffraction ─────────────────────────────────────────────

/// Single-diffractive flux integrals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SingleDiffractiveFlux {
    /// Flux normalization, clamped to at least one.
    pub normalization: f64,
    /// Renormalized single-diffractive cross section (both sides), mb.
    pub sigma: f64,
}

/// Flux integrand in the variable `x = eps (ln(1/xi) + b1 / (2 alpha'))`.
fn sd_integrand(x: f64, growth: f64, regge: &ReggeParameters) -> f64 {
    let [(a1, b1), (a2, b2)] = SD_FORM_FACTOR;
    let shift = regge.epsilon * (b1 - b2) / (2.0 * regge.alpha_prime);
    (growth * x).exp() * (a1 / x + a2 / (x - shift))
}

/// Integrate the single-diffractive flux over `[xi_min, xi_max]`.
pub fn single_diffractive_flux(s: f64, xi_min: f64, xi_max: f64, regge: &ReggeParameters) -> SingleDiffractiveFlux {
    let eps = regge.epsilon;
    let alpha = regge.alpha_prime;
    let b1 = SD_FORM_FACTOR[0].1;
    let c0 = SD_COUPLING * SD_COUPLING / (16.0 * PI);
    let to_x = |xi: f64| eps * (-xi.ln() + b1 / (2.0 * alpha));

    let x_upper = to_x(xi_min);
    let c1 = c0 / (2.0 * alpha) * (-eps * b1 / alpha).exp();
    let flux = trapezoid(to_x(SD_NORMALIZATION_XI_MAX), x_upper, FLUX_STEPS, |x| {
        c1 * sd_integrand(x, 2.0, regge)
    });
    let normalization = flux.integral.max(1.0);

    let c1 = c0 * regge.sigma_pomeron_proton / (2.0 * alpha)
        * (-eps * b1 / (2.0 * alpha)).exp()
        * s.powf(eps)
        / normalization;
    let q = trapezoid(to_x(xi_max), x_upper, FLUX_STEPS, |x| sd_integrand(x, 1.0, regge));
    SingleDiffractiveFlux {
        normalization,
        sigma: 2.0 * c1 * q.integral,
    }
}
