//! Butterworth filter design.
//!
//! Designs come out as [BiquadCascade]s: one Audio EQ section per conjugate pole pair, plus a first-order section when
//! the order is odd.  Every section is prewarped to the same cutoff, which makes the cascade the bilinear transform of
//! the analog Butterworth prototype.
//!
//! [design_lowpass] additionally does order selection: given a passband edge which may lose at most `gpass` dB and a
//! stopband edge which must lose at least `gstop` dB, it picks the smallest order that meets both, then places the
//! cutoff so that the passband edge loses exactly `gpass`.
use std::f64::consts::PI;

use crate::biquad::{prewarp, AudioEqAlpha, BiquadCascade, BiquadFilterDef};
use crate::config::*;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum DesignError {
    #[error("Passband edge {passband} Hz must be below the stopband edge {stopband} Hz, and both must be in (0, {max}]", max = NYQUIST)]
    BadEdges { passband: f64, stopband: f64 },

    #[error("Passband loss {gpass} dB and stopband attenuation {gstop} dB must both be positive")]
    BadLosses { gpass: f64, gstop: f64 },

    #[error("Filter order must be at least 1")]
    ZeroOrder,

    #[error("Cutoff {0} Hz must be in (0, {max})", max = NYQUIST)]
    BadCutoff(f64),
}

/// The result of [design_lowpass].
#[derive(Debug, Clone, PartialEq)]
pub struct ButterworthDesign {
    pub order: u32,

    /// The -3 dB point of the designed filter.
    pub cutoff: f64,

    pub filter: BiquadCascade,
}

/// `Q` of each conjugate pole pair of an analog Butterworth prototype of the given order.
fn pair_qs(order: u32) -> impl Iterator<Item = f64> {
    (0..order / 2).map(move |k| {
        let theta = PI * (2 * k + 1) as f64 / (2 * order) as f64;
        1.0 / (2.0 * theta.sin())
    })
}

fn check_cutoff(order: u32, cutoff: f64) -> Result<(), DesignError> {
    if order == 0 {
        return Err(DesignError::ZeroOrder);
    }

    if !(cutoff > 0.0 && cutoff < NYQUIST as f64) {
        return Err(DesignError::BadCutoff(cutoff));
    }

    Ok(())
}

/// A Butterworth lowpass of the given order with its -3 dB point at `cutoff` Hz.
pub fn lowpass(order: u32, cutoff: f64) -> Result<BiquadCascade, DesignError> {
    check_cutoff(order, cutoff)?;

    let mut sections = pair_qs(order)
        .map(|q| BiquadFilterDef::audio_eq_lowpass(cutoff, AudioEqAlpha::Q(q)))
        .collect::<Vec<_>>();
    if order % 2 == 1 {
        sections.push(BiquadFilterDef::first_order_lowpass(cutoff));
    }

    Ok(BiquadCascade::new(sections))
}

/// A Butterworth highpass of the given order with its -3 dB point at `cutoff` Hz.
pub fn highpass(order: u32, cutoff: f64) -> Result<BiquadCascade, DesignError> {
    check_cutoff(order, cutoff)?;

    let mut sections = pair_qs(order)
        .map(|q| BiquadFilterDef::audio_eq_highpass(cutoff, AudioEqAlpha::Q(q)))
        .collect::<Vec<_>>();
    if order % 2 == 1 {
        sections.push(BiquadFilterDef::first_order_highpass(cutoff));
    }

    Ok(BiquadCascade::new(sections))
}

/// Design the lowest-order Butterworth lowpass meeting passband and stopband requirements.
///
/// `passband` and `stopband` are edges in Hz. `gpass` is the most the passband edge may lose and `gstop` the least the
/// stopband edge must lose, both as positive dB.  The stopband edge may be exactly Nyquist; the prewarped edge is then
/// very large but finite and the order comes out as 1 for any modest attenuation.
///
/// When `gstop <= gpass` the formula asks for order 0, which isn't a filter; we use order 1 instead.
pub fn design_lowpass(
    passband: f64,
    stopband: f64,
    gpass: f64,
    gstop: f64,
) -> Result<ButterworthDesign, DesignError> {
    let nyquist = NYQUIST as f64;
    if !(passband > 0.0 && passband < stopband && stopband <= nyquist) {
        return Err(DesignError::BadEdges { passband, stopband });
    }

    if !(gpass > 0.0 && gstop > 0.0) {
        return Err(DesignError::BadLosses { gpass, gstop });
    }

    let passb = prewarp(passband);
    let stopb = prewarp(stopband);
    let natural = stopb / passb;

    let gpass_lin = 10.0f64.powf(0.1 * gpass);
    let gstop_lin = 10.0f64.powf(0.1 * gstop);
    let ord = ((gstop_lin - 1.0) / (gpass_lin - 1.0)).log10() / (2.0 * natural.log10());
    let order = (ord.ceil() as u32).max(1);

    // Place the cutoff such that the passband edge is attenuated by exactly gpass.
    let w0 = (gpass_lin - 1.0).powf(-1.0 / (2.0 * order as f64));
    let cutoff = (w0 * passb).atan() * SR as f64 / PI;
    let filter = lowpass(order, cutoff)?;

    Ok(ButterworthDesign {
        order,
        cutoff,
        filter,
    })
}
