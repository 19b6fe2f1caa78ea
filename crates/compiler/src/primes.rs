//! The table of primes shipped alongside the dataset.
//!
//! The runtime rounds delay line lengths to primes and looks them up here rather than computing them.
use ::primes::{PrimeSet, Sieve};

/// The table reaches one prime past this.
pub const PRIME_LIMIT: u32 = hrtf_dsp::SR * 5;

/// Every prime up to and including the first one greater than `limit`.
///
/// Stops early at the largest prime which fits in a `u32`.
pub fn prime_table(limit: u32) -> Vec<u32> {
    let mut table = vec![];
    let mut sieve = Sieve::new();
    for p in sieve.iter() {
        let Ok(p) = u32::try_from(p) else {
            break;
        };
        table.push(p);
        if p > limit {
            break;
        }
    }

    log::debug!(
        "Generated {} primes up to {}",
        table.len(),
        table.last().copied().unwrap_or_default()
    );
    table
}
