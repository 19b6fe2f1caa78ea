//! Window functions.
use std::f64::consts::PI;

const BLACKMAN_HARRIS: [f64; 4] = [0.35875, 0.48829, 0.14128, 0.01168];

/// A symmetric 4-term Blackman-Harris window of the given length.
pub fn blackman_harris(len: usize) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }

    let denom = (len - 1) as f64;
    (0..len)
        .map(|i| {
            let x = 2.0 * PI * i as f64 / denom;
            BLACKMAN_HARRIS[0] - BLACKMAN_HARRIS[1] * x.cos() + BLACKMAN_HARRIS[2] * (2.0 * x).cos()
                - BLACKMAN_HARRIS[3] * (3.0 * x).cos()
        })
        .collect()
}

/// The trailing `len` points of a Blackman-Harris window of length `2 * len - 1`: from the peak down to the tail.
///
/// The first coefficient is the window's peak, which is 1.0 up to rounding; it is pinned to exactly 1.0 so that tapering
/// with this never touches the first sample.
pub fn blackman_harris_tail(len: usize) -> Vec<f64> {
    if len == 0 {
        return vec![];
    }

    let full = blackman_harris(2 * len - 1);
    let mut tail = full[len - 1..].to_vec();
    tail[0] = 1.0;
    tail
}
