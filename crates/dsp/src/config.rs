/// The sample rate every dataset is measured and processed at.
///
/// Recordings at any other rate are rejected rather than resampled.  The analysis transform is also this long, which
/// makes each FFT bin exactly 1 Hz wide.
pub const SR: u32 = 44100;

/// Half of [SR].
pub const NYQUIST: u32 = SR / 2;
