//! The stages of the pipeline, in the order they run.
//!
//! Each stage is a function from one [crate::grid::AngleGrid] to a new one, except equalization which is split into a
//! reduction over the whole grid and a map.
pub mod analyze;
pub mod clamp;
pub mod emphasis;
pub mod equalize;
pub mod rumble;
pub mod synthesize;
pub mod truncate;

pub use analyze::{analyze, ANALYSIS_SIZE};
pub use clamp::clamp;
pub use emphasis::{back_relative, design_emphasis_lowpass, emphasize, EmphasisDesign};
pub use equalize::{equalize, is_preserved_bin, EqualizationFilter};
pub use rumble::{remove_rumble, rumble_filter};
pub use synthesize::synthesize_minimum_phase;
pub use truncate::{truncate, truncate_one};
