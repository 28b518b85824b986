//! This module contains algorithms that search for local minima of functions along a single
//! dimension.

mod golden_section;
mod unimodal;

pub use self::golden_section::{GoldenSection, GoldenSectionBuilder, GoldenSectionBuilderError, K};
pub use self::unimodal::unimodal_interval;
