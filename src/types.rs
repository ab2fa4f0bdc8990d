// src/types.rs
// Type aliases shared across the preparation and rendering pipeline.

use std::error::Error;
use std::ops::Range;

pub type PlotResult<T> = Result<T, Box<dyn Error>>;

// A rendered page: tightly packed RGB pixel data.
pub type PageBuffer = Vec<u8>;

// (x, lower, center, upper) of one vertical error bar.
pub type ErrorBarPoint = (f64, f64, f64, f64);

pub type AxisRange = Range<f64>;
