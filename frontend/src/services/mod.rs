//! Backend services.
//!
//! # Services
//!
//! - [`segment`] - Image upload to the segmentation endpoint

pub mod segment;

pub use segment::*;
