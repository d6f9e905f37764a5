//! UI Components for the segmentation page.
//!
//! # Layout Components
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadZone`] - Image picker with drag & drop
//! - [`FileList`] - Selected images awaiting submission
//! - [`Controls`] - Submit / reset buttons and busy indicator
//! - [`NoticeBar`] - Success and error notices
//! - [`ResultsGallery`] - Original vs segmented images

mod hero;
mod upload;
mod file_list;
mod controls;
mod notice;
mod results;
mod footer;

pub use hero::*;
pub use upload::*;
pub use file_list::*;
pub use controls::*;
pub use notice::*;
pub use results::*;
pub use footer::*;
