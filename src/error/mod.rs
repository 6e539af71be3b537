//! Error handling types for miniapp-http.
//!
//! Every failure of a call is surfaced to its caller as an [`HttpError`];
//! nothing here is fatal to the process.

mod conversions;
pub mod types;

pub use types::*;
