//! # spdev-core - Core Domain Types
//!
//! Foundation crate for the Smart Parking dev launcher. Provides the error
//! type, logging setup, and the pure logic the start/stop sequences build on.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (thiserror, regex, tracing).
//!
//! ## Public API
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ### Endpoint Patching (`endpoint`)
//! - [`patch_base_url()`] - Rewrite the host of the mobile app's `baseUrl`
//! - [`PatchOutcome`] - Updated / unchanged / declaration not found
//!
//! ### Addresses (`address`)
//! - [`DetectedAddress`] - Interface, socket, or fallback address
//!
//! ### Process Matching (`process_match`)
//! - [`ProcessMatcher`] - Tagged substring predicate per [`ProcessKind`]
//! - [`ProcessEntry`] - One line of the process listing with its PID

pub mod address;
pub mod endpoint;
pub mod error;
pub mod logging;
pub mod process_match;

/// Prelude for common imports used throughout all spdev crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use address::{DetectedAddress, FALLBACK_HOST};
pub use endpoint::{base_url, current_host, patch_base_url, url_host, PatchOutcome, API_PORT};
pub use error::{Error, Result, ResultExt};
pub use process_match::{
    parse_process_listing, ProcessEntry, ProcessKind, ProcessMatcher, TokenGroup,
};
