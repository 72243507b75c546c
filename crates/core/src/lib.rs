// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod oracle;
mod state;
mod store;
mod sync;
mod view;

#[cfg(test)]
mod tests;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// Re-export public types and functions
pub use apply::{apply, apply_create};
pub use command::{Command, CreateDispatch};
pub use error::CoreError;
pub use oracle::CapacityOracle;
pub use state::{SideEffect, TransitionResult, dispatch_snapshot};
pub use store::{DispatchStore, UnitOfWork};
pub use sync::{EffectOutcome, replace_relations, run_effects};
pub use view::{
    AvailableVehicle, DispatchFilter, ExpandedDispatch, StaffSummary, StationSummary,
    VehicleSummary,
};

/// Returns the current UTC time as an RFC 3339 string.
///
/// # Errors
///
/// Returns `CoreError::Timestamp` if the time cannot be formatted.
pub fn current_timestamp() -> Result<String, CoreError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| CoreError::Timestamp(e.to_string()))
}
