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

mod allocation;
mod dispatch_status;
mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use allocation::{AllocationPlan, AvailabilitySnapshot, aggregate_lines, plan_allocation};
pub use dispatch_status::{DispatchEvent, DispatchStatus};

// Re-export public types
pub use error::DomainError;
pub use types::{
    CapacityResource, DispatchDescription, DispatchId, DispatchLinks, DispatchRequest,
    DispatchRequestStaff, DispatchRequestVehicle, ModelId, ModelQuantity, ResourceRef, StaffId,
    StationId, VehicleId, VehicleLine,
};
pub use validation::{
    validate_distinct_resources, validate_plan_not_empty, validate_staff_count, validate_stations,
    validate_vehicle_lines,
};
