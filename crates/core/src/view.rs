// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read models returned by the store.
//!
//! These are denormalized views: names and plates are resolved so callers
//! never need a second lookup.

use fleet_dispatch_domain::{
    DispatchDescription, DispatchId, DispatchStatus, ModelId, StaffId, StationId, VehicleId,
};

/// A station with its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationSummary {
    pub station_id: StationId,
    pub name: String,
}

/// A staff member with their display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffSummary {
    pub staff_id: StaffId,
    pub name: String,
    /// The station the staff member currently belongs to.
    pub station_id: StationId,
}

/// A vehicle with its plate and model name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleSummary {
    pub vehicle_id: VehicleId,
    pub license_plate: String,
    pub model_id: ModelId,
    pub model_name: String,
    /// The station the vehicle currently belongs to.
    pub station_id: StationId,
}

/// A vehicle that passed an availability check, with its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailableVehicle {
    pub vehicle_id: VehicleId,
    pub model_id: ModelId,
}

/// The fully expanded view of one dispatch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedDispatch {
    pub dispatch_id: DispatchId,
    pub status: DispatchStatus,
    pub description: Option<DispatchDescription>,
    pub final_description: Option<DispatchDescription>,
    pub from_station: Option<StationSummary>,
    pub to_station: StationSummary,
    pub request_admin: StaffSummary,
    pub approved_admin: Option<StaffSummary>,
    /// Linked staff, ascending by id.
    pub staff: Vec<StaffSummary>,
    /// Linked vehicles, ascending by id.
    pub vehicles: Vec<VehicleSummary>,
    pub created_at: String,
    pub updated_at: String,
}

/// Optional filters for listing dispatch requests. Unset fields match
/// everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchFilter {
    pub from_station_id: Option<StationId>,
    pub to_station_id: Option<StationId>,
    pub status: Option<DispatchStatus>,
}

impl DispatchFilter {
    #[must_use]
    pub const fn new(
        from_station_id: Option<StationId>,
        to_station_id: Option<StationId>,
        status: Option<DispatchStatus>,
    ) -> Self {
        Self {
            from_station_id,
            to_station_id,
            status,
        }
    }
}
