// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! All shapes serialize as camelCase JSON. Identifiers travel as bare
//! integers; statuses travel as their lowercase names.

use fleet_dispatch::{ExpandedDispatch, StaffSummary, StationSummary, VehicleSummary};
use fleet_dispatch_domain::{
    DispatchDescription, ModelId, StaffId, StationId, VehicleId, VehicleLine,
    validate_staff_count, validate_vehicle_lines,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, translate_domain_error};

/// One requested line item: a model and how many vehicles of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLineRequest {
    pub model_id: ModelId,
    /// Unvalidated; must be positive.
    pub number_of_vehicle: i64,
}

impl From<VehicleLineRequest> for VehicleLine {
    fn from(line: VehicleLineRequest) -> Self {
        Self::new(line.model_id, line.number_of_vehicle)
    }
}

/// API request to open a dispatch request.
///
/// The destination is the requesting administrator's own station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDispatchRequest {
    /// Required. Optional in the wire shape so a missing value is reported
    /// as an invalid request rather than a parse failure.
    #[serde(default)]
    pub from_station_id: Option<StationId>,
    #[serde(default)]
    pub vehicles: Vec<VehicleLineRequest>,
    #[serde(default)]
    pub number_of_staff: Option<i64>,
    /// Free-form remark stored in the description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// API response for a successful creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDispatchResponse {
    pub id: i64,
}

/// One `(model, quantity)` pair of a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelQuantityBody {
    pub model_id: ModelId,
    pub quantity: i64,
}

/// Wire form of a dispatch description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionBody {
    #[serde(default)]
    pub vehicles: Vec<ModelQuantityBody>,
    #[serde(default)]
    pub staff_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DescriptionBody {
    /// Validates the body into a domain description.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if a quantity is not positive or the staff
    /// count is negative.
    pub fn into_domain(self) -> Result<DispatchDescription, ApiError> {
        let lines: Vec<VehicleLine> = self
            .vehicles
            .iter()
            .map(|line| VehicleLine::new(line.model_id, line.quantity))
            .collect();
        let vehicles = validate_vehicle_lines(&lines).map_err(translate_domain_error)?;
        let staff_count: u32 =
            validate_staff_count(Some(self.staff_count)).map_err(translate_domain_error)?;
        Ok(DispatchDescription::new(vehicles, staff_count, self.note))
    }
}

impl From<DispatchDescription> for DescriptionBody {
    fn from(description: DispatchDescription) -> Self {
        Self {
            vehicles: description
                .vehicles
                .iter()
                .map(|line| ModelQuantityBody {
                    model_id: line.model_id,
                    quantity: i64::from(line.quantity),
                })
                .collect(),
            staff_count: i64::from(description.staff_count),
            note: description.note,
        }
    }
}

/// API request to re-plan a pending dispatch with explicit resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDispatchRequest {
    /// Must be `pending`.
    pub status: String,
    #[serde(default)]
    pub staff_ids: Vec<StaffId>,
    #[serde(default)]
    pub vehicle_ids: Vec<VehicleId>,
    /// Regenerated from the vehicle models when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<DescriptionBody>,
}

/// API response for a successful update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDispatchResponse {
    /// The dispatch row plus the inserted link rows.
    pub updated: usize,
}

/// API request to approve or reject a pending dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmDispatchRequest {
    /// `approved` or `rejected`.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_station_id: Option<StationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_description: Option<DescriptionBody>,
}

/// Filters for listing dispatches. Unset fields match everything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDispatchesRequest {
    #[serde(default)]
    pub from_station_id: Option<StationId>,
    #[serde(default)]
    pub to_station_id: Option<StationId>,
    #[serde(default)]
    pub status: Option<String>,
}

/// API response for a soft deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDispatchResponse {
    pub id: i64,
    /// True if the dispatch held an active claim that is now released.
    pub released_claims: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationInfo {
    pub id: i64,
    pub name: String,
}

impl From<StationSummary> for StationInfo {
    fn from(station: StationSummary) -> Self {
        Self {
            id: station.station_id.get(),
            name: station.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffInfo {
    pub id: i64,
    pub name: String,
    pub station_id: i64,
}

impl From<StaffSummary> for StaffInfo {
    fn from(staff: StaffSummary) -> Self {
        Self {
            id: staff.staff_id.get(),
            name: staff.name,
            station_id: staff.station_id.get(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    pub id: i64,
    pub license_plate: String,
    pub model_id: i64,
    pub model_name: String,
    pub station_id: i64,
}

impl From<VehicleSummary> for VehicleInfo {
    fn from(vehicle: VehicleSummary) -> Self {
        Self {
            id: vehicle.vehicle_id.get(),
            license_plate: vehicle.license_plate,
            model_id: vehicle.model_id.get(),
            model_name: vehicle.model_name,
            station_id: vehicle.station_id.get(),
        }
    }
}

/// The expanded view of one dispatch, with every reference resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResponse {
    pub id: i64,
    pub status: String,
    pub description: Option<DescriptionBody>,
    pub final_description: Option<DescriptionBody>,
    pub from_station: Option<StationInfo>,
    pub to_station: StationInfo,
    pub request_admin: StaffInfo,
    pub approved_admin: Option<StaffInfo>,
    pub staff: Vec<StaffInfo>,
    pub vehicles: Vec<VehicleInfo>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ExpandedDispatch> for DispatchResponse {
    fn from(view: ExpandedDispatch) -> Self {
        Self {
            id: view.dispatch_id.get(),
            status: view.status.to_string(),
            description: view.description.map(DescriptionBody::from),
            final_description: view.final_description.map(DescriptionBody::from),
            from_station: view.from_station.map(StationInfo::from),
            to_station: view.to_station.into(),
            request_admin: view.request_admin.into(),
            approved_admin: view.approved_admin.map(StaffInfo::from),
            staff: view.staff.into_iter().map(StaffInfo::from).collect(),
            vehicles: view.vehicles.into_iter().map(VehicleInfo::from).collect(),
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}

/// API response for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDispatchesResponse {
    pub dispatches: Vec<DispatchResponse>,
}
