// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::dispatch_status::DispatchStatus;
use serde::{Deserialize, Serialize};

/// Declares a transparent identifier newtype over a database row id.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw row id.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw row id.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} {}", $label, self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

entity_id!(
    /// Identifier of a dispatch request.
    DispatchId,
    "dispatch"
);
entity_id!(
    /// Identifier of a station.
    StationId,
    "station"
);
entity_id!(
    /// Identifier of a vehicle model.
    ModelId,
    "model"
);
entity_id!(
    /// Identifier of a single vehicle.
    VehicleId,
    "vehicle"
);
entity_id!(
    /// Identifier of a staff member. Administrators are staff too.
    StaffId,
    "staff"
);

/// A single requested line item as received from a caller.
///
/// The quantity is signed because it arrives unvalidated; see
/// [`crate::validate_vehicle_lines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleLine {
    pub model_id: ModelId,
    pub quantity: i64,
}

impl VehicleLine {
    #[must_use]
    pub const fn new(model_id: ModelId, quantity: i64) -> Self {
        Self { model_id, quantity }
    }
}

/// A validated `(model, quantity)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelQuantity {
    pub model_id: ModelId,
    pub quantity: u32,
}

/// The structured note attached to a dispatch request.
///
/// Used both for the requested allocation (`description`) and for the
/// approved allocation (`final_description`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DispatchDescription {
    /// Vehicles per model.
    pub vehicles: Vec<ModelQuantity>,
    /// Number of staff members.
    pub staff_count: u32,
    /// Optional free-form remark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DispatchDescription {
    #[must_use]
    pub const fn new(vehicles: Vec<ModelQuantity>, staff_count: u32, note: Option<String>) -> Self {
        Self {
            vehicles,
            staff_count,
            note,
        }
    }

    /// Builds a description from the models of a concrete vehicle list.
    ///
    /// Vehicles are counted per model, models in first-appearance order.
    #[must_use]
    pub fn from_models(models: &[ModelId], staff_count: u32, note: Option<String>) -> Self {
        let mut vehicles: Vec<ModelQuantity> = Vec::new();
        for &model_id in models {
            match vehicles.iter_mut().find(|line| line.model_id == model_id) {
                Some(line) => line.quantity = line.quantity.saturating_add(1),
                None => vehicles.push(ModelQuantity {
                    model_id,
                    quantity: 1,
                }),
            }
        }
        Self::new(vehicles, staff_count, note)
    }

    /// Total number of vehicles across all models.
    #[must_use]
    pub fn total_vehicles(&self) -> u32 {
        self.vehicles
            .iter()
            .fold(0_u32, |acc, line| acc.saturating_add(line.quantity))
    }
}

/// The dispatch request aggregate.
///
/// Link rows (staff and vehicles) are owned by the aggregate but are loaded
/// separately; see `DispatchLinks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    /// `None` until the request has been persisted.
    pub dispatch_id: Option<DispatchId>,
    pub description: Option<DispatchDescription>,
    /// Present only once the request has been approved.
    pub final_description: Option<DispatchDescription>,
    pub status: DispatchStatus,
    pub from_station_id: Option<StationId>,
    pub to_station_id: StationId,
    pub request_admin_id: StaffId,
    pub approved_admin_id: Option<StaffId>,
    /// RFC 3339, UTC.
    pub created_at: String,
    /// RFC 3339, UTC.
    pub updated_at: String,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<String>,
}

impl DispatchRequest {
    /// Returns true while the request holds an active claim on its linked
    /// staff and vehicles.
    #[must_use]
    pub const fn is_active_claim(&self) -> bool {
        matches!(self.status, DispatchStatus::Pending) && self.deleted_at.is_none()
    }

    /// Returns true if the request has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Join record linking a staff member to a dispatch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatchRequestStaff {
    pub dispatch_id: DispatchId,
    pub staff_id: StaffId,
}

/// Join record linking a vehicle to a dispatch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatchRequestVehicle {
    pub dispatch_id: DispatchId,
    pub vehicle_id: VehicleId,
}

/// The full set of links currently held by one dispatch request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchLinks {
    pub staff: Vec<StaffId>,
    pub vehicles: Vec<VehicleId>,
}

impl DispatchLinks {
    #[must_use]
    pub const fn new(staff: Vec<StaffId>, vehicles: Vec<VehicleId>) -> Self {
        Self { staff, vehicles }
    }

    /// Builds the join rows for the given dispatch.
    #[must_use]
    pub fn staff_rows(&self, dispatch_id: DispatchId) -> Vec<DispatchRequestStaff> {
        self.staff
            .iter()
            .map(|&staff_id| DispatchRequestStaff {
                dispatch_id,
                staff_id,
            })
            .collect()
    }

    /// Builds the join rows for the given dispatch.
    #[must_use]
    pub fn vehicle_rows(&self, dispatch_id: DispatchId) -> Vec<DispatchRequestVehicle> {
        self.vehicles
            .iter()
            .map(|&vehicle_id| DispatchRequestVehicle {
                dispatch_id,
                vehicle_id,
            })
            .collect()
    }

    /// Total number of link rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.staff.len() + self.vehicles.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.staff.is_empty() && self.vehicles.is_empty()
    }
}

/// A specific staff member or vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    Vehicle(VehicleId),
    Staff(StaffId),
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vehicle(id) => write!(f, "{id}"),
            Self::Staff(id) => write!(f, "{id}"),
        }
    }
}

/// A countable resource pool at a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapacityResource {
    /// Vehicles of one model.
    VehicleModel(ModelId),
    /// Free staff members.
    Staff,
}

impl std::fmt::Display for CapacityResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VehicleModel(model_id) => write!(f, "vehicles of {model_id}"),
            Self::Staff => write!(f, "staff"),
        }
    }
}
