// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{ModelQuantity, ResourceRef, StaffId, StationId, VehicleId, VehicleLine};
use std::collections::HashSet;

/// Validates requested vehicle lines and converts them to unsigned quantities.
///
/// # Arguments
///
/// * `lines` - The raw lines as received from the caller
///
/// # Returns
///
/// * `Ok(Vec<ModelQuantity>)` in the original order
/// * `Err(DomainError::InvalidRequest)` on the first non-positive or
///   out-of-range quantity
///
/// # Errors
///
/// Returns an error if any quantity is zero, negative or does not fit a `u32`.
pub fn validate_vehicle_lines(lines: &[VehicleLine]) -> Result<Vec<ModelQuantity>, DomainError> {
    lines
        .iter()
        .map(|line| {
            if line.quantity <= 0 {
                return Err(DomainError::InvalidRequest {
                    field: String::from("vehicles.numberOfVehicle"),
                    reason: format!(
                        "quantity for {} must be positive, got {}",
                        line.model_id, line.quantity
                    ),
                });
            }
            let quantity: u32 =
                u32::try_from(line.quantity).map_err(|_| DomainError::InvalidRequest {
                    field: String::from("vehicles.numberOfVehicle"),
                    reason: format!("quantity for {} is too large", line.model_id),
                })?;
            Ok(ModelQuantity {
                model_id: line.model_id,
                quantity,
            })
        })
        .collect()
}

/// Validates the optional staff headcount. A missing count means no staff.
///
/// # Errors
///
/// Returns `DomainError::InvalidRequest` if the count is negative or does not
/// fit a `u32`.
pub fn validate_staff_count(staff_count: Option<i64>) -> Result<u32, DomainError> {
    let Some(count) = staff_count else {
        return Ok(0);
    };
    u32::try_from(count).map_err(|_| DomainError::InvalidRequest {
        field: String::from("numberOfStaff"),
        reason: format!("staff count must be between 0 and {}, got {count}", u32::MAX),
    })
}

/// Validates that a request asks for at least one resource.
///
/// # Errors
///
/// Returns `DomainError::InvalidRequest` if there are no vehicle lines and no
/// staff.
pub fn validate_plan_not_empty(lines: &[ModelQuantity], staff_count: u32) -> Result<(), DomainError> {
    if lines.is_empty() && staff_count == 0 {
        return Err(DomainError::InvalidRequest {
            field: String::from("vehicles"),
            reason: String::from("a dispatch must request at least one vehicle or staff member"),
        });
    }
    Ok(())
}

/// Validates the source/destination pair.
///
/// # Errors
///
/// Returns `DomainError::SameStation` if both are set and equal.
pub fn validate_stations(
    from_station_id: Option<StationId>,
    to_station_id: StationId,
) -> Result<(), DomainError> {
    match from_station_id {
        Some(from) if from == to_station_id => Err(DomainError::SameStation(from)),
        _ => Ok(()),
    }
}

/// Validates that explicit staff and vehicle id lists contain no duplicates.
///
/// # Errors
///
/// Returns `DomainError::DuplicateResource` naming the first repeated id.
pub fn validate_distinct_resources(
    staff_ids: &[StaffId],
    vehicle_ids: &[VehicleId],
) -> Result<(), DomainError> {
    let mut seen_staff: HashSet<StaffId> = HashSet::with_capacity(staff_ids.len());
    for &staff_id in staff_ids {
        if !seen_staff.insert(staff_id) {
            return Err(DomainError::DuplicateResource(ResourceRef::Staff(staff_id)));
        }
    }

    let mut seen_vehicles: HashSet<VehicleId> = HashSet::with_capacity(vehicle_ids.len());
    for &vehicle_id in vehicle_ids {
        if !seen_vehicles.insert(vehicle_id) {
            return Err(DomainError::DuplicateResource(ResourceRef::Vehicle(
                vehicle_id,
            )));
        }
    }

    Ok(())
}
