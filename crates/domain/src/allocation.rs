// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Deterministic allocation of concrete vehicles and staff.
//!
//! The planner turns a requested set of `(model, quantity)` lines and a staff
//! headcount into concrete vehicle and staff ids, working purely over an
//! [`AvailabilitySnapshot`] taken inside the caller's transaction.
//!
//! ## Selection Rules
//!
//! 1. Duplicate model lines are summed; models keep their first-appearance order
//! 2. For each model, the lowest vehicle ids are chosen first
//! 3. Staff are checked after every vehicle line, lowest ids first
//!
//! ## Invariants
//!
//! - Allocation is all-or-nothing: the first unsatisfiable line fails the whole plan
//! - The same snapshot and the same input always produce the same plan

use std::collections::BTreeMap;

use crate::error::DomainError;
use crate::types::{
    CapacityResource, DispatchDescription, DispatchLinks, ModelId, ModelQuantity, StaffId,
    StationId, VehicleId,
};

/// Available inventory at one station, as seen by one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySnapshot {
    station_id: StationId,
    vehicles: BTreeMap<ModelId, Vec<VehicleId>>,
    staff: Vec<StaffId>,
}

impl AvailabilitySnapshot {
    /// Creates an empty snapshot for a station.
    #[must_use]
    pub const fn new(station_id: StationId) -> Self {
        Self {
            station_id,
            vehicles: BTreeMap::new(),
            staff: Vec::new(),
        }
    }

    /// Records the available vehicles of one model. Ids are kept sorted.
    #[must_use]
    pub fn with_vehicles(mut self, model_id: ModelId, mut vehicle_ids: Vec<VehicleId>) -> Self {
        vehicle_ids.sort_unstable();
        vehicle_ids.dedup();
        self.vehicles.insert(model_id, vehicle_ids);
        self
    }

    /// Records the free staff. Ids are kept sorted.
    #[must_use]
    pub fn with_staff(mut self, mut staff_ids: Vec<StaffId>) -> Self {
        staff_ids.sort_unstable();
        staff_ids.dedup();
        self.staff = staff_ids;
        self
    }

    #[must_use]
    pub const fn station_id(&self) -> StationId {
        self.station_id
    }

    /// Number of available vehicles of a model (zero if the model was never
    /// recorded).
    #[must_use]
    pub fn vehicle_count(&self, model_id: ModelId) -> u32 {
        self.vehicles
            .get(&model_id)
            .map_or(0, |ids| saturating_count(ids.len()))
    }

    /// Number of free staff.
    #[must_use]
    pub fn staff_count(&self) -> u32 {
        saturating_count(self.staff.len())
    }
}

/// A concrete allocation produced by [`plan_allocation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
    /// The aggregated lines the plan satisfies.
    pub lines: Vec<ModelQuantity>,
    /// Chosen vehicles, grouped by line, ascending within each line.
    pub vehicles: Vec<VehicleId>,
    /// Chosen staff, ascending.
    pub staff: Vec<StaffId>,
}

impl AllocationPlan {
    /// The link set this plan materializes.
    #[must_use]
    pub fn links(&self) -> DispatchLinks {
        DispatchLinks::new(self.staff.clone(), self.vehicles.clone())
    }

    /// Human-readable description of the requested allocation.
    #[must_use]
    pub fn description(&self, note: Option<String>) -> DispatchDescription {
        DispatchDescription::new(self.lines.clone(), saturating_count(self.staff.len()), note)
    }
}

/// Sums duplicate model lines, preserving first-appearance order.
#[must_use]
pub fn aggregate_lines(lines: &[ModelQuantity]) -> Vec<ModelQuantity> {
    let mut aggregated: Vec<ModelQuantity> = Vec::with_capacity(lines.len());
    for line in lines {
        match aggregated.iter_mut().find(|l| l.model_id == line.model_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => aggregated.push(*line),
        }
    }
    aggregated
}

/// Selects concrete vehicles and staff for a request.
///
/// # Arguments
///
/// * `snapshot` - Availability at the source station
/// * `lines` - Requested vehicles per model (validated, positive quantities)
/// * `staff_count` - Requested staff headcount
///
/// # Errors
///
/// Returns `DomainError::CapacityExceeded` naming the first model (or staff)
/// whose request exceeds availability.
pub fn plan_allocation(
    snapshot: &AvailabilitySnapshot,
    lines: &[ModelQuantity],
    staff_count: u32,
) -> Result<AllocationPlan, DomainError> {
    let lines: Vec<ModelQuantity> = aggregate_lines(lines);

    let mut vehicles: Vec<VehicleId> = Vec::new();
    for line in &lines {
        let available: &[VehicleId] = snapshot
            .vehicles
            .get(&line.model_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let wanted: usize = line.quantity as usize;
        if wanted > available.len() {
            return Err(DomainError::CapacityExceeded {
                station_id: snapshot.station_id,
                resource: CapacityResource::VehicleModel(line.model_id),
                requested: line.quantity,
                available: saturating_count(available.len()),
            });
        }
        vehicles.extend_from_slice(&available[..wanted]);
    }

    let wanted_staff: usize = staff_count as usize;
    if wanted_staff > snapshot.staff.len() {
        return Err(DomainError::CapacityExceeded {
            station_id: snapshot.station_id,
            resource: CapacityResource::Staff,
            requested: staff_count,
            available: snapshot.staff_count(),
        });
    }
    let staff: Vec<StaffId> = snapshot.staff[..wanted_staff].to_vec();

    Ok(AllocationPlan {
        lines,
        vehicles,
        staff,
    })
}

fn saturating_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
