// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AvailableVehicle, CoreError, DispatchFilter, DispatchStore, ExpandedDispatch, StaffSummary,
    StationSummary, VehicleSummary,
};
use fleet_dispatch_audit::{Actor, AuditEvent, Cause};
use fleet_dispatch_domain::{
    AllocationPlan, DispatchId, DispatchLinks, DispatchRequest, DispatchRequestStaff,
    DispatchRequestVehicle, DispatchStatus, ModelId, ModelQuantity, ResourceRef, StaffId,
    StationId, VehicleId,
};
use std::collections::{BTreeMap, BTreeSet};

pub const NOW: &str = "2026-03-01T10:00:00Z";
pub const LATER: &str = "2026-03-01T11:00:00Z";

pub fn create_test_actor() -> Actor {
    Actor::admin(StaffId::new(100))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Admin request"))
}

pub fn station_a() -> StationId {
    StationId::new(1)
}

pub fn station_b() -> StationId {
    StationId::new(2)
}

pub fn create_test_plan() -> AllocationPlan {
    AllocationPlan {
        lines: vec![ModelQuantity {
            model_id: ModelId::new(1),
            quantity: 2,
        }],
        vehicles: vec![VehicleId::new(1), VehicleId::new(2)],
        staff: vec![StaffId::new(1)],
    }
}

/// A persisted pending dispatch from station A to station B.
pub fn create_pending_dispatch(id: i64) -> DispatchRequest {
    DispatchRequest {
        dispatch_id: Some(DispatchId::new(id)),
        description: Some(create_test_plan().description(None)),
        final_description: None,
        status: DispatchStatus::Pending,
        from_station_id: Some(station_a()),
        to_station_id: station_b(),
        request_admin_id: StaffId::new(100),
        approved_admin_id: None,
        created_at: String::from(NOW),
        updated_at: String::from(NOW),
        deleted_at: None,
    }
}

#[derive(Debug, Clone)]
pub struct MemoryVehicle {
    pub station_id: StationId,
    pub model_id: ModelId,
    pub rented: bool,
}

#[derive(Debug, Clone)]
pub struct MemoryStaff {
    pub station_id: StationId,
    pub on_leave: bool,
}

/// An in-memory `DispatchStore` with the same availability rules as the
/// database adapter. It has no transactions; tests inspect it directly.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub stations: BTreeMap<StationId, String>,
    pub models: BTreeMap<ModelId, String>,
    pub vehicles: BTreeMap<VehicleId, MemoryVehicle>,
    pub staff: BTreeMap<StaffId, MemoryStaff>,
    pub dispatches: BTreeMap<DispatchId, DispatchRequest>,
    pub staff_links: Vec<DispatchRequestStaff>,
    pub vehicle_links: Vec<DispatchRequestVehicle>,
    pub audit_events: Vec<AuditEvent>,
    pub locked_stations: Vec<StationId>,
}

impl MemoryStore {
    /// Station A with three vehicles of model 1, one of model 2 and two free
    /// staff; station B empty.
    pub fn with_inventory() -> Self {
        let mut store: Self = Self::default();
        store.stations.insert(station_a(), String::from("Alpha"));
        store.stations.insert(station_b(), String::from("Bravo"));
        store.models.insert(ModelId::new(1), String::from("Van"));
        store.models.insert(ModelId::new(2), String::from("Truck"));
        for (id, model) in [(1, 1), (2, 1), (3, 1), (4, 2)] {
            store.add_vehicle(id, station_a(), model);
        }
        store.add_staff(1, station_a());
        store.add_staff(2, station_a());
        store.add_staff(100, station_b());
        store
    }

    pub fn add_vehicle(&mut self, id: i64, station_id: StationId, model: i64) {
        self.vehicles.insert(
            VehicleId::new(id),
            MemoryVehicle {
                station_id,
                model_id: ModelId::new(model),
                rented: false,
            },
        );
    }

    pub fn add_staff(&mut self, id: i64, station_id: StationId) {
        self.staff.insert(
            StaffId::new(id),
            MemoryStaff {
                station_id,
                on_leave: false,
            },
        );
    }

    /// Stores a dispatch and its links as they would be after a commit.
    pub fn seed_dispatch(&mut self, dispatch: DispatchRequest, links: &DispatchLinks) {
        let dispatch_id: DispatchId = dispatch.dispatch_id.unwrap();
        self.staff_links.extend(links.staff_rows(dispatch_id));
        self.vehicle_links.extend(links.vehicle_rows(dispatch_id));
        self.dispatches.insert(dispatch_id, dispatch);
    }

    pub fn links_of(&self, dispatch_id: DispatchId) -> DispatchLinks {
        let mut staff: Vec<StaffId> = self
            .staff_links
            .iter()
            .filter(|l| l.dispatch_id == dispatch_id)
            .map(|l| l.staff_id)
            .collect();
        let mut vehicles: Vec<VehicleId> = self
            .vehicle_links
            .iter()
            .filter(|l| l.dispatch_id == dispatch_id)
            .map(|l| l.vehicle_id)
            .collect();
        staff.sort_unstable();
        vehicles.sort_unstable();
        DispatchLinks::new(staff, vehicles)
    }

    fn active_dispatches(&self, exclude: Option<DispatchId>) -> BTreeSet<DispatchId> {
        self.dispatches
            .iter()
            .filter(|(id, d)| d.is_active_claim() && Some(**id) != exclude)
            .map(|(id, _)| *id)
            .collect()
    }

    fn claimed_vehicles(&self, exclude: Option<DispatchId>) -> BTreeSet<VehicleId> {
        let active: BTreeSet<DispatchId> = self.active_dispatches(exclude);
        self.vehicle_links
            .iter()
            .filter(|l| active.contains(&l.dispatch_id))
            .map(|l| l.vehicle_id)
            .collect()
    }

    fn claimed_staff(&self, exclude: Option<DispatchId>) -> BTreeSet<StaffId> {
        let active: BTreeSet<DispatchId> = self.active_dispatches(exclude);
        self.staff_links
            .iter()
            .filter(|l| active.contains(&l.dispatch_id))
            .map(|l| l.staff_id)
            .collect()
    }

    fn free_vehicles(
        &self,
        station_id: StationId,
        exclude: Option<DispatchId>,
    ) -> Vec<AvailableVehicle> {
        let claimed: BTreeSet<VehicleId> = self.claimed_vehicles(exclude);
        self.vehicles
            .iter()
            .filter(|(id, v)| v.station_id == station_id && !v.rented && !claimed.contains(id))
            .map(|(id, v)| AvailableVehicle {
                vehicle_id: *id,
                model_id: v.model_id,
            })
            .collect()
    }

    fn free_staff(&self, station_id: StationId, exclude: Option<DispatchId>) -> Vec<StaffId> {
        let claimed: BTreeSet<StaffId> = self.claimed_staff(exclude);
        self.staff
            .iter()
            .filter(|(id, s)| s.station_id == station_id && !s.on_leave && !claimed.contains(id))
            .map(|(id, _)| *id)
            .collect()
    }

    fn station_summary(&self, station_id: StationId) -> StationSummary {
        StationSummary {
            station_id,
            name: self.stations.get(&station_id).cloned().unwrap_or_default(),
        }
    }

    fn staff_summary(&self, staff_id: StaffId) -> StaffSummary {
        StaffSummary {
            staff_id,
            name: format!("Staff {}", staff_id.get()),
            station_id: self
                .staff
                .get(&staff_id)
                .map_or(StationId::new(0), |s| s.station_id),
        }
    }

    fn expand(&self, dispatch: &DispatchRequest) -> Option<ExpandedDispatch> {
        let dispatch_id: DispatchId = dispatch.dispatch_id?;
        let links: DispatchLinks = self.links_of(dispatch_id);
        Some(ExpandedDispatch {
            dispatch_id,
            status: dispatch.status,
            description: dispatch.description.clone(),
            final_description: dispatch.final_description.clone(),
            from_station: dispatch.from_station_id.map(|id| self.station_summary(id)),
            to_station: self.station_summary(dispatch.to_station_id),
            request_admin: self.staff_summary(dispatch.request_admin_id),
            approved_admin: dispatch.approved_admin_id.map(|id| self.staff_summary(id)),
            staff: links
                .staff
                .iter()
                .map(|id| self.staff_summary(*id))
                .collect(),
            vehicles: links
                .vehicles
                .iter()
                .filter_map(|id| {
                    let vehicle: &MemoryVehicle = self.vehicles.get(id)?;
                    Some(VehicleSummary {
                        vehicle_id: *id,
                        license_plate: format!("PLATE-{}", id.get()),
                        model_id: vehicle.model_id,
                        model_name: self.models.get(&vehicle.model_id).cloned()?,
                        station_id: vehicle.station_id,
                    })
                })
                .collect(),
            created_at: dispatch.created_at.clone(),
            updated_at: dispatch.updated_at.clone(),
        })
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap()
}

impl DispatchStore for MemoryStore {
    fn get_available_vehicles_by_ids(
        &mut self,
        station_id: StationId,
        vehicle_ids: &[VehicleId],
        exclude: Option<DispatchId>,
    ) -> Result<Vec<AvailableVehicle>, CoreError> {
        Ok(self
            .free_vehicles(station_id, exclude)
            .into_iter()
            .filter(|v| vehicle_ids.contains(&v.vehicle_id))
            .collect())
    }

    fn get_available_staff_by_ids(
        &mut self,
        station_id: StationId,
        staff_ids: &[StaffId],
        exclude: Option<DispatchId>,
    ) -> Result<Vec<StaffId>, CoreError> {
        Ok(self
            .free_staff(station_id, exclude)
            .into_iter()
            .filter(|id| staff_ids.contains(id))
            .collect())
    }

    fn count_available_staff_in_station(
        &mut self,
        station_id: StationId,
        exclude: Option<DispatchId>,
    ) -> Result<u32, CoreError> {
        Ok(count(self.free_staff(station_id, exclude).len()))
    }

    fn count_available_vehicles_by_model(
        &mut self,
        station_id: StationId,
        model_id: ModelId,
        exclude: Option<DispatchId>,
    ) -> Result<u32, CoreError> {
        Ok(count(self.list_available_vehicles(station_id, model_id, exclude)?.len()))
    }

    fn list_available_vehicles(
        &mut self,
        station_id: StationId,
        model_id: ModelId,
        exclude: Option<DispatchId>,
    ) -> Result<Vec<VehicleId>, CoreError> {
        Ok(self
            .free_vehicles(station_id, exclude)
            .into_iter()
            .filter(|v| v.model_id == model_id)
            .map(|v| v.vehicle_id)
            .collect())
    }

    fn list_available_staff(
        &mut self,
        station_id: StationId,
        exclude: Option<DispatchId>,
    ) -> Result<Vec<StaffId>, CoreError> {
        Ok(self.free_staff(station_id, exclude))
    }

    fn clear_dispatch_relations(&mut self, dispatch_id: DispatchId) -> Result<usize, CoreError> {
        let before: usize = self.staff_links.len() + self.vehicle_links.len();
        self.staff_links.retain(|l| l.dispatch_id != dispatch_id);
        self.vehicle_links.retain(|l| l.dispatch_id != dispatch_id);
        Ok(before - self.staff_links.len() - self.vehicle_links.len())
    }

    fn add_dispatch_relations(
        &mut self,
        staff: &[DispatchRequestStaff],
        vehicles: &[DispatchRequestVehicle],
    ) -> Result<usize, CoreError> {
        self.staff_links.extend_from_slice(staff);
        self.vehicle_links.extend_from_slice(vehicles);
        Ok(staff.len() + vehicles.len())
    }

    fn count_conflicting_claims(
        &mut self,
        dispatch_id: DispatchId,
        staff_ids: &[StaffId],
        vehicle_ids: &[VehicleId],
    ) -> Result<usize, CoreError> {
        let claimed_staff: BTreeSet<StaffId> = self.claimed_staff(Some(dispatch_id));
        let claimed_vehicles: BTreeSet<VehicleId> = self.claimed_vehicles(Some(dispatch_id));
        let staff_conflicts: usize = staff_ids
            .iter()
            .filter(|id| claimed_staff.contains(id))
            .count();
        let vehicle_conflicts: usize = vehicle_ids
            .iter()
            .filter(|id| {
                claimed_vehicles.contains(id) || self.vehicles.get(id).is_some_and(|v| v.rented)
            })
            .count();
        Ok(staff_conflicts + vehicle_conflicts)
    }

    fn find_link_outside_station(
        &mut self,
        dispatch_id: DispatchId,
        station_id: StationId,
    ) -> Result<Option<ResourceRef>, CoreError> {
        let links: DispatchLinks = self.links_of(dispatch_id);
        let vehicle = links
            .vehicles
            .iter()
            .find(|id| self.vehicles.get(id).is_none_or(|v| v.station_id != station_id))
            .map(|id| ResourceRef::Vehicle(*id));
        if vehicle.is_some() {
            return Ok(vehicle);
        }
        Ok(links
            .staff
            .iter()
            .find(|id| self.staff.get(id).is_none_or(|s| s.station_id != station_id))
            .map(|id| ResourceRef::Staff(*id)))
    }

    fn update_staff_station_for_dispatch(
        &mut self,
        dispatch_id: DispatchId,
        to_station_id: StationId,
    ) -> Result<usize, CoreError> {
        let links: DispatchLinks = self.links_of(dispatch_id);
        for id in &links.staff {
            if let Some(staff) = self.staff.get_mut(id) {
                staff.station_id = to_station_id;
            }
        }
        Ok(links.staff.len())
    }

    fn update_vehicle_station_for_dispatch(
        &mut self,
        dispatch_id: DispatchId,
        to_station_id: StationId,
    ) -> Result<usize, CoreError> {
        let links: DispatchLinks = self.links_of(dispatch_id);
        for id in &links.vehicles {
            if let Some(vehicle) = self.vehicles.get_mut(id) {
                vehicle.station_id = to_station_id;
            }
        }
        Ok(links.vehicles.len())
    }

    fn lock_station(&mut self, station_id: StationId) -> Result<(), CoreError> {
        if !self.stations.contains_key(&station_id) {
            return Err(CoreError::StationNotFound(station_id));
        }
        self.locked_stations.push(station_id);
        Ok(())
    }

    fn model_exists(&mut self, model_id: ModelId) -> Result<bool, CoreError> {
        Ok(self.models.contains_key(&model_id))
    }

    fn get_staff_station(&mut self, staff_id: StaffId) -> Result<Option<StationId>, CoreError> {
        Ok(self.staff.get(&staff_id).map(|s| s.station_id))
    }

    fn insert_dispatch(&mut self, dispatch: &DispatchRequest) -> Result<DispatchId, CoreError> {
        let next: i64 = self
            .dispatches
            .keys()
            .next_back()
            .map_or(1, |id| id.get() + 1);
        let dispatch_id: DispatchId = DispatchId::new(next);
        let mut stored: DispatchRequest = dispatch.clone();
        stored.dispatch_id = Some(dispatch_id);
        self.dispatches.insert(dispatch_id, stored);
        Ok(dispatch_id)
    }

    fn get_dispatch(
        &mut self,
        dispatch_id: DispatchId,
    ) -> Result<Option<DispatchRequest>, CoreError> {
        Ok(self.dispatches.get(&dispatch_id).cloned())
    }

    fn save_dispatch(&mut self, dispatch: &DispatchRequest) -> Result<usize, CoreError> {
        let Some(dispatch_id) = dispatch.dispatch_id else {
            return Ok(0);
        };
        Ok(usize::from(
            self.dispatches.insert(dispatch_id, dispatch.clone()).is_some(),
        ))
    }

    fn get_dispatch_links(&mut self, dispatch_id: DispatchId) -> Result<DispatchLinks, CoreError> {
        Ok(self.links_of(dispatch_id))
    }

    fn get_by_id_with_full_info(
        &mut self,
        dispatch_id: DispatchId,
    ) -> Result<Option<ExpandedDispatch>, CoreError> {
        Ok(self
            .dispatches
            .get(&dispatch_id)
            .filter(|d| !d.is_deleted())
            .and_then(|d| self.expand(d)))
    }

    fn get_all_expanded(
        &mut self,
        filter: &DispatchFilter,
    ) -> Result<Vec<ExpandedDispatch>, CoreError> {
        Ok(self
            .dispatches
            .values()
            .filter(|d| !d.is_deleted())
            .filter(|d| filter.from_station_id.is_none_or(|id| d.from_station_id == Some(id)))
            .filter(|d| filter.to_station_id.is_none_or(|id| d.to_station_id == id))
            .filter(|d| filter.status.is_none_or(|s| d.status == s))
            .filter_map(|d| self.expand(d))
            .collect())
    }

    fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, CoreError> {
        self.audit_events.push(event.clone());
        Ok(i64::try_from(self.audit_events.len()).unwrap())
    }
}
