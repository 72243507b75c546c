// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use fleet_dispatch::{
    AvailableVehicle, CoreError, DispatchFilter, DispatchStore, ExpandedDispatch, UnitOfWork,
};
use fleet_dispatch_audit::{AuditEvent, Cause};
use fleet_dispatch_domain::{
    DispatchId, DispatchLinks, DispatchRequest, DispatchRequestStaff, DispatchRequestVehicle,
    DispatchStatus, ModelId, ResourceRef, StaffId, StationId, VehicleId,
};
use fleet_dispatch_persistence::Persistence;

use crate::{
    AuthenticatedAdmin, ConfirmDispatchRequest, CreateDispatchRequest, DescriptionBody,
    ModelQuantityBody, VehicleLineRequest, create_dispatch,
};

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

/// Identifiers of the seeded inventory.
///
/// Central holds three compacts, one van and two staff. The administrator
/// works at Airport, so every request goes from Central to Airport.
#[derive(Debug, Clone)]
pub struct Inventory {
    pub central: StationId,
    pub airport: StationId,
    pub compact: ModelId,
    pub van: ModelId,
    pub compacts: Vec<VehicleId>,
    pub vans: Vec<VehicleId>,
    pub staff: Vec<StaffId>,
    pub admin: AuthenticatedAdmin,
}

pub fn seed(persistence: &mut Persistence) -> Inventory {
    let central: StationId = persistence.create_station("Central").unwrap();
    let airport: StationId = persistence.create_station("Airport").unwrap();
    let compact: ModelId = persistence.create_vehicle_model("Compact").unwrap();
    let van: ModelId = persistence.create_vehicle_model("Van").unwrap();

    let compacts: Vec<VehicleId> = ["C-101", "C-102", "C-103"]
        .iter()
        .map(|plate| persistence.create_vehicle(central, compact, plate).unwrap())
        .collect();
    let vans: Vec<VehicleId> = vec![persistence.create_vehicle(central, van, "V-201").unwrap()];
    let staff: Vec<StaffId> = vec![
        persistence.create_staff(central, "Alice", false).unwrap(),
        persistence.create_staff(central, "Bob", false).unwrap(),
    ];
    let admin: StaffId = persistence.create_staff(airport, "Dana", true).unwrap();

    Inventory {
        central,
        airport,
        compact,
        van,
        compacts,
        vans,
        staff,
        admin: AuthenticatedAdmin::new(admin),
    }
}

/// A fresh in-memory database with the standard inventory.
pub fn setup() -> (Persistence, Inventory) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let inventory: Inventory = seed(&mut persistence);
    (persistence, inventory)
}

pub fn create_request(
    inventory: &Inventory,
    compacts: i64,
    staff: Option<i64>,
) -> CreateDispatchRequest {
    CreateDispatchRequest {
        from_station_id: Some(inventory.central),
        vehicles: vec![VehicleLineRequest {
            model_id: inventory.compact,
            number_of_vehicle: compacts,
        }],
        number_of_staff: staff,
        note: None,
    }
}

/// Creates the standard request (2 compacts, 1 staff) and returns its id.
pub fn create_standard(persistence: &mut Persistence, inventory: &Inventory) -> DispatchId {
    let response = create_dispatch(
        persistence,
        &inventory.admin,
        create_request(inventory, 2, Some(1)),
        create_test_cause(),
    )
    .unwrap();
    DispatchId::new(response.id)
}

pub fn final_description(inventory: &Inventory) -> DescriptionBody {
    DescriptionBody {
        vehicles: vec![ModelQuantityBody {
            model_id: inventory.compact,
            quantity: 2,
        }],
        staff_count: 1,
        note: Some(String::from("approved as requested")),
    }
}

pub fn approve_request(inventory: &Inventory) -> ConfirmDispatchRequest {
    ConfirmDispatchRequest {
        status: String::from("approved"),
        from_station_id: None,
        final_description: Some(final_description(inventory)),
    }
}

pub fn reject_request() -> ConfirmDispatchRequest {
    ConfirmDispatchRequest {
        status: String::from("rejected"),
        from_station_id: None,
        final_description: None,
    }
}

/// A fault to inject into the store of every transaction.
#[derive(Debug, Clone)]
pub enum Fault {
    /// `add_dispatch_relations` fails after the clear has run.
    FailAddRelations,
    /// `list_available_vehicles` returns these ids regardless of claims, as
    /// if the snapshot had been taken before another writer committed.
    StaleVehicleSnapshot(Vec<VehicleId>),
    /// `lock_station` rejects this dispatch once the lock is held, as if
    /// another writer had decided it while this one waited.
    RejectedWhileLocking(DispatchId),
}

/// A unit of work over [`Persistence`] whose stores misbehave on purpose.
pub struct FaultyPersistence {
    pub inner: Persistence,
    pub fault: Fault,
}

impl UnitOfWork for FaultyPersistence {
    fn transaction<T, F>(&mut self, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn DispatchStore) -> Result<T, CoreError>,
    {
        let fault: &Fault = &self.fault;
        self.inner.transaction(|store| {
            let mut faulty = FaultyStore { inner: store, fault };
            work(&mut faulty)
        })
    }

    fn read<T, F>(&mut self, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn DispatchStore) -> Result<T, CoreError>,
    {
        self.inner.read(work)
    }
}

struct FaultyStore<'a> {
    inner: &'a mut dyn DispatchStore,
    fault: &'a Fault,
}

impl DispatchStore for FaultyStore<'_> {
    fn get_available_vehicles_by_ids(
        &mut self,
        station_id: StationId,
        vehicle_ids: &[VehicleId],
        exclude: Option<DispatchId>,
    ) -> Result<Vec<AvailableVehicle>, CoreError> {
        self.inner
            .get_available_vehicles_by_ids(station_id, vehicle_ids, exclude)
    }

    fn get_available_staff_by_ids(
        &mut self,
        station_id: StationId,
        staff_ids: &[StaffId],
        exclude: Option<DispatchId>,
    ) -> Result<Vec<StaffId>, CoreError> {
        self.inner
            .get_available_staff_by_ids(station_id, staff_ids, exclude)
    }

    fn count_available_staff_in_station(
        &mut self,
        station_id: StationId,
        exclude: Option<DispatchId>,
    ) -> Result<u32, CoreError> {
        self.inner.count_available_staff_in_station(station_id, exclude)
    }

    fn count_available_vehicles_by_model(
        &mut self,
        station_id: StationId,
        model_id: ModelId,
        exclude: Option<DispatchId>,
    ) -> Result<u32, CoreError> {
        self.inner
            .count_available_vehicles_by_model(station_id, model_id, exclude)
    }

    fn list_available_vehicles(
        &mut self,
        station_id: StationId,
        model_id: ModelId,
        exclude: Option<DispatchId>,
    ) -> Result<Vec<VehicleId>, CoreError> {
        match self.fault {
            Fault::StaleVehicleSnapshot(ids) => Ok(ids.clone()),
            Fault::FailAddRelations | Fault::RejectedWhileLocking(_) => {
                self.inner
                    .list_available_vehicles(station_id, model_id, exclude)
            }
        }
    }

    fn list_available_staff(
        &mut self,
        station_id: StationId,
        exclude: Option<DispatchId>,
    ) -> Result<Vec<StaffId>, CoreError> {
        self.inner.list_available_staff(station_id, exclude)
    }

    fn clear_dispatch_relations(&mut self, dispatch_id: DispatchId) -> Result<usize, CoreError> {
        self.inner.clear_dispatch_relations(dispatch_id)
    }

    fn add_dispatch_relations(
        &mut self,
        staff: &[DispatchRequestStaff],
        vehicles: &[DispatchRequestVehicle],
    ) -> Result<usize, CoreError> {
        match self.fault {
            Fault::FailAddRelations => Err(CoreError::Persistence(String::from(
                "injected relation insert failure",
            ))),
            Fault::StaleVehicleSnapshot(_) | Fault::RejectedWhileLocking(_) => {
                self.inner.add_dispatch_relations(staff, vehicles)
            }
        }
    }

    fn count_conflicting_claims(
        &mut self,
        dispatch_id: DispatchId,
        staff_ids: &[StaffId],
        vehicle_ids: &[VehicleId],
    ) -> Result<usize, CoreError> {
        self.inner
            .count_conflicting_claims(dispatch_id, staff_ids, vehicle_ids)
    }

    fn find_link_outside_station(
        &mut self,
        dispatch_id: DispatchId,
        station_id: StationId,
    ) -> Result<Option<ResourceRef>, CoreError> {
        self.inner.find_link_outside_station(dispatch_id, station_id)
    }

    fn update_staff_station_for_dispatch(
        &mut self,
        dispatch_id: DispatchId,
        to_station_id: StationId,
    ) -> Result<usize, CoreError> {
        self.inner
            .update_staff_station_for_dispatch(dispatch_id, to_station_id)
    }

    fn update_vehicle_station_for_dispatch(
        &mut self,
        dispatch_id: DispatchId,
        to_station_id: StationId,
    ) -> Result<usize, CoreError> {
        self.inner
            .update_vehicle_station_for_dispatch(dispatch_id, to_station_id)
    }

    fn lock_station(&mut self, station_id: StationId) -> Result<(), CoreError> {
        self.inner.lock_station(station_id)?;
        let Fault::RejectedWhileLocking(dispatch_id) = self.fault else {
            return Ok(());
        };
        if let Some(mut dispatch) = self.inner.get_dispatch(*dispatch_id)? {
            dispatch.status = DispatchStatus::Rejected;
            self.inner.save_dispatch(&dispatch)?;
        }
        Ok(())
    }

    fn model_exists(&mut self, model_id: ModelId) -> Result<bool, CoreError> {
        self.inner.model_exists(model_id)
    }

    fn get_staff_station(&mut self, staff_id: StaffId) -> Result<Option<StationId>, CoreError> {
        self.inner.get_staff_station(staff_id)
    }

    fn insert_dispatch(&mut self, dispatch: &DispatchRequest) -> Result<DispatchId, CoreError> {
        self.inner.insert_dispatch(dispatch)
    }

    fn get_dispatch(
        &mut self,
        dispatch_id: DispatchId,
    ) -> Result<Option<DispatchRequest>, CoreError> {
        self.inner.get_dispatch(dispatch_id)
    }

    fn save_dispatch(&mut self, dispatch: &DispatchRequest) -> Result<usize, CoreError> {
        self.inner.save_dispatch(dispatch)
    }

    fn get_dispatch_links(&mut self, dispatch_id: DispatchId) -> Result<DispatchLinks, CoreError> {
        self.inner.get_dispatch_links(dispatch_id)
    }

    fn get_by_id_with_full_info(
        &mut self,
        dispatch_id: DispatchId,
    ) -> Result<Option<ExpandedDispatch>, CoreError> {
        self.inner.get_by_id_with_full_info(dispatch_id)
    }

    fn get_all_expanded(
        &mut self,
        filter: &DispatchFilter,
    ) -> Result<Vec<ExpandedDispatch>, CoreError> {
        self.inner.get_all_expanded(filter)
    }

    fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, CoreError> {
        self.inner.persist_audit_event(event)
    }
}
