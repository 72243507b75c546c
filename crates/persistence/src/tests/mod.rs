// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod backend_validation_tests;

use fleet_dispatch::{CoreError, UnitOfWork};
use fleet_dispatch_audit::{Actor, Cause};
use fleet_dispatch_domain::{
    DispatchDescription, DispatchId, DispatchLinks, DispatchRequest, DispatchStatus, ModelId,
    ModelQuantity, StaffId, StationId, VehicleId,
};

use crate::Persistence;

pub const NOW: &str = "2026-03-01T09:00:00Z";

pub fn create_test_actor() -> Actor {
    Actor::admin(StaffId::new(1))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

/// Two stations with a small inventory at the first one.
///
/// Central: compacts `vehicles[0..3]`, van `vehicles[3]`, staff `staff[0..2]`.
/// Airport: the requesting administrator.
pub struct Fixture {
    pub persistence: Persistence,
    pub central: StationId,
    pub airport: StationId,
    pub compact: ModelId,
    pub van: ModelId,
    pub vehicles: Vec<VehicleId>,
    pub staff: Vec<StaffId>,
    pub admin: StaffId,
}

impl Fixture {
    pub fn seeded() -> Self {
        let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
        let central: StationId = persistence.create_station("Central").unwrap();
        let airport: StationId = persistence.create_station("Airport").unwrap();
        let compact: ModelId = persistence.create_vehicle_model("Compact").unwrap();
        let van: ModelId = persistence.create_vehicle_model("Van").unwrap();

        let vehicles: Vec<VehicleId> = vec![
            persistence.create_vehicle(central, compact, "C-101").unwrap(),
            persistence.create_vehicle(central, compact, "C-102").unwrap(),
            persistence.create_vehicle(central, compact, "C-103").unwrap(),
            persistence.create_vehicle(central, van, "V-201").unwrap(),
        ];
        let staff: Vec<StaffId> = vec![
            persistence.create_staff(central, "Alice", false).unwrap(),
            persistence.create_staff(central, "Bob", false).unwrap(),
        ];
        let admin: StaffId = persistence.create_staff(airport, "Dana", true).unwrap();

        Self {
            persistence,
            central,
            airport,
            compact,
            van,
            vehicles,
            staff,
            admin,
        }
    }

    /// A pending request from Central to Airport, not yet persisted.
    pub fn pending_request(&self) -> DispatchRequest {
        DispatchRequest {
            dispatch_id: None,
            description: Some(DispatchDescription::new(
                vec![ModelQuantity {
                    model_id: self.compact,
                    quantity: 2,
                }],
                1,
                None,
            )),
            final_description: None,
            status: DispatchStatus::Pending,
            from_station_id: Some(self.central),
            to_station_id: self.airport,
            request_admin_id: self.admin,
            approved_admin_id: None,
            created_at: NOW.to_string(),
            updated_at: NOW.to_string(),
            deleted_at: None,
        }
    }

    /// Persists a pending request holding `links` and returns its id.
    pub fn insert_with_links(&mut self, links: &DispatchLinks) -> DispatchId {
        let request: DispatchRequest = self.pending_request();
        self.persistence
            .transaction(|store| {
                let dispatch_id: DispatchId = store.insert_dispatch(&request)?;
                store.add_dispatch_relations(
                    &links.staff_rows(dispatch_id),
                    &links.vehicle_rows(dispatch_id),
                )?;
                Ok::<_, CoreError>(dispatch_id)
            })
            .unwrap()
    }
}
