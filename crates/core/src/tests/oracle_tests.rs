// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::CapacityOracle;
use crate::tests::helpers::{MemoryStore, create_pending_dispatch, station_a, station_b};
use fleet_dispatch_domain::{
    AvailabilitySnapshot, DispatchId, DispatchLinks, ModelId, StaffId, VehicleId,
};

#[test]
fn test_counts_reflect_free_inventory() {
    let mut store: MemoryStore = MemoryStore::with_inventory();
    let mut oracle: CapacityOracle<'_> = CapacityOracle::new(&mut store, None);

    assert_eq!(
        oracle
            .available_vehicle_count(station_a(), ModelId::new(1))
            .unwrap(),
        3
    );
    assert_eq!(
        oracle
            .available_vehicle_count(station_a(), ModelId::new(2))
            .unwrap(),
        1
    );
    assert_eq!(oracle.available_staff_count(station_a()).unwrap(), 2);
    assert_eq!(oracle.available_staff_count(station_b()).unwrap(), 1);
}

#[test]
fn test_rented_vehicles_and_staff_on_leave_are_unavailable() {
    let mut store: MemoryStore = MemoryStore::with_inventory();
    store.vehicles.get_mut(&VehicleId::new(2)).unwrap().rented = true;
    store.staff.get_mut(&StaffId::new(1)).unwrap().on_leave = true;
    let mut oracle: CapacityOracle<'_> = CapacityOracle::new(&mut store, None);

    let snapshot: AvailabilitySnapshot = oracle.snapshot(station_a(), &[ModelId::new(1)]).unwrap();

    assert_eq!(snapshot.vehicle_count(ModelId::new(1)), 2);
    assert_eq!(snapshot.staff_count(), 1);
}

#[test]
fn test_active_claims_are_unavailable_until_excluded() {
    let mut store: MemoryStore = MemoryStore::with_inventory();
    store.seed_dispatch(
        create_pending_dispatch(1),
        &DispatchLinks::new(vec![StaffId::new(1)], vec![VehicleId::new(1)]),
    );

    let claimed: u32 = CapacityOracle::new(&mut store, None)
        .available_vehicle_count(station_a(), ModelId::new(1))
        .unwrap();
    assert_eq!(claimed, 2);

    let released: u32 = CapacityOracle::new(&mut store, Some(DispatchId::new(1)))
        .available_vehicle_count(station_a(), ModelId::new(1))
        .unwrap();
    assert_eq!(released, 3);
}

#[test]
fn test_decided_dispatches_hold_no_claim() {
    let mut store: MemoryStore = MemoryStore::with_inventory();
    let mut rejected = create_pending_dispatch(1);
    rejected.status = fleet_dispatch_domain::DispatchStatus::Rejected;
    store.seed_dispatch(
        rejected,
        &DispatchLinks::new(vec![StaffId::new(1)], vec![VehicleId::new(1)]),
    );

    let mut oracle: CapacityOracle<'_> = CapacityOracle::new(&mut store, None);
    assert_eq!(oracle.available_staff_count(station_a()).unwrap(), 2);
}

#[test]
fn test_snapshot_lists_only_requested_models() {
    let mut store: MemoryStore = MemoryStore::with_inventory();
    let mut oracle: CapacityOracle<'_> = CapacityOracle::new(&mut store, None);

    let snapshot: AvailabilitySnapshot = oracle.snapshot(station_a(), &[ModelId::new(2)]).unwrap();

    assert_eq!(snapshot.station_id(), station_a());
    assert_eq!(snapshot.vehicle_count(ModelId::new(2)), 1);
    assert_eq!(snapshot.vehicle_count(ModelId::new(1)), 0);
}
