// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend validation tests for `MariaDB`/`MySQL`.
//!
//! Business rules are covered by the `SQLite` suites. These tests check that
//! the `MySQL` migrations apply, that constraints are enforced and that the
//! transactional adapter behaves the same way on `MariaDB`.
//!
//! ## Test Execution
//!
//! Every test here is marked `#[ignore]` and runs only via
//! `cargo xtask test-mariadb`, which provides:
//! - `DATABASE_URL` pointing at a disposable `MariaDB` instance
//! - `FLEET_DISPATCH_TEST_BACKEND=mariadb`
//!
//! Tests fail fast if required infrastructure is missing.

use diesel::MysqlConnection;
use diesel::prelude::*;
use fleet_dispatch::{CoreError, DispatchFilter, ExpandedDispatch, UnitOfWork};
use fleet_dispatch_api::{
    ApiError, AuthenticatedAdmin, CreateDispatchRequest, CreateDispatchResponse,
    VehicleLineRequest, create_dispatch,
};
use fleet_dispatch_domain::{
    DispatchDescription, DispatchId, DispatchLinks, DispatchRequest, DispatchStatus, ModelId,
    StaffId, StationId, VehicleId,
};
use std::env;
use std::sync::{Arc, Barrier};
use std::thread;

use crate::backend::mysql;
use crate::tests::{NOW, create_test_cause};
use crate::{Persistence, PersistenceError};

/// Helper to get the `MariaDB` connection URL from environment.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set, indicating missing infrastructure.
fn get_mariadb_url() -> String {
    env::var("DATABASE_URL")
        .expect("DATABASE_URL not set - MariaDB tests must be run via `cargo xtask test-mariadb`")
}

/// Helper to verify we're running in the `MariaDB` test environment.
///
/// # Panics
///
/// Panics if `FLEET_DISPATCH_TEST_BACKEND` is not set to `mariadb`.
fn verify_mariadb_test_environment() {
    let backend = env::var("FLEET_DISPATCH_TEST_BACKEND").expect(
        "FLEET_DISPATCH_TEST_BACKEND not set - MariaDB tests must be run via `cargo xtask test-mariadb`",
    );
    assert_eq!(
        backend, "mariadb",
        "FLEET_DISPATCH_TEST_BACKEND must be 'mariadb'"
    );
}

/// Names must be unique across tests sharing one database.
fn unique(prefix: &str) -> String {
    format!(
        "{prefix}-{}",
        time::OffsetDateTime::now_utc().unix_timestamp_nanos()
    )
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_connection() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = MysqlConnection::establish(&url);
    assert!(
        result.is_ok(),
        "Failed to connect to MariaDB: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_migrations_apply_cleanly() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = mysql::initialize_database(&url);
    assert!(
        result.is_ok(),
        "Migrations failed on MariaDB: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_foreign_keys_enforced() {
    verify_mariadb_test_environment();
    let mut persistence: Persistence = Persistence::new_with_mysql(&get_mariadb_url()).unwrap();

    persistence.verify_foreign_key_enforcement().unwrap();
    let result: Result<StaffId, PersistenceError> =
        persistence.create_staff(StationId::new(i64::MAX), "Ghost", false);

    assert!(result.is_err());
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_unique_license_plate() {
    verify_mariadb_test_environment();
    let mut persistence: Persistence = Persistence::new_with_mysql(&get_mariadb_url()).unwrap();
    let station: StationId = persistence.create_station(&unique("station")).unwrap();
    let model: ModelId = persistence.create_vehicle_model(&unique("model")).unwrap();
    let plate: String = unique("plate");

    persistence.create_vehicle(station, model, &plate).unwrap();
    let result: Result<VehicleId, PersistenceError> =
        persistence.create_vehicle(station, model, &plate);

    assert!(result.is_err());
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_dispatch_round_trip_and_rollback() {
    verify_mariadb_test_environment();
    let mut persistence: Persistence = Persistence::new_with_mysql(&get_mariadb_url()).unwrap();
    let from: StationId = persistence.create_station(&unique("from")).unwrap();
    let to: StationId = persistence.create_station(&unique("to")).unwrap();
    let model: ModelId = persistence.create_vehicle_model(&unique("model")).unwrap();
    let vehicle: VehicleId = persistence
        .create_vehicle(from, model, &unique("plate"))
        .unwrap();
    let admin: StaffId = persistence.create_staff(to, "Admin", true).unwrap();

    let request: DispatchRequest = DispatchRequest {
        dispatch_id: None,
        description: Some(DispatchDescription::from_models(&[model], 0, None)),
        final_description: None,
        status: DispatchStatus::Pending,
        from_station_id: Some(from),
        to_station_id: to,
        request_admin_id: admin,
        approved_admin_id: None,
        created_at: NOW.to_string(),
        updated_at: NOW.to_string(),
        deleted_at: None,
    };
    let links: DispatchLinks = DispatchLinks::new(vec![], vec![vehicle]);

    let dispatch_id: DispatchId = persistence
        .transaction(|store| {
            store.lock_station(from)?;
            let dispatch_id: DispatchId = store.insert_dispatch(&request)?;
            store.add_dispatch_relations(&[], &links.vehicle_rows(dispatch_id))?;
            Ok(dispatch_id)
        })
        .unwrap();

    let rolled_back: Result<(), CoreError> = persistence.transaction(|store| {
        store.clear_dispatch_relations(dispatch_id)?;
        Err(CoreError::ConcurrentModification(String::from("forced")))
    });
    assert!(rolled_back.is_err());

    let view: ExpandedDispatch = persistence
        .read(|store| store.get_by_id_with_full_info(dispatch_id))
        .unwrap()
        .unwrap();
    assert_eq!(view.vehicles.len(), 1);
    assert_eq!(view.vehicles[0].vehicle_id, vehicle);

    let listing: Vec<ExpandedDispatch> = persistence
        .read(|store| store.get_all_expanded(&DispatchFilter::new(Some(from), None, None)))
        .unwrap();
    assert_eq!(listing.len(), 1);
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_session_reads_committed_rows() {
    verify_mariadb_test_environment();
    let mut conn: MysqlConnection = mysql::initialize_database(&get_mariadb_url()).unwrap();

    let level: String = mysql::session_isolation_level(&mut conn).unwrap();

    assert_eq!(level, "READ-COMMITTED");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_writes_inside_read_are_discarded() {
    verify_mariadb_test_environment();
    let mut persistence: Persistence = Persistence::new_with_mysql(&get_mariadb_url()).unwrap();
    let from: StationId = persistence.create_station(&unique("from")).unwrap();
    let to: StationId = persistence.create_station(&unique("to")).unwrap();
    let admin: StaffId = persistence.create_staff(to, "Admin", true).unwrap();
    let request: DispatchRequest = DispatchRequest {
        dispatch_id: None,
        description: None,
        final_description: None,
        status: DispatchStatus::Pending,
        from_station_id: Some(from),
        to_station_id: to,
        request_admin_id: admin,
        approved_admin_id: None,
        created_at: NOW.to_string(),
        updated_at: NOW.to_string(),
        deleted_at: None,
    };

    let inserted: DispatchId = persistence
        .read(|store| store.insert_dispatch(&request))
        .unwrap();

    let loaded: Option<DispatchRequest> = persistence
        .read(|store| store.get_dispatch(inserted))
        .unwrap();
    assert_eq!(loaded, None);
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_racing_creates_claim_each_vehicle_once() {
    verify_mariadb_test_environment();
    let url: String = get_mariadb_url();
    let mut seeding: Persistence = Persistence::new_with_mysql(&url).unwrap();
    let from: StationId = seeding.create_station(&unique("from")).unwrap();
    let to: StationId = seeding.create_station(&unique("to")).unwrap();
    let model: ModelId = seeding.create_vehicle_model(&unique("model")).unwrap();
    let vehicles: Vec<VehicleId> = (0..3)
        .map(|_| seeding.create_vehicle(from, model, &unique("plate")).unwrap())
        .collect();
    let admin: AuthenticatedAdmin =
        AuthenticatedAdmin::new(seeding.create_staff(to, "Admin", true).unwrap());

    let connections: Vec<Persistence> = (0..2)
        .map(|_| Persistence::new_with_mysql(&url).unwrap())
        .collect();
    let start: Arc<Barrier> = Arc::new(Barrier::new(connections.len()));
    let handles: Vec<_> = connections
        .into_iter()
        .map(|mut persistence| {
            let start = Arc::clone(&start);
            let admin: AuthenticatedAdmin = admin.clone();
            thread::spawn(move || {
                let request: CreateDispatchRequest = CreateDispatchRequest {
                    from_station_id: Some(from),
                    vehicles: vec![VehicleLineRequest {
                        model_id: model,
                        number_of_vehicle: 2,
                    }],
                    number_of_staff: None,
                    note: None,
                };
                start.wait();
                create_dispatch(&mut persistence, &admin, request, create_test_cause())
            })
        })
        .collect();
    let mut results: Vec<Result<CreateDispatchResponse, ApiError>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    results.sort_by_key(Result::is_err);

    assert!(results[0].is_ok(), "one writer must win: {results:?}");
    assert!(
        matches!(
            results[1],
            Err(ApiError::CapacityExceeded { .. } | ApiError::ConcurrentModification { .. })
        ),
        "expected the losing writer to be rejected, got {:?}",
        results[1]
    );

    let listing: Vec<ExpandedDispatch> = seeding
        .read(|store| store.get_all_expanded(&DispatchFilter::new(Some(from), None, None)))
        .unwrap();
    assert_eq!(listing.len(), 1);
    let claimed: Vec<VehicleId> = listing[0]
        .vehicles
        .iter()
        .map(|vehicle| vehicle.vehicle_id)
        .collect();
    assert_eq!(claimed, vehicles[..2].to_vec());
}
