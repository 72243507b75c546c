// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Inventory seeding.
//!
//! Stations, vehicle models, vehicles and staff are created here. Moving a
//! vehicle or staff member between stations is reserved to dispatch
//! approval and is not offered by this module.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleet_dispatch_domain::{ModelId, StaffId, StationId, VehicleId};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{rental_contracts, staff, stations, vehicle_models, vehicles};
use crate::error::PersistenceError;

backend_fn! {
/// Creates a station.
///
/// # Errors
///
/// Returns an error if the name is already taken or the insert fails.
pub fn create_station(conn: &mut _, name: &str) -> Result<StationId, PersistenceError> {
    diesel::insert_into(stations::table)
        .values(stations::name.eq(name))
        .execute(conn)?;
    let station_id: StationId = StationId::new(conn.get_last_insert_rowid()?);
    info!(station_id = station_id.get(), name, "Created station");
    Ok(station_id)
}
}

backend_fn! {
/// Creates a vehicle model.
///
/// # Errors
///
/// Returns an error if the name is already taken or the insert fails.
pub fn create_vehicle_model(conn: &mut _, name: &str) -> Result<ModelId, PersistenceError> {
    diesel::insert_into(vehicle_models::table)
        .values(vehicle_models::name.eq(name))
        .execute(conn)?;
    let model_id: ModelId = ModelId::new(conn.get_last_insert_rowid()?);
    info!(model_id = model_id.get(), name, "Created vehicle model");
    Ok(model_id)
}
}

backend_fn! {
/// Creates a vehicle at a station.
///
/// # Errors
///
/// Returns an error if the station or model does not exist, the plate is
/// already registered, or the insert fails.
pub fn create_vehicle(
    conn: &mut _,
    station_id: StationId,
    model_id: ModelId,
    license_plate: &str,
) -> Result<VehicleId, PersistenceError> {
    diesel::insert_into(vehicles::table)
        .values((
            vehicles::station_id.eq(station_id.get()),
            vehicles::model_id.eq(model_id.get()),
            vehicles::license_plate.eq(license_plate),
        ))
        .execute(conn)?;
    let vehicle_id: VehicleId = VehicleId::new(conn.get_last_insert_rowid()?);
    info!(
        vehicle_id = vehicle_id.get(),
        station_id = station_id.get(),
        license_plate,
        "Created vehicle"
    );
    Ok(vehicle_id)
}
}

backend_fn! {
/// Creates a staff member at a station.
///
/// # Errors
///
/// Returns an error if the station does not exist or the insert fails.
pub fn create_staff(
    conn: &mut _,
    station_id: StationId,
    name: &str,
    is_admin: bool,
) -> Result<StaffId, PersistenceError> {
    diesel::insert_into(staff::table)
        .values((
            staff::station_id.eq(station_id.get()),
            staff::name.eq(name),
            staff::is_admin.eq(i32::from(is_admin)),
            staff::is_on_leave.eq(0),
        ))
        .execute(conn)?;
    let staff_id: StaffId = StaffId::new(conn.get_last_insert_rowid()?);
    info!(
        staff_id = staff_id.get(),
        station_id = station_id.get(),
        is_admin,
        "Created staff member"
    );
    Ok(staff_id)
}
}

backend_fn! {
/// Marks a staff member as on leave or back at work.
///
/// # Errors
///
/// Returns `NotFound` if the staff member does not exist, or an error if
/// the update fails.
pub fn set_staff_on_leave(
    conn: &mut _,
    staff_id: StaffId,
    on_leave: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(staff::table.filter(staff::staff_id.eq(staff_id.get())))
        .set(staff::is_on_leave.eq(i32::from(on_leave)))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("{staff_id}")));
    }
    Ok(())
}
}

backend_fn! {
/// Opens an active rental contract on a vehicle.
///
/// # Errors
///
/// Returns an error if the vehicle does not exist or the insert fails.
pub fn create_rental_contract(
    conn: &mut _,
    vehicle_id: VehicleId,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(rental_contracts::table)
        .values((
            rental_contracts::vehicle_id.eq(vehicle_id.get()),
            rental_contracts::is_active.eq(1),
        ))
        .execute(conn)?;
    let contract_id: i64 = conn.get_last_insert_rowid()?;
    info!(contract_id, vehicle_id = vehicle_id.get(), "Opened rental contract");
    Ok(contract_id)
}
}

backend_fn! {
/// Closes a rental contract, returning the vehicle to the pool.
///
/// # Errors
///
/// Returns `NotFound` if the contract does not exist, or an error if the
/// update fails.
pub fn close_rental_contract(conn: &mut _, contract_id: i64) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        rental_contracts::table.filter(rental_contracts::contract_id.eq(contract_id)),
    )
    .set(rental_contracts::is_active.eq(0))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "rental contract {contract_id}"
        )));
    }
    info!(contract_id, "Closed rental contract");
    Ok(())
}
}
