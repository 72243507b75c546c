// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dispatch aggregate and link queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleet_dispatch_domain::{DispatchId, DispatchLinks, DispatchRequest, StaffId, VehicleId};
use tracing::debug;

use crate::data_models::DispatchRow;
use crate::diesel_schema::{dispatch_request_staff, dispatch_request_vehicles, dispatch_requests};
use crate::error::PersistenceError;

backend_fn! {
/// Loads a dispatch aggregate, including soft-deleted rows.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `dispatch_id` - The dispatch to load
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be
/// reconstructed. Returns `Ok(None)` if no row has this id.
pub fn get_dispatch(
    conn: &mut _,
    dispatch_id: DispatchId,
) -> Result<Option<DispatchRequest>, PersistenceError> {
    debug!("Loading {}", dispatch_id);

    let result: Result<DispatchRow, diesel::result::Error> = dispatch_requests::table
        .filter(dispatch_requests::dispatch_id.eq(dispatch_id.get()))
        .select(DispatchRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_domain()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Loads the link set of a dispatch, ascending ids.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_dispatch_links(
    conn: &mut _,
    dispatch_id: DispatchId,
) -> Result<DispatchLinks, PersistenceError> {
    let staff: Vec<i64> = dispatch_request_staff::table
        .filter(dispatch_request_staff::dispatch_id.eq(dispatch_id.get()))
        .order(dispatch_request_staff::staff_id.asc())
        .select(dispatch_request_staff::staff_id)
        .load(conn)?;

    let vehicles: Vec<i64> = dispatch_request_vehicles::table
        .filter(dispatch_request_vehicles::dispatch_id.eq(dispatch_id.get()))
        .order(dispatch_request_vehicles::vehicle_id.asc())
        .select(dispatch_request_vehicles::vehicle_id)
        .load(conn)?;

    Ok(DispatchLinks::new(
        staff.into_iter().map(StaffId::new).collect(),
        vehicles.into_iter().map(VehicleId::new).collect(),
    ))
}
}
