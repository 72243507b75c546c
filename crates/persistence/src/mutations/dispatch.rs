// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleet_dispatch_domain::{DispatchId, DispatchRequest};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::encode_description;
use crate::diesel_schema::dispatch_requests;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a new dispatch row and returns its id. Any id already set on
/// `dispatch` is ignored.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn insert_dispatch(
    conn: &mut _,
    dispatch: &DispatchRequest,
) -> Result<DispatchId, PersistenceError> {
    let description: Option<String> = encode_description(dispatch.description.as_ref())?;
    let final_description: Option<String> =
        encode_description(dispatch.final_description.as_ref())?;

    diesel::insert_into(dispatch_requests::table)
        .values((
            dispatch_requests::description.eq(description),
            dispatch_requests::final_description.eq(final_description),
            dispatch_requests::status.eq(dispatch.status.as_str()),
            dispatch_requests::from_station_id.eq(dispatch.from_station_id.map(|id| id.get())),
            dispatch_requests::to_station_id.eq(dispatch.to_station_id.get()),
            dispatch_requests::request_admin_id.eq(dispatch.request_admin_id.get()),
            dispatch_requests::approved_admin_id
                .eq(dispatch.approved_admin_id.map(|id| id.get())),
            dispatch_requests::created_at.eq(&dispatch.created_at),
            dispatch_requests::updated_at.eq(&dispatch.updated_at),
            dispatch_requests::deleted_at.eq(dispatch.deleted_at.as_deref()),
        ))
        .execute(conn)?;

    let dispatch_id: DispatchId = DispatchId::new(conn.get_last_insert_rowid()?);
    debug!("Inserted {}", dispatch_id);
    Ok(dispatch_id)
}
}

backend_fn! {
/// Writes every mutable column of an existing dispatch row.
///
/// # Returns
///
/// The number of rows updated (0 if the row does not exist).
///
/// # Errors
///
/// Returns an error if the dispatch has no id, or serialization or the
/// update fails.
pub fn save_dispatch(conn: &mut _, dispatch: &DispatchRequest) -> Result<usize, PersistenceError> {
    let Some(dispatch_id) = dispatch.dispatch_id else {
        return Err(PersistenceError::NotFound(
            "Cannot save a dispatch without an id".to_string(),
        ));
    };
    let description: Option<String> = encode_description(dispatch.description.as_ref())?;
    let final_description: Option<String> =
        encode_description(dispatch.final_description.as_ref())?;

    let updated: usize = diesel::update(
        dispatch_requests::table.filter(dispatch_requests::dispatch_id.eq(dispatch_id.get())),
    )
    .set((
        dispatch_requests::description.eq(description),
        dispatch_requests::final_description.eq(final_description),
        dispatch_requests::status.eq(dispatch.status.as_str()),
        dispatch_requests::from_station_id.eq(dispatch.from_station_id.map(|id| id.get())),
        dispatch_requests::approved_admin_id.eq(dispatch.approved_admin_id.map(|id| id.get())),
        dispatch_requests::updated_at.eq(&dispatch.updated_at),
        dispatch_requests::deleted_at.eq(dispatch.deleted_at.as_deref()),
    ))
    .execute(conn)?;

    Ok(updated)
}
}
