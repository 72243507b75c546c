// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleet_dispatch_audit::AuditEvent;
use fleet_dispatch_domain::DispatchId;

use crate::data_models::AuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves the audit trail of one dispatch in commit order.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `dispatch_id` - The dispatch whose events to load
///
/// # Errors
///
/// Returns an error if the query fails or an event cannot be deserialized.
pub fn get_audit_events_for_dispatch(
    conn: &mut _,
    dispatch_id: DispatchId,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::dispatch_id.eq(dispatch_id.get()))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AuditEventRow::into_domain).collect()
}
}
