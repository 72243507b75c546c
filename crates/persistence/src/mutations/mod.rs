// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! ## Module Organization
//!
//! - `audit`: Audit event persistence
//! - `dispatch`: Dispatch aggregate inserts and updates
//! - `relations`: Link replacement and station transfers
//! - `inventory`: Stations, models, vehicles, staff and rental contracts
//!
//! ## Backend-Specific Code
//!
//! Backend-specific helpers (e.g., `get_last_insert_rowid()`) are imported from
//! the `backend` module. All other code uses Diesel DSL exclusively.

pub mod audit;
pub mod dispatch;
pub mod inventory;
pub mod relations;

pub use audit::{persist_audit_event_mysql, persist_audit_event_sqlite};
pub use dispatch::{
    insert_dispatch_mysql, insert_dispatch_sqlite, save_dispatch_mysql, save_dispatch_sqlite,
};
pub use inventory::{
    close_rental_contract_mysql, close_rental_contract_sqlite, create_rental_contract_mysql,
    create_rental_contract_sqlite, create_staff_mysql, create_staff_sqlite, create_station_mysql,
    create_station_sqlite, create_vehicle_model_mysql, create_vehicle_model_sqlite,
    create_vehicle_mysql, create_vehicle_sqlite, set_staff_on_leave_mysql,
    set_staff_on_leave_sqlite,
};
pub use relations::{
    add_dispatch_relations_mysql, add_dispatch_relations_sqlite, clear_dispatch_relations_mysql,
    clear_dispatch_relations_sqlite, update_staff_station_for_dispatch_mysql,
    update_staff_station_for_dispatch_sqlite, update_vehicle_station_for_dispatch_mysql,
    update_vehicle_station_for_dispatch_sqlite,
};
