// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Subcommands and their execution against a [`Persistence`] handle.

use clap::Subcommand;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::info;

use fleet_dispatch_api::{
    ApiError, AuthenticatedAdmin, ConfirmDispatchRequest, CreateDispatchRequest, DescriptionBody,
    ListDispatchesRequest, UpdateDispatchRequest, VehicleLineRequest, confirm_dispatch,
    create_dispatch, delete_dispatch, get_dispatch, get_expanded, update_dispatch,
};
use fleet_dispatch_audit::Cause;
use fleet_dispatch_domain::{DispatchId, ModelId, StaffId, StationId, VehicleId};
use fleet_dispatch_persistence::{Persistence, PersistenceError};

/// Errors a subcommand can end with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("--actor is required for '{0}'")]
    MissingActor(&'static str),
    #[error("Could not render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Returns a stable snake-case name for this error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Api(err) => err.kind(),
            Self::Persistence(_) => "persistence",
            Self::MissingActor(_) => "missing_actor",
            Self::Output(_) => "output",
        }
    }
}

/// Rental contract actions.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RentalAction {
    /// Opens an active contract on a vehicle.
    Open { vehicle: i64 },
    /// Closes a contract, returning its vehicle to the pool.
    Close { contract: i64 },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Registers a station.
    Station { name: String },
    /// Registers a vehicle model.
    Model { name: String },
    /// Registers a vehicle at a station.
    Vehicle {
        #[arg(long)]
        station: i64,
        #[arg(long)]
        model: i64,
        #[arg(long)]
        plate: String,
    },
    /// Registers a staff member at a station.
    Staff {
        #[arg(long)]
        station: i64,
        #[arg(long)]
        name: String,
        /// The staff member may issue dispatch commands.
        #[arg(long)]
        admin: bool,
    },
    /// Puts a staff member on leave, or back to work with `--back`.
    Leave {
        staff: i64,
        #[arg(long)]
        back: bool,
    },
    /// Opens or closes rental contracts.
    Rental {
        #[command(subcommand)]
        action: RentalAction,
    },
    /// Requests resources from another station.
    Create {
        /// Source station.
        #[arg(long)]
        from: Option<i64>,
        /// A `MODEL=COUNT` line. Repeat for several models.
        #[arg(long = "vehicles", value_parser = parse_vehicle_line)]
        vehicles: Vec<VehicleLineRequest>,
        /// Number of staff to send.
        #[arg(long)]
        staff: Option<i64>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Replaces the concrete resources of a pending dispatch.
    Update {
        id: i64,
        #[arg(long, default_value = "pending")]
        status: String,
        #[arg(long, value_delimiter = ',')]
        staff_ids: Vec<i64>,
        #[arg(long, value_delimiter = ',')]
        vehicle_ids: Vec<i64>,
        /// Description as JSON, regenerated from the vehicles when absent.
        #[arg(long, value_parser = parse_description)]
        description: Option<DescriptionBody>,
    },
    /// Approves or rejects a pending dispatch.
    Confirm {
        id: i64,
        /// `approved` or `rejected`.
        #[arg(long)]
        status: String,
        #[arg(long)]
        from: Option<i64>,
        /// Final description as JSON. Required to approve.
        #[arg(long, value_parser = parse_description)]
        final_description: Option<DescriptionBody>,
    },
    /// Soft-deletes a dispatch.
    Delete { id: i64 },
    /// Prints one dispatch with every reference resolved.
    Show { id: i64 },
    /// Lists live dispatches.
    List {
        #[arg(long)]
        from: Option<i64>,
        #[arg(long)]
        to: Option<i64>,
        #[arg(long)]
        status: Option<String>,
    },
}

impl Command {
    /// The subcommand name, used in causes and messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Station { .. } => "station",
            Self::Model { .. } => "model",
            Self::Vehicle { .. } => "vehicle",
            Self::Staff { .. } => "staff",
            Self::Leave { .. } => "leave",
            Self::Rental { .. } => "rental",
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Confirm { .. } => "confirm",
            Self::Delete { .. } => "delete",
            Self::Show { .. } => "show",
            Self::List { .. } => "list",
        }
    }
}

/// Parses a `MODEL=COUNT` vehicle line.
///
/// # Errors
///
/// Returns a message if either side is not an integer.
pub fn parse_vehicle_line(value: &str) -> Result<VehicleLineRequest, String> {
    let (model, count) = value
        .split_once('=')
        .ok_or_else(|| format!("expected MODEL=COUNT, got '{value}'"))?;
    let model_id: i64 = model
        .trim()
        .parse()
        .map_err(|_| format!("invalid model id '{model}'"))?;
    let number_of_vehicle: i64 = count
        .trim()
        .parse()
        .map_err(|_| format!("invalid vehicle count '{count}'"))?;
    Ok(VehicleLineRequest {
        model_id: ModelId::new(model_id),
        number_of_vehicle,
    })
}

/// Parses a JSON description body.
///
/// # Errors
///
/// Returns the JSON error message if the body does not parse.
pub fn parse_description(value: &str) -> Result<DescriptionBody, String> {
    serde_json::from_str(value).map_err(|err| err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, CliError> {
    Ok(serde_json::to_value(value)?)
}

fn require_actor<'a>(
    actor: Option<&'a AuthenticatedAdmin>,
    command: &'static str,
) -> Result<&'a AuthenticatedAdmin, CliError> {
    actor.ok_or(CliError::MissingActor(command))
}

/// Runs one subcommand and returns the JSON value to print.
///
/// # Errors
///
/// Returns an error if the command is rejected or storage fails.
pub fn run(
    persistence: &mut Persistence,
    actor: Option<&AuthenticatedAdmin>,
    command: Command,
    cause: Cause,
) -> Result<Value, CliError> {
    let command_name: &'static str = command.name();
    match command {
        Command::Station { name } => {
            let id: StationId = persistence.create_station(&name)?;
            info!(station_id = id.get(), name = %name, "Registered station");
            Ok(json!({ "id": id }))
        }
        Command::Model { name } => {
            let id: ModelId = persistence.create_vehicle_model(&name)?;
            info!(model_id = id.get(), name = %name, "Registered vehicle model");
            Ok(json!({ "id": id }))
        }
        Command::Vehicle {
            station,
            model,
            plate,
        } => {
            let id: VehicleId = persistence.create_vehicle(
                StationId::new(station),
                ModelId::new(model),
                &plate,
            )?;
            info!(vehicle_id = id.get(), station, "Registered vehicle");
            Ok(json!({ "id": id }))
        }
        Command::Staff {
            station,
            name,
            admin,
        } => {
            let id: StaffId = persistence.create_staff(StationId::new(station), &name, admin)?;
            info!(staff_id = id.get(), station, admin, "Registered staff member");
            Ok(json!({ "id": id }))
        }
        Command::Leave { staff, back } => {
            persistence.set_staff_on_leave(StaffId::new(staff), !back)?;
            Ok(json!({ "id": staff, "onLeave": !back }))
        }
        Command::Rental { action } => match action {
            RentalAction::Open { vehicle } => {
                let id: i64 = persistence.create_rental_contract(VehicleId::new(vehicle))?;
                Ok(json!({ "id": id, "active": true }))
            }
            RentalAction::Close { contract } => {
                persistence.close_rental_contract(contract)?;
                Ok(json!({ "id": contract, "active": false }))
            }
        },
        Command::Create {
            from,
            vehicles,
            staff,
            note,
        } => {
            let admin: &AuthenticatedAdmin = require_actor(actor, command_name)?;
            let request: CreateDispatchRequest = CreateDispatchRequest {
                from_station_id: from.map(StationId::new),
                vehicles,
                number_of_staff: staff,
                note,
            };
            to_json(&create_dispatch(persistence, admin, request, cause)?)
        }
        Command::Update {
            id,
            status,
            staff_ids,
            vehicle_ids,
            description,
        } => {
            let admin: &AuthenticatedAdmin = require_actor(actor, command_name)?;
            let request: UpdateDispatchRequest = UpdateDispatchRequest {
                status,
                staff_ids: staff_ids.into_iter().map(StaffId::new).collect(),
                vehicle_ids: vehicle_ids.into_iter().map(VehicleId::new).collect(),
                description,
            };
            let response = update_dispatch(persistence, admin, DispatchId::new(id), request, cause)?;
            to_json(&response)
        }
        Command::Confirm {
            id,
            status,
            from,
            final_description,
        } => {
            let admin: &AuthenticatedAdmin = require_actor(actor, command_name)?;
            let request: ConfirmDispatchRequest = ConfirmDispatchRequest {
                status,
                from_station_id: from.map(StationId::new),
                final_description,
            };
            let response =
                confirm_dispatch(persistence, admin, DispatchId::new(id), request, cause)?;
            to_json(&response)
        }
        Command::Delete { id } => {
            let admin: &AuthenticatedAdmin = require_actor(actor, command_name)?;
            to_json(&delete_dispatch(persistence, admin, DispatchId::new(id), cause)?)
        }
        Command::Show { id } => to_json(&get_dispatch(persistence, DispatchId::new(id))?),
        Command::List { from, to, status } => {
            let request: ListDispatchesRequest = ListDispatchesRequest {
                from_station_id: from.map(StationId::new),
                to_station_id: to.map(StationId::new),
                status,
            };
            to_json(&get_expanded(persistence, &request)?)
        }
    }
}
