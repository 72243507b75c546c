// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The dispatch orchestrator.
//!
//! Every mutating handler is one unit of work: the availability read, the
//! allocation decision, the state transition, the link replacement and the
//! audit event all run inside a single transaction handed out by the
//! [`UnitOfWork`]. Any error rolls the whole call back.

use fleet_dispatch::{
    AvailableVehicle, CapacityOracle, Command, CoreError, CreateDispatch, DispatchFilter,
    DispatchStore, EffectOutcome, ExpandedDispatch, SideEffect, TransitionResult, UnitOfWork,
    apply, apply_create, current_timestamp, run_effects,
};
use fleet_dispatch_audit::Cause;
use fleet_dispatch_domain::{
    AllocationPlan, AvailabilitySnapshot, DispatchDescription, DispatchEvent, DispatchId,
    DispatchLinks, DispatchRequest, DispatchStatus, DomainError, ModelId, ModelQuantity,
    ResourceRef, StaffId, StationId, VehicleId, VehicleLine, aggregate_lines, plan_allocation,
    validate_distinct_resources, validate_plan_not_empty, validate_staff_count, validate_stations,
    validate_vehicle_lines,
};
use tracing::{debug, info, warn};

use crate::AuthenticatedAdmin;
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    ConfirmDispatchRequest, CreateDispatchRequest, CreateDispatchResponse, DeleteDispatchResponse,
    DescriptionBody, DispatchResponse, ListDispatchesRequest, ListDispatchesResponse,
    UpdateDispatchRequest, UpdateDispatchResponse,
};

/// Logs a rejected command and translates its error.
fn rejected(operation: &str, err: CoreError) -> ApiError {
    let api_error: ApiError = translate_core_error(err);
    warn!(
        operation,
        kind = api_error.kind(),
        retryable = api_error.is_retryable(),
        error = %api_error,
        "Dispatch command rejected"
    );
    api_error
}

fn parse_status(value: &str) -> Result<DispatchStatus, ApiError> {
    value.parse().map_err(translate_domain_error)
}

/// Returns the station of the acting administrator.
fn admin_station(
    store: &mut dyn DispatchStore,
    admin: &AuthenticatedAdmin,
) -> Result<StationId, CoreError> {
    store
        .get_staff_station(admin.staff_id)?
        .ok_or(CoreError::StaffNotFound(admin.staff_id))
}

/// Loads a dispatch that has not been soft-deleted.
fn load_live_dispatch(
    store: &mut dyn DispatchStore,
    dispatch_id: DispatchId,
) -> Result<DispatchRequest, CoreError> {
    store
        .get_dispatch(dispatch_id)?
        .filter(|dispatch| !dispatch.is_deleted())
        .ok_or(CoreError::DispatchNotFound(dispatch_id))
}

/// Loads a live dispatch with its source station locked.
///
/// The row is read again once the lock is held, so the caller acts on what
/// the previous lock holder committed rather than on the first read.
/// `fallback_source` is locked when the dispatch has no source of its own.
fn load_locked_dispatch(
    store: &mut dyn DispatchStore,
    dispatch_id: DispatchId,
    fallback_source: Option<StationId>,
) -> Result<DispatchRequest, CoreError> {
    let current: DispatchRequest = load_live_dispatch(store, dispatch_id)?;
    match current.from_station_id.or(fallback_source) {
        Some(station_id) => {
            store.lock_station(station_id)?;
            load_live_dispatch(store, dispatch_id)
        }
        None => Ok(current),
    }
}

/// Saves the new aggregate, runs its effects and records the audit event.
fn commit_transition(
    store: &mut dyn DispatchStore,
    dispatch_id: DispatchId,
    result: TransitionResult,
) -> Result<(usize, EffectOutcome), CoreError> {
    let updated: usize = store.save_dispatch(&result.new_dispatch)?;
    let outcome: EffectOutcome = run_effects(store, dispatch_id, &result.effects)?;
    store.persist_audit_event(&result.audit_event.for_dispatch(dispatch_id))?;
    Ok((updated, outcome))
}

/// Opens a new dispatch request.
///
/// This function:
/// - Validates the line items and staff count
/// - Resolves the destination from the requesting administrator's station
/// - Locks the source station and snapshots its availability
/// - Plans the allocation and persists the request with its links
///
/// # Arguments
///
/// * `uow` - The unit of work providing the transaction
/// * `admin` - The requesting administrator
/// * `request` - The source station, line items and staff count
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The source is missing, equals the destination, or names an unknown model
/// - A quantity is not positive, or nothing at all is requested
/// - The source station or the administrator does not exist
/// - The source station cannot satisfy the request (`CapacityExceeded`)
/// - Another writer claimed the same resources first (`ConcurrentModification`)
pub fn create_dispatch<U: UnitOfWork>(
    uow: &mut U,
    admin: &AuthenticatedAdmin,
    request: CreateDispatchRequest,
    cause: Cause,
) -> Result<CreateDispatchResponse, ApiError> {
    let from_station_id: StationId = request.from_station_id.ok_or_else(|| {
        ApiError::InvalidRequest {
            field: String::from("fromStationId"),
            message: String::from("a source station is required"),
        }
    })?;

    let lines: Vec<VehicleLine> = request
        .vehicles
        .iter()
        .copied()
        .map(VehicleLine::from)
        .collect();
    let lines: Vec<ModelQuantity> =
        aggregate_lines(&validate_vehicle_lines(&lines).map_err(translate_domain_error)?);
    let staff_count: u32 =
        validate_staff_count(request.number_of_staff).map_err(translate_domain_error)?;
    validate_plan_not_empty(&lines, staff_count).map_err(translate_domain_error)?;

    let now: String = current_timestamp().map_err(translate_core_error)?;
    let note: Option<String> = request.note;

    let (dispatch_id, outcome): (DispatchId, EffectOutcome) = uow
        .transaction(|store| {
            let to_station_id: StationId = admin_station(store, admin)?;
            validate_stations(Some(from_station_id), to_station_id)?;
            store.lock_station(from_station_id)?;

            for line in &lines {
                if !store.model_exists(line.model_id)? {
                    return Err(DomainError::InvalidRequest {
                        field: String::from("vehicles.modelId"),
                        reason: format!("{} does not exist", line.model_id),
                    }
                    .into());
                }
            }

            let model_ids: Vec<ModelId> = lines.iter().map(|line| line.model_id).collect();
            let snapshot: AvailabilitySnapshot =
                CapacityOracle::new(&mut *store, None).snapshot(from_station_id, &model_ids)?;
            let plan: AllocationPlan = plan_allocation(&snapshot, &lines, staff_count)?;

            let result: TransitionResult = apply_create(
                CreateDispatch {
                    from_station_id,
                    to_station_id,
                    request_admin_id: admin.staff_id,
                    plan,
                    note,
                },
                admin.to_audit_actor(),
                cause,
                &now,
            )?;

            let dispatch_id: DispatchId = store.insert_dispatch(&result.new_dispatch)?;
            let outcome: EffectOutcome = run_effects(store, dispatch_id, &result.effects)?;
            store.persist_audit_event(&result.audit_event.for_dispatch(dispatch_id))?;
            Ok((dispatch_id, outcome))
        })
        .map_err(|err| rejected("create", err))?;

    info!(
        dispatch_id = dispatch_id.get(),
        from_station_id = from_station_id.get(),
        links = outcome.links_inserted,
        "Created dispatch request"
    );

    Ok(CreateDispatchResponse {
        id: dispatch_id.get(),
    })
}

/// Checks that every requested id is in the available set, in request
/// order, and returns the first one that is not.
fn first_unavailable<T: Copy + PartialEq>(requested: &[T], available: &[T]) -> Option<T> {
    requested
        .iter()
        .copied()
        .find(|id| !available.contains(id))
}

/// Re-plans a pending dispatch with an explicit set of staff and vehicles.
///
/// The dispatch's own claims count as released while the new ids are
/// checked, so a re-plan may keep resources it already holds.
///
/// # Arguments
///
/// * `uow` - The unit of work providing the transaction
/// * `admin` - The acting administrator
/// * `dispatch_id` - The dispatch to re-plan
/// * `request` - The requested status (must be `pending`) and the new ids
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// The number of rows written: the dispatch row plus the inserted link rows.
///
/// # Errors
///
/// Returns an error if:
/// - The status is unknown, an id is listed twice, or both lists are empty
/// - The dispatch does not exist or has been deleted (`NotFound`)
/// - The dispatch is not pending, or the requested status is not `pending`
/// - An id is missing from the source station, claimed elsewhere, rented out
///   or on leave (`ResourceUnavailable`, first offending id, vehicles first)
/// - Another writer claimed the same resources first (`ConcurrentModification`)
pub fn update_dispatch<U: UnitOfWork>(
    uow: &mut U,
    admin: &AuthenticatedAdmin,
    dispatch_id: DispatchId,
    request: UpdateDispatchRequest,
    cause: Cause,
) -> Result<UpdateDispatchResponse, ApiError> {
    let requested_status: DispatchStatus = parse_status(&request.status)?;
    validate_distinct_resources(&request.staff_ids, &request.vehicle_ids)
        .map_err(translate_domain_error)?;
    if request.staff_ids.is_empty() && request.vehicle_ids.is_empty() {
        return Err(ApiError::InvalidRequest {
            field: String::from("vehicleIds"),
            message: String::from("a dispatch must hold at least one vehicle or staff member"),
        });
    }
    let supplied_description: Option<DispatchDescription> = request
        .description
        .map(DescriptionBody::into_domain)
        .transpose()?;

    let now: String = current_timestamp().map_err(translate_core_error)?;
    let staff_ids: Vec<StaffId> = request.staff_ids;
    let vehicle_ids: Vec<VehicleId> = request.vehicle_ids;

    let (updated, outcome): (usize, EffectOutcome) = uow
        .transaction(|store| {
            admin_station(store, admin)?;
            let current: DispatchRequest = load_locked_dispatch(store, dispatch_id, None)?;
            current.status.apply_event(DispatchEvent::Update)?;
            if requested_status != DispatchStatus::Pending {
                return Err(DomainError::UpdateRequiresPending(requested_status).into());
            }
            let from_station_id: StationId = current
                .from_station_id
                .ok_or(DomainError::MissingFromStation(dispatch_id))?;

            let available_vehicles: Vec<AvailableVehicle> = store.get_available_vehicles_by_ids(
                from_station_id,
                &vehicle_ids,
                Some(dispatch_id),
            )?;
            let available_vehicle_ids: Vec<VehicleId> = available_vehicles
                .iter()
                .map(|vehicle| vehicle.vehicle_id)
                .collect();
            if let Some(vehicle_id) = first_unavailable(&vehicle_ids, &available_vehicle_ids) {
                return Err(CoreError::ResourceUnavailable(ResourceRef::Vehicle(
                    vehicle_id,
                )));
            }

            let available_staff: Vec<StaffId> =
                store.get_available_staff_by_ids(from_station_id, &staff_ids, Some(dispatch_id))?;
            if let Some(staff_id) = first_unavailable(&staff_ids, &available_staff) {
                return Err(CoreError::ResourceUnavailable(ResourceRef::Staff(staff_id)));
            }

            let description: DispatchDescription = supplied_description.unwrap_or_else(|| {
                let models: Vec<ModelId> = vehicle_ids
                    .iter()
                    .filter_map(|id| {
                        available_vehicles
                            .iter()
                            .find(|vehicle| vehicle.vehicle_id == *id)
                            .map(|vehicle| vehicle.model_id)
                    })
                    .collect();
                let staff_count: u32 = u32::try_from(staff_ids.len()).unwrap_or(u32::MAX);
                let note: Option<String> =
                    current.description.as_ref().and_then(|d| d.note.clone());
                DispatchDescription::from_models(&models, staff_count, note)
            });

            let result: TransitionResult = apply(
                &current,
                Command::Update {
                    requested_status,
                    links: DispatchLinks::new(staff_ids.clone(), vehicle_ids.clone()),
                    description,
                },
                admin.to_audit_actor(),
                cause,
                &now,
            )?;
            commit_transition(store, dispatch_id, result)
        })
        .map_err(|err| rejected("update", err))?;

    info!(
        dispatch_id = dispatch_id.get(),
        staff = staff_ids.len(),
        vehicles = vehicle_ids.len(),
        links = outcome.links_inserted,
        "Re-planned dispatch request"
    );

    Ok(UpdateDispatchResponse {
        updated: updated + outcome.links_inserted,
    })
}

/// Approves or rejects a pending dispatch.
///
/// Approval moves every linked vehicle and staff member to the destination
/// station. Rejection releases the claims and keeps the links for audit.
///
/// # Arguments
///
/// * `uow` - The unit of work providing the transaction
/// * `admin` - The deciding administrator
/// * `dispatch_id` - The dispatch to decide
/// * `request` - The decision, plus source station and final description
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// The expanded view of the decided dispatch.
///
/// # Errors
///
/// Returns an error if:
/// - The decision is not `approved` or `rejected`
/// - The dispatch does not exist or has been deleted (`NotFound`)
/// - The dispatch has already been decided (`InvalidStateTransition`)
/// - No source station can be resolved (`MissingFromStation`)
/// - An approval has no final description (`MissingFinalDescription`)
/// - The supplied source conflicts with the planned one or equals the destination
/// - A source first supplied at approval does not hold every linked resource
pub fn confirm_dispatch<U: UnitOfWork>(
    uow: &mut U,
    admin: &AuthenticatedAdmin,
    dispatch_id: DispatchId,
    request: ConfirmDispatchRequest,
    cause: Cause,
) -> Result<DispatchResponse, ApiError> {
    let decision: DispatchStatus = parse_status(&request.status)?;
    let final_description: Option<DispatchDescription> = request
        .final_description
        .map(DescriptionBody::into_domain)
        .transpose()?;
    let now: String = current_timestamp().map_err(translate_core_error)?;

    let (view, outcome): (ExpandedDispatch, EffectOutcome) = uow
        .transaction(|store| {
            admin_station(store, admin)?;
            // A source first named at approval is locked too; a rejection
            // never moves anything out of it.
            let supplied_source: Option<StationId> = request
                .from_station_id
                .filter(|_| decision == DispatchStatus::Approved);
            let current: DispatchRequest =
                load_locked_dispatch(store, dispatch_id, supplied_source)?;

            let result: TransitionResult = apply(
                &current,
                Command::Confirm {
                    decision,
                    approved_admin_id: admin.staff_id,
                    from_station_id: request.from_station_id,
                    final_description,
                },
                admin.to_audit_actor(),
                cause,
                &now,
            )?;
            let (_, outcome) = commit_transition(store, dispatch_id, result)?;

            let view: ExpandedDispatch = store
                .get_by_id_with_full_info(dispatch_id)?
                .ok_or(CoreError::DispatchNotFound(dispatch_id))?;
            Ok((view, outcome))
        })
        .map_err(|err| rejected("confirm", err))?;

    info!(
        dispatch_id = dispatch_id.get(),
        status = %view.status,
        staff_moved = outcome.staff_moved,
        vehicles_moved = outcome.vehicles_moved,
        "Decided dispatch request"
    );

    Ok(DispatchResponse::from(view))
}

/// Soft-deletes a dispatch. A pending dispatch releases its claims at once.
///
/// # Errors
///
/// Returns `NotFound` if the dispatch does not exist or was already
/// deleted, or an error if the administrator is unknown or storage fails.
pub fn delete_dispatch<U: UnitOfWork>(
    uow: &mut U,
    admin: &AuthenticatedAdmin,
    dispatch_id: DispatchId,
    cause: Cause,
) -> Result<DeleteDispatchResponse, ApiError> {
    let now: String = current_timestamp().map_err(translate_core_error)?;

    let released_claims: bool = uow
        .transaction(|store| {
            admin_station(store, admin)?;
            let current: DispatchRequest = load_locked_dispatch(store, dispatch_id, None)?;
            let result: TransitionResult = apply(
                &current,
                Command::SoftDelete,
                admin.to_audit_actor(),
                cause,
                &now,
            )?;
            let released: bool = result.effects.contains(&SideEffect::ReleaseClaims);
            commit_transition(store, dispatch_id, result)?;
            Ok(released)
        })
        .map_err(|err| rejected("delete", err))?;

    info!(
        dispatch_id = dispatch_id.get(),
        released_claims, "Deleted dispatch request"
    );

    Ok(DeleteDispatchResponse {
        id: dispatch_id.get(),
        released_claims,
    })
}

/// Lists expanded dispatches, ordered by id, without soft-deleted ones.
///
/// Read-only: runs against a read snapshot and takes no writer lock.
///
/// # Errors
///
/// Returns `InvalidRequest` for an unknown status filter, or an error if
/// storage fails.
pub fn get_expanded<U: UnitOfWork>(
    uow: &mut U,
    request: &ListDispatchesRequest,
) -> Result<ListDispatchesResponse, ApiError> {
    let status: Option<DispatchStatus> = request
        .status
        .as_deref()
        .map(parse_status)
        .transpose()?;
    let filter: DispatchFilter =
        DispatchFilter::new(request.from_station_id, request.to_station_id, status);

    let views: Vec<ExpandedDispatch> = uow
        .read(|store| store.get_all_expanded(&filter))
        .map_err(translate_core_error)?;

    debug!(count = views.len(), "Listed dispatch requests");

    Ok(ListDispatchesResponse {
        dispatches: views.into_iter().map(DispatchResponse::from).collect(),
    })
}

/// Returns the expanded view of one dispatch.
///
/// # Errors
///
/// Returns `NotFound` if the dispatch does not exist or has been deleted,
/// or an error if storage fails.
pub fn get_dispatch<U: UnitOfWork>(
    uow: &mut U,
    dispatch_id: DispatchId,
) -> Result<DispatchResponse, ApiError> {
    uow.read(|store| {
        store
            .get_by_id_with_full_info(dispatch_id)?
            .ok_or(CoreError::DispatchNotFound(dispatch_id))
    })
    .map(DispatchResponse::from)
    .map_err(translate_core_error)
}
