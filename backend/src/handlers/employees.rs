//! HTTP handlers for employee, attendance and payroll endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::services::employees::{
    AttendanceRecord, AttendanceView, CreateEmployeeInput, EmployeeRecord, EmployeeService,
    PayrollRecord, PayrollSummary, UpdateEmployeeInput,
};
use crate::AppState;
use shared::models::Role;

/// List employees
pub async fn list_employees(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<EmployeeRecord>>> {
    let service = EmployeeService::new(state.db);
    let employees = service.list_employees().await?;
    Ok(Json(employees))
}

/// Get an employee
pub async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<EmployeeRecord>> {
    let service = EmployeeService::new(state.db);
    let employee = service.get_employee(employee_id).await?;
    Ok(Json(employee))
}

/// Add an employee
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<CreateEmployeeInput>,
) -> AppResult<Json<EmployeeRecord>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = EmployeeService::new(state.db);
    let employee = service.create_employee(input).await?;
    Ok(Json(employee))
}

/// Update an employee's name or rate
pub async fn update_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(employee_id): Path<Uuid>,
    Json(input): Json<UpdateEmployeeInput>,
) -> AppResult<Json<EmployeeRecord>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = EmployeeService::new(state.db);
    let employee = service.update_employee(employee_id, input).await?;
    Ok(Json(employee))
}

/// Start a shift at the caller's store
pub async fn check_in(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<AttendanceRecord>> {
    let service = EmployeeService::new(state.db);
    let attendance = service.check_in(employee_id, auth.store_id).await?;
    Ok(Json(attendance))
}

/// End the open shift and accrue the pay
pub async fn check_out(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<AttendanceView>> {
    let service = EmployeeService::new(state.db);
    let attendance = service.check_out(employee_id).await?;
    Ok(Json(attendance))
}

/// Timesheet for an employee
pub async fn attendance_history(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Vec<AttendanceView>>> {
    let service = EmployeeService::new(state.db);
    let history = service.attendance_history(employee_id).await?;
    Ok(Json(history))
}

/// Preview the next payroll for an employee
pub async fn payroll_summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<PayrollSummary>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = EmployeeService::new(state.db);
    let summary = service.payroll_summary(employee_id).await?;
    Ok(Json(summary))
}

/// Cut a payroll for an employee
pub async fn create_payroll(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<PayrollRecord>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = EmployeeService::new(state.db);
    let payroll = service.create_payroll(employee_id).await?;
    Ok(Json(payroll))
}

/// Settled payrolls for an employee
pub async fn payroll_history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Vec<PayrollRecord>>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = EmployeeService::new(state.db);
    let history = service.payroll_history(employee_id).await?;
    Ok(Json(history))
}
