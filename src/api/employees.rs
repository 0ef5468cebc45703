use actix_web::{HttpResponse, Responder, web};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::info;

use crate::auth::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::model::employee::{Employee, NewEmployee};
use crate::repository::employees;

fn duplicate_number(number: &str) -> AppError {
    AppError::Conflict(format!("Employee number {number} is already registered"))
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "The caller's employees", body = [Employee])
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> AppResult<impl Responder> {
    let mut conn = pool.acquire().await?;
    let rows = employees::list_owned(&mut conn, auth.user_id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 403, description = "Employee belongs to another user"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> AppResult<impl Responder> {
    let mut conn = pool.acquire().await?;
    let employee = employees::get_owned(&mut conn, path.into_inner(), auth.user_id).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = NewEmployee,
    responses(
        (status = 200, description = "Employee created", body = Employee),
        (status = 409, description = "Employee number already registered", body = Object, example = json!({
            "message": "Employee number 1001 is already registered"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<NewEmployee>,
) -> AppResult<impl Responder> {
    let number = payload.employee_number.trim();
    if number.is_empty() || payload.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "employee_number and name are required".into(),
        ));
    }

    let mut tx = pool.begin().await?;
    if employees::number_taken(&mut tx, auth.user_id, number, None).await? {
        return Err(duplicate_number(number));
    }
    let id = employees::insert(&mut tx, auth.user_id, &payload).await?;
    let employee = employees::get_owned(&mut tx, id, auth.user_id).await?;
    tx.commit().await?;

    info!(id, employee_number = %number, user_id = auth.user_id, "Employee created");
    Ok(HttpResponse::Ok().json(employee))
}

/// Update Employee
///
/// Partial update; only the listed fields may be sent.
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body(content = Object, example = json!({
        "name": "Hanako Suzuki",
        "remote_allowance": false
    })),
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Unknown field or invalid value"),
        (status = 403, description = "Employee belongs to another user"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Employee number already registered")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> AppResult<impl Responder> {
    let employee_id = path.into_inner();

    let mut tx = pool.begin().await?;
    employees::get_owned(&mut tx, employee_id, auth.user_id).await?;

    if let Some(number) = body.get("employee_number").and_then(Value::as_str) {
        let number = number.trim();
        if employees::number_taken(&mut tx, auth.user_id, number, Some(employee_id)).await? {
            return Err(duplicate_number(number));
        }
    }

    employees::update(&mut tx, employee_id, &body).await?;
    let employee = employees::get_owned(&mut tx, employee_id, auth.user_id).await?;
    tx.commit().await?;

    info!(employee_id, user_id = auth.user_id, "Employee updated");
    Ok(HttpResponse::Ok().json(employee))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Employee deleted successfully"
        })),
        (status = 403, description = "Employee belongs to another user"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> AppResult<impl Responder> {
    let employee_id = path.into_inner();

    let mut tx = pool.begin().await?;
    employees::get_owned(&mut tx, employee_id, auth.user_id).await?;
    employees::delete(&mut tx, employee_id).await?;
    tx.commit().await?;

    info!(employee_id, user_id = auth.user_id, "Employee deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully"
    })))
}
