use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::errors::AppError;
use crate::models::employee::Employee;
use crate::services::employee::EmployeeService;
use crate::utils::validation::{validate_not_blank, validate_payload, validate_phone_number};

/// Body accepted by create and update. Any `id` sent by the client is
/// accepted and discarded.
#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(
        length(max = 50, message = "First name must be at most 50 characters"),
        custom(function = "validate_not_blank", message = "First name is required")
    )]
    pub first_name: String,
    #[validate(
        length(max = 50, message = "Last name must be at most 50 characters"),
        custom(function = "validate_not_blank", message = "Last name is required")
    )]
    pub last_name: String,
    #[validate(email(message = "Email should be valid"))]
    pub email: String,
    #[validate(custom = "validate_phone_number")]
    pub phone_number: String,
    #[validate(
        length(max = 100, message = "Department must be at most 100 characters"),
        custom(function = "validate_not_blank", message = "Department is required")
    )]
    pub department: String,
    #[validate(
        length(max = 100, message = "Position must be at most 100 characters"),
        custom(function = "validate_not_blank", message = "Position is required")
    )]
    pub position: String,
    pub hire_date: NaiveDate,
    #[validate(range(min = 0.0, message = "Salary must not be negative"))]
    pub salary: f64,
    #[serde(default)]
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
    #[validate(
        length(max = 20, message = "Status must be at most 20 characters"),
        custom(function = "validate_not_blank", message = "Status is required")
    )]
    pub status: String,
}

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee {
            id: None,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone_number: req.phone_number,
            department: req.department,
            position: req.position,
            hire_date: req.hire_date,
            salary: req.salary,
            address: req.address,
            status: req.status,
        }
    }
}

pub async fn create_employee(
    service: web::Data<EmployeeService>,
    payload: web::Json<EmployeeRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*payload)?;

    let created = service.create_employee(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn get_employees(service: web::Data<EmployeeService>) -> Result<HttpResponse, AppError> {
    let employees = service.get_all_employees().await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_employee(
    service: web::Data<EmployeeService>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let employee = service.get_employee_by_id(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn update_employee(
    service: web::Data<EmployeeService>,
    id: web::Path<i64>,
    payload: web::Json<EmployeeRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*payload)?;

    let updated = service
        .update_employee(id.into_inner(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_employee(
    service: web::Data<EmployeeService>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    service.delete_employee(id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully",
        "id": id.to_string(),
    })))
}

pub async fn get_employees_by_department(
    service: web::Data<EmployeeService>,
    department: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employees = service.get_employees_by_department(&department).await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_employees_by_status(
    service: web::Data<EmployeeService>,
    status: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employees = service.get_employees_by_status(&status).await?;
    Ok(HttpResponse::Ok().json(employees))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EmployeeRequest {
        serde_json::from_value(json!({
            "firstName": "Ann",
            "lastName": "Lee",
            "email": "ann@x.com",
            "phoneNumber": "5551234567",
            "department": "Sales",
            "position": "Rep",
            "hireDate": "2024-02-01",
            "salary": 40000,
            "status": "ACTIVE"
        }))
        .unwrap()
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn blank_names_and_bad_email_are_reported_per_field() {
        let mut req = request();
        req.first_name.clear();
        req.email = "not-an-email".into();
        req.salary = -1.0;

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("salary"));
        assert!(!fields.contains_key("last_name"));
    }

    #[test]
    fn whitespace_only_text_is_rejected() {
        let mut req = request();
        req.first_name = "   ".into();
        req.last_name = "\t".into();
        req.department = " ".into();
        req.position = "  ".into();
        req.status = " ".into();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["first_name", "last_name", "department", "position", "status"] {
            assert!(fields.contains_key(field), "{} should be rejected", field);
        }
        assert_eq!(
            fields["first_name"][0].message.as_deref(),
            Some("First name is required")
        );
    }

    #[test]
    fn overlong_address_is_rejected() {
        let mut req = request();
        req.address = Some("x".repeat(256));
        assert!(req.validate().unwrap_err().field_errors().contains_key("address"));
    }

    #[test]
    fn conversion_drops_client_id() {
        let mut req = request();
        req.id = Some(12);
        let employee: Employee = req.into();
        assert_eq!(employee.id, None);
        assert_eq!(employee.hire_date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }
}
