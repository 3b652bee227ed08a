use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A persisted (or about to be persisted) employee record.
///
/// `id` is `None` until the store assigns one on insert and never changes
/// afterwards.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub department: String,
    pub position: String,
    pub hire_date: NaiveDate,
    pub salary: f64,
    pub address: Option<String>,
    pub status: String,
}

impl Employee {
    /// Overwrites every mutable field with the values from `patch`.
    /// The identifier is left untouched.
    pub fn apply(&mut self, patch: Employee) {
        self.first_name = patch.first_name;
        self.last_name = patch.last_name;
        self.email = patch.email;
        self.phone_number = patch.phone_number;
        self.department = patch.department;
        self.position = patch.position;
        self.hire_date = patch.hire_date;
        self.salary = patch.salary;
        self.address = patch.address;
        self.status = patch.status;
    }
}
