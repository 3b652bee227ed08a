//! Persistence boundary for employee records.
//!
//! Reads go straight through [`EmployeeStore`]. Writes that must observe a
//! check and a mutation as one unit (create, update, delete) run inside an
//! [`EmployeeTx`] obtained from [`EmployeeStore::begin`]. A unit of work that
//! is dropped without [`EmployeeTx::commit`] leaves the store unchanged.

use std::fmt;

use async_trait::async_trait;

use crate::models::employee::Employee;

pub mod memory;
pub mod postgres;

pub use memory::MemoryEmployeeStore;
pub use postgres::PgEmployeeStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// The backing store rejected a write because the email is taken.
    DuplicateEmail(String),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DuplicateEmail(email) => write!(f, "email already stored: {}", email),
            StoreError::Backend(msg) => write!(f, "store backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn begin(&self) -> StoreResult<Box<dyn EmployeeTx>>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Employee>>;

    async fn find_all(&self) -> StoreResult<Vec<Employee>>;

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool>;

    /// Exact, case-sensitive match.
    async fn find_by_department(&self, department: &str) -> StoreResult<Vec<Employee>>;

    /// Exact, case-sensitive match.
    async fn find_by_status(&self, status: &str) -> StoreResult<Vec<Employee>>;
}

#[async_trait]
pub trait EmployeeTx: Send {
    async fn find_by_id(&mut self, id: i64) -> StoreResult<Option<Employee>>;

    async fn exists_by_email(&mut self, email: &str) -> StoreResult<bool>;

    /// Inserts when `employee.id` is `None`, otherwise overwrites the row
    /// with that id. Returns the stored record with its id populated.
    async fn save(&mut self, employee: Employee) -> StoreResult<Employee>;

    async fn delete(&mut self, employee: &Employee) -> StoreResult<()>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
