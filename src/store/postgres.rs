use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::employee::Employee;
use crate::store::{EmployeeStore, EmployeeTx, StoreError, StoreResult};

const EMPLOYEE_COLUMNS: &str = "id, first_name, last_name, email, phone_number, department, \
     position, hire_date, salary, address, status";

const EMAIL_UNIQUE_CONSTRAINT: &str = "employees_email_key";

pub struct PgEmployeeStore {
    pool: PgPool,
}

impl PgEmployeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_where(&self, column: &str, value: &str) -> StoreResult<Vec<Employee>> {
        let sql = format!(
            "SELECT {} FROM employees WHERE {} = $1 ORDER BY id",
            EMPLOYEE_COLUMNS, column
        );
        let employees = sqlx::query_as::<_, Employee>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn begin(&self) -> StoreResult<Box<dyn EmployeeTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgEmployeeTx { tx }))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Employee>> {
        let sql = format!("SELECT {} FROM employees WHERE id = $1", EMPLOYEE_COLUMNS);
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn find_all(&self) -> StoreResult<Vec<Employee>> {
        let sql = format!("SELECT {} FROM employees ORDER BY id", EMPLOYEE_COLUMNS);
        let employees = sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn find_by_department(&self, department: &str) -> StoreResult<Vec<Employee>> {
        self.find_where("department", department).await
    }

    async fn find_by_status(&self, status: &str) -> StoreResult<Vec<Employee>> {
        self.find_where("status", status).await
    }
}

pub struct PgEmployeeTx {
    tx: Transaction<'static, Postgres>,
}

/// A unique violation on the email index becomes `DuplicateEmail`.
fn map_write_error(err: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT) {
            return StoreError::DuplicateEmail(email.to_string());
        }
    }
    StoreError::from(err)
}

#[async_trait]
impl EmployeeTx for PgEmployeeTx {
    async fn find_by_id(&mut self, id: i64) -> StoreResult<Option<Employee>> {
        let sql = format!(
            "SELECT {} FROM employees WHERE id = $1 FOR UPDATE",
            EMPLOYEE_COLUMNS
        );
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(employee)
    }

    async fn exists_by_email(&mut self, email: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE email = $1)")
                .bind(email)
                .fetch_one(&mut *self.tx)
                .await?;
        Ok(exists)
    }

    async fn save(&mut self, employee: Employee) -> StoreResult<Employee> {
        let sql = match employee.id {
            None => format!(
                "INSERT INTO employees (first_name, last_name, email, phone_number, department, \
                 position, hire_date, salary, address, status) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {}",
                EMPLOYEE_COLUMNS
            ),
            Some(_) => format!(
                "UPDATE employees SET first_name = $1, last_name = $2, email = $3, \
                 phone_number = $4, department = $5, position = $6, hire_date = $7, \
                 salary = $8, address = $9, status = $10 WHERE id = $11 RETURNING {}",
                EMPLOYEE_COLUMNS
            ),
        };
        let mut query = sqlx::query_as::<_, Employee>(&sql)
            .bind(&employee.first_name)
            .bind(&employee.last_name)
            .bind(&employee.email)
            .bind(&employee.phone_number)
            .bind(&employee.department)
            .bind(&employee.position)
            .bind(employee.hire_date)
            .bind(employee.salary)
            .bind(&employee.address)
            .bind(&employee.status);
        if let Some(id) = employee.id {
            query = query.bind(id);
        }

        query
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|err| map_write_error(err, &employee.email))
    }

    async fn delete(&mut self, employee: &Employee) -> StoreResult<()> {
        let Some(id) = employee.id else {
            return Ok(());
        };
        sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    #[derive(Debug)]
    struct FakeDbError {
        kind: ErrorKind,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "fake database error")
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "fake database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            match self.kind {
                ErrorKind::UniqueViolation => Some(Cow::Borrowed("23505")),
                _ => None,
            }
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn kind(&self) -> ErrorKind {
            match self.kind {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::CheckViolation => ErrorKind::CheckViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn db_error(kind: ErrorKind, constraint: Option<&'static str>) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError { kind, constraint }))
    }

    #[test]
    fn email_unique_violation_is_duplicate_email() {
        let err = map_write_error(
            db_error(ErrorKind::UniqueViolation, Some(EMAIL_UNIQUE_CONSTRAINT)),
            "ann@x.com",
        );
        assert!(matches!(err, StoreError::DuplicateEmail(email) if email == "ann@x.com"));
    }

    #[test]
    fn other_unique_violation_is_backend_error() {
        let err = map_write_error(
            db_error(ErrorKind::UniqueViolation, Some("employees_pkey")),
            "ann@x.com",
        );
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn check_violation_is_backend_error() {
        let err = map_write_error(
            db_error(ErrorKind::CheckViolation, Some("employees_salary_check")),
            "ann@x.com",
        );
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn non_database_errors_are_backend_errors() {
        let err = map_write_error(sqlx::Error::RowNotFound, "ann@x.com");
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
