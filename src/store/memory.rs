//! In-process backend.
//!
//! A unit of work holds the collection lock until it commits or is dropped,
//! so check-then-write sequences never interleave. Writes are staged on a
//! copy and only published on commit.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::employee::Employee;
use crate::store::{EmployeeStore, EmployeeTx, StoreError, StoreResult};

#[derive(Clone, Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Employee>,
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|row| row.email == email && row.id != except)
    }

    fn matching<F>(&self, pred: F) -> Vec<Employee>
    where
        F: Fn(&Employee) -> bool,
    {
        self.rows.values().filter(|row| pred(row)).cloned().collect()
    }
}

#[derive(Clone, Default)]
pub struct MemoryEmployeeStore {
    table: Arc<Mutex<Table>>,
}

impl MemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn begin(&self) -> StoreResult<Box<dyn EmployeeTx>> {
        let guard = self.table.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryEmployeeTx { guard, staged }))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Employee>> {
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Employee>> {
        Ok(self.table.lock().await.matching(|_| true))
    }

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        Ok(self.table.lock().await.email_taken(email, None))
    }

    async fn find_by_department(&self, department: &str) -> StoreResult<Vec<Employee>> {
        Ok(self
            .table
            .lock()
            .await
            .matching(|row| row.department == department))
    }

    async fn find_by_status(&self, status: &str) -> StoreResult<Vec<Employee>> {
        Ok(self.table.lock().await.matching(|row| row.status == status))
    }
}

pub struct MemoryEmployeeTx {
    guard: OwnedMutexGuard<Table>,
    staged: Table,
}

#[async_trait]
impl EmployeeTx for MemoryEmployeeTx {
    async fn find_by_id(&mut self, id: i64) -> StoreResult<Option<Employee>> {
        Ok(self.staged.rows.get(&id).cloned())
    }

    async fn exists_by_email(&mut self, email: &str) -> StoreResult<bool> {
        Ok(self.staged.email_taken(email, None))
    }

    async fn save(&mut self, mut employee: Employee) -> StoreResult<Employee> {
        if self.staged.email_taken(&employee.email, employee.id) {
            return Err(StoreError::DuplicateEmail(employee.email));
        }
        let id = match employee.id {
            Some(id) if self.staged.rows.contains_key(&id) => id,
            Some(id) => return Err(StoreError::Backend(format!("no employee row with id {}", id))),
            None => {
                self.staged.last_id += 1;
                self.staged.last_id
            }
        };
        employee.id = Some(id);
        self.staged.rows.insert(id, employee.clone());
        Ok(employee)
    }

    async fn delete(&mut self, employee: &Employee) -> StoreResult<()> {
        if let Some(id) = employee.id {
            self.staged.rows.remove(&id);
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryEmployeeTx { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
