//! HR module: the repository boundary between the HTTP surface and storage.

use std::sync::Arc;

use entity::{Employee, RecordId};
use platform_db::EmployeeTable;

/// Stable employee operations over the backing table. Forwards every call
/// unchanged; callers never reach the table directly.
#[derive(Clone, Debug)]
pub struct EmployeeRepository {
    table: Arc<EmployeeTable>,
}

impl EmployeeRepository {
    pub fn new(table: Arc<EmployeeTable>) -> Self {
        Self { table }
    }

    pub fn create_employee(&self, employee: Employee) -> Employee {
        self.table.create(employee)
    }

    pub fn get_employee_by_id(&self, id: RecordId) -> Option<Employee> {
        self.table.get_by_id(id)
    }

    pub fn update_employee(&self, employee: Employee) -> bool {
        self.table.update(employee)
    }

    pub fn delete_employee(&self, id: RecordId) -> bool {
        self.table.delete(id)
    }

    pub fn list_employees(&self, page: i64, page_size: i64) -> Vec<Employee> {
        self.table.list(page, page_size)
    }

    pub fn count(&self) -> usize {
        self.table.len()
    }
}

impl Default for EmployeeRepository {
    fn default() -> Self {
        Self::new(Arc::new(EmployeeTable::new()))
    }
}
