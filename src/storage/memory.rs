//! In-memory storage.
//!
//! [`InMemoryStore`] keeps every table in ordered maps behind one mutex, so
//! iteration order is deterministic and each trait method is atomic.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AdjustmentEntry, Employee, EmployeeUpdate, NewAdjustment, NewEmployee, NewShift, PayMonth,
    PayrollLine, ShiftRecord,
};

use super::{DateRange, Storage};

#[derive(Debug, Default)]
struct Tables {
    employees: BTreeMap<String, Employee>,
    shifts: BTreeMap<u64, ShiftRecord>,
    adjustments: BTreeMap<u64, AdjustmentEntry>,
    payroll: BTreeMap<(String, PayMonth), PayrollLine>,
    next_shift_id: u64,
    next_adjustment_id: u64,
}

/// A [`Storage`] implementation backed by process memory.
///
/// # Example
///
/// ```
/// use payroll_engine::models::NewEmployee;
/// use payroll_engine::storage::{InMemoryStore, Storage};
///
/// let store = InMemoryStore::new();
/// store.insert_employee(NewEmployee {
///     id: "E1".to_string(),
///     full_name: "Ada Lovelace".to_string(),
///     role: "Analyst".to_string(),
///     department: None,
///     contact: None,
///     hourly_rate: None,
/// }).unwrap();
/// assert_eq!(store.list_active_employees().unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> EngineResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| EngineError::StorageFailure {
            message: "in-memory store lock poisoned".to_string(),
        })
    }
}

impl Storage for InMemoryStore {
    fn insert_shift(&self, shift: NewShift) -> EngineResult<u64> {
        let mut tables = self.tables()?;
        tables.next_shift_id += 1;
        let id = tables.next_shift_id;
        tables.shifts.insert(id, shift.with_id(id));
        Ok(id)
    }

    fn update_shift(&self, shift: &ShiftRecord) -> EngineResult<()> {
        let mut tables = self.tables()?;
        match tables.shifts.get_mut(&shift.id) {
            Some(stored) => {
                *stored = shift.clone();
                Ok(())
            }
            None => Err(EngineError::StorageFailure {
                message: format!("shift {} does not exist", shift.id),
            }),
        }
    }

    fn read_shifts(&self, employee_id: &str, range: DateRange) -> EngineResult<Vec<ShiftRecord>> {
        let tables = self.tables()?;
        let mut shifts: Vec<ShiftRecord> = tables
            .shifts
            .values()
            .filter(|s| s.employee_id == employee_id && range.contains(s.date))
            .cloned()
            .collect();
        shifts.sort_by(|a, b| (a.date, a.time_in, a.id).cmp(&(b.date, b.time_in, b.id)));
        Ok(shifts)
    }

    fn insert_adjustment(&self, adjustment: NewAdjustment) -> EngineResult<u64> {
        let mut tables = self.tables()?;
        tables.next_adjustment_id += 1;
        let id = tables.next_adjustment_id;
        tables.adjustments.insert(id, adjustment.with_id(id));
        Ok(id)
    }

    fn read_adjustments(
        &self,
        employee_id: &str,
        month: PayMonth,
    ) -> EngineResult<Vec<AdjustmentEntry>> {
        let tables = self.tables()?;
        Ok(tables
            .adjustments
            .values()
            .filter(|a| {
                a.employee_id == employee_id && a.year == month.year() && a.month == month.month()
            })
            .cloned()
            .collect())
    }

    fn read_payroll_line(
        &self,
        employee_id: &str,
        month: PayMonth,
    ) -> EngineResult<Option<PayrollLine>> {
        let tables = self.tables()?;
        Ok(tables
            .payroll
            .get(&(employee_id.to_string(), month))
            .cloned())
    }

    fn read_payroll_lines(&self, month: PayMonth) -> EngineResult<Vec<PayrollLine>> {
        let tables = self.tables()?;
        Ok(tables
            .payroll
            .iter()
            .filter(|((_, m), _)| *m == month)
            .map(|(_, line)| line.clone())
            .collect())
    }

    fn write_payroll_line(&self, line: &PayrollLine) -> EngineResult<()> {
        let month = PayMonth::new(line.year, line.month)?;
        let mut tables = self.tables()?;
        tables
            .payroll
            .insert((line.employee_id.clone(), month), line.clone());
        Ok(())
    }

    fn insert_employee(&self, employee: NewEmployee) -> EngineResult<Employee> {
        let mut tables = self.tables()?;
        if tables.employees.contains_key(&employee.id) {
            return Err(EngineError::DuplicateEmployee {
                employee_id: employee.id,
            });
        }
        let employee: Employee = employee.into();
        tables
            .employees
            .insert(employee.id.clone(), employee.clone());
        Ok(employee)
    }

    fn read_employee(&self, employee_id: &str) -> EngineResult<Option<Employee>> {
        let tables = self.tables()?;
        Ok(tables.employees.get(employee_id).cloned())
    }

    fn list_active_employees(&self) -> EngineResult<Vec<Employee>> {
        let tables = self.tables()?;
        Ok(tables
            .employees
            .values()
            .filter(|e| e.active)
            .cloned()
            .collect())
    }

    fn update_employee(
        &self,
        employee_id: &str,
        update: &EmployeeUpdate,
    ) -> EngineResult<Employee> {
        let mut tables = self.tables()?;
        let employee =
            tables
                .employees
                .get_mut(employee_id)
                .ok_or_else(|| EngineError::EmployeeNotFound {
                    employee_id: employee_id.to_string(),
                })?;
        employee.apply(update);
        Ok(employee.clone())
    }
}
