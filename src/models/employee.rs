//! Employee model and directory.
//!
//! This module defines the Employee struct and the read-only directory the
//! engine uses to attach names and departments to attendance records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Represents an employee enrolled on the time clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// The device PIN identifying the employee.
    pub id: String,
    /// First and last name as shown on reports.
    pub full_name: String,
    /// The department, if the employee is assigned to one.
    #[serde(default)]
    pub department: Option<String>,
}

/// Lookup of employees by device PIN.
#[derive(Debug, Clone, Default)]
pub struct EmployeeDirectory {
    employees: HashMap<String, Employee>,
}

impl EmployeeDirectory {
    /// Builds the directory. A later employee with the same id replaces an earlier one.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::{Employee, EmployeeDirectory};
    ///
    /// let directory = EmployeeDirectory::new(vec![Employee {
    ///     id: "1001".to_string(),
    ///     full_name: "Ana Lima".to_string(),
    ///     department: Some("Packing".to_string()),
    /// }]);
    /// assert_eq!(directory.get("1001").unwrap().full_name, "Ana Lima");
    /// assert!(directory.get("9999").is_none());
    /// ```
    pub fn new(employees: impl IntoIterator<Item = Employee>) -> Self {
        let employees = employees
            .into_iter()
            .map(|employee| (employee.id.clone(), employee))
            .collect();
        Self { employees }
    }

    /// Looks up an employee by id.
    pub fn get(&self, employee_id: &str) -> Option<&Employee> {
        self.employees.get(employee_id)
    }

    /// Returns true if the employee is enrolled.
    pub fn contains(&self, employee_id: &str) -> bool {
        self.employees.contains_key(employee_id)
    }

    /// Number of enrolled employees.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Returns true if nobody is enrolled.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}
