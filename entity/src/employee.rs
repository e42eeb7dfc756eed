use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Record, RecordId};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Employee {
    pub id: RecordId,
    pub name: String,
    pub position: String,
    pub salary: f64,
}

impl Record for Employee {
    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Inbound payload for create and update. Missing fields decode to their
/// zero value so `validate` can report them; a body `id` is ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EmployeeDraft {
    pub name: String,
    pub position: String,
    pub salary: f64,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("validation failed: {}", .violations.join("; "))]
pub struct ValidationError {
    pub violations: Vec<&'static str>,
}

impl EmployeeDraft {
    pub fn new(name: impl Into<String>, position: impl Into<String>, salary: f64) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
            salary,
        }
    }

    /// Checks every required field and reports all violations at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        if self.name.trim().is_empty() {
            violations.push("name is required");
        }
        if self.position.trim().is_empty() {
            violations.push("position is required");
        }
        // NaN fails this comparison too.
        if !(self.salary > 0.0) {
            violations.push("salary must be greater than 0");
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }

    pub fn into_employee(self, id: RecordId) -> Employee {
        Employee {
            id,
            name: self.name,
            position: self.position,
            salary: self.salary,
        }
    }
}
