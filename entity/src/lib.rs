//! Record models shared by the store, the repository layer and the HTTP surface.

pub mod employee;

pub use employee::{Employee, EmployeeDraft, ValidationError};

/// Identifier assigned by the store on insert.
pub type RecordId = i64;

/// A value the in-memory store can key by identifier.
pub trait Record: Clone + Send + 'static {
    fn id(&self) -> RecordId;

    /// Overwrites the identifier. Only the store calls this, on create.
    fn assign_id(&mut self, id: RecordId);
}
