//! Common repository traits
//!
//! Generic interfaces for database operations, implemented per repository
//! where the entity supports the operation.

/// Trait for creating new entities in the database
///
/// # Type Parameters
/// * `Entity` - Type of the returned entity (with ID assigned by the database)
/// * `CreateDTO` - DTO for creation (without ID)
pub trait Create<Entity, CreateDTO> {
    /// Creates a new entity and returns it with its database-assigned ID.
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Trait for reading a single entity by primary key
pub trait Read<Entity, Id> {
    /// Reads an entity by its primary key; `Ok(None)` when no row matches.
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Trait for updating existing entities
///
/// Only `Some(_)` fields of the update DTO are modified.
pub trait Update<Entity, UpdateDTO, Id> {
    /// Updates an entity and returns the updated row.
    /// Errors with `RowNotFound` if the entity does not exist.
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, sqlx::Error>;
}

/// Trait for deleting entities
pub trait Delete<Id> {
    /// Deletes an entity by its primary key.
    async fn delete(&self, id: &Id) -> Result<(), sqlx::Error>;
}
