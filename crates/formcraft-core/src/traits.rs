//! Store trait definitions.
//!
//! The engine depends on a form store and a response store but does not
//! implement persistence itself; `formcraft-store` provides an
//! in-memory implementation and real deployments supply their own.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::EngineError;
use crate::model::Form;
use crate::response::Response;

/// Read/write access to stored forms.
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Persist a new form, assigning its id if empty.
    async fn create_form(&self, form: Form) -> Result<Form, EngineError>;

    /// Fetch a form by id.
    async fn get_form(&self, id: &str) -> Result<Form, EngineError>;

    /// All stored forms.
    async fn list_forms(&self) -> Result<Vec<Form>, EngineError>;
}

/// Read/write access to stored graded responses.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Persist a newly graded response.
    async fn create_response(&self, response: Response) -> Result<Response, EngineError>;

    /// Fetch a response by id.
    async fn get_response(&self, id: Uuid) -> Result<Response, EngineError>;

    /// All responses for a form, newest first.
    async fn list_by_form(&self, form_id: &str) -> Result<Vec<Response>, EngineError>;

    /// Replace a stored response after a regrade.
    async fn update_response(&self, response: Response) -> Result<Response, EngineError>;
}
