//! In-memory store backed by `RwLock<HashMap>`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use formcraft_core::error::EngineError;
use formcraft_core::model::Form;
use formcraft_core::response::Response;
use formcraft_core::traits::{FormStore, ResponseStore};

/// An in-memory form and response store.
///
/// Cheap to clone into an `Arc` and share across tasks; all methods
/// take `&self`.
#[derive(Default)]
pub struct MemoryStore {
    forms: RwLock<HashMap<String, Form>>,
    responses: RwLock<HashMap<Uuid, Response>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored responses, across all forms.
    pub fn response_count(&self) -> usize {
        self.responses.read().unwrap().len()
    }
}

#[async_trait]
impl FormStore for MemoryStore {
    async fn create_form(&self, mut form: Form) -> Result<Form, EngineError> {
        if form.id.is_empty() {
            form.id = Uuid::new_v4().to_string();
        }
        let now = chrono_now();
        form.created_at.get_or_insert(now);
        form.updated_at = Some(now);

        self.forms
            .write()
            .unwrap()
            .insert(form.id.clone(), form.clone());
        tracing::debug!(form_id = %form.id, "stored form");
        Ok(form)
    }

    async fn get_form(&self, id: &str) -> Result<Form, EngineError> {
        self.forms
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::form_not_found(id))
    }

    async fn list_forms(&self) -> Result<Vec<Form>, EngineError> {
        Ok(self.forms.read().unwrap().values().cloned().collect())
    }
}

#[async_trait]
impl ResponseStore for MemoryStore {
    async fn create_response(&self, response: Response) -> Result<Response, EngineError> {
        self.responses
            .write()
            .unwrap()
            .insert(response.id, response.clone());
        tracing::debug!(response_id = %response.id, form_id = %response.form_id, "stored response");
        Ok(response)
    }

    async fn get_response(&self, id: Uuid) -> Result<Response, EngineError> {
        self.responses
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::response_not_found(id.to_string()))
    }

    async fn list_by_form(&self, form_id: &str) -> Result<Vec<Response>, EngineError> {
        let mut responses: Vec<Response> = self
            .responses
            .read()
            .unwrap()
            .values()
            .filter(|r| r.form_id == form_id)
            .cloned()
            .collect();
        // Newest first, matching how the original backend listed them.
        responses.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(responses)
    }

    async fn update_response(&self, response: Response) -> Result<Response, EngineError> {
        let mut responses = self.responses.write().unwrap();
        if !responses.contains_key(&response.id) {
            return Err(EngineError::response_not_found(response.id.to_string()));
        }
        responses.insert(response.id, response.clone());
        Ok(response)
    }
}

fn chrono_now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}
