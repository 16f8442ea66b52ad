//! The grading service: the engine's three logical operations wired to
//! the form and response stores.
//!
//! Grading itself is pure; this layer only adds the lookup-then-persist
//! choreography. A grading failure aborts before anything is stored.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::analytics::compute_analytics;
use crate::error::EngineError;
use crate::grade::{grade_submission, regrade};
use crate::report::AnalyticsReport;
use crate::response::Response;
use crate::submission::Submission;
use crate::traits::{FormStore, ResponseStore};

/// Orchestrates grading and analytics over the stores.
pub struct GradingService {
    forms: Arc<dyn FormStore>,
    responses: Arc<dyn ResponseStore>,
}

impl GradingService {
    pub fn new(forms: Arc<dyn FormStore>, responses: Arc<dyn ResponseStore>) -> Self {
        Self { forms, responses }
    }

    /// Grade a raw submission body against a form and persist the
    /// resulting response.
    pub async fn submit(&self, form_id: &str, body: Value) -> Result<Response, EngineError> {
        let form = self.forms.get_form(form_id).await?;
        let submission = Submission::from_json(body)?;
        let response = grade_submission(&form, &submission)?;

        tracing::info!(
            form_id,
            response_id = %response.id,
            total = response.total_score,
            max = response.max_score,
            percentage = response.percentage_score,
            "graded submission"
        );

        self.responses.create_response(response).await
    }

    /// Compute the analytics report for a form from all of its stored
    /// responses.
    pub async fn analytics(&self, form_id: &str) -> Result<AnalyticsReport, EngineError> {
        let form = self.forms.get_form(form_id).await?;
        let responses = self.responses.list_by_form(form_id).await?;
        Ok(compute_analytics(&form, &responses))
    }

    /// Re-grade one stored response against the current definition of
    /// its form and persist the result.
    pub async fn regrade_response(&self, response_id: Uuid) -> Result<Response, EngineError> {
        let response = self.responses.get_response(response_id).await?;
        let form = self.forms.get_form(&response.form_id).await?;
        let regraded = regrade(&form, &response)?;
        self.responses.update_response(regraded).await
    }

    /// Re-grade every stored response for a form, for use after the
    /// form's answer key changed. Returns the number regraded.
    pub async fn regrade_all(&self, form_id: &str) -> Result<usize, EngineError> {
        let form = self.forms.get_form(form_id).await?;
        let responses = self.responses.list_by_form(form_id).await?;
        let count = responses.len();

        for response in responses {
            let regraded = regrade(&form, &response)?;
            self.responses.update_response(regraded).await?;
        }

        tracing::info!(form_id, count, "regraded responses");
        Ok(count)
    }
}
