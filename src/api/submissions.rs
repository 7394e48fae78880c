// ABOUTME: Submission endpoints of the SparkRepo API
// ABOUTME: Creates submissions and reads them per week, per student week slot or by id
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use tracing::debug;

use super::{decode, decode_envelope, decode_list, to_body, SparkApi};
use crate::errors::ClientResult;
use crate::models::{NewSubmission, ResourceId, Submission};

impl SparkApi {
    /// `POST /categories/{id}/weeks/{n}/submissions`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the submission
    pub async fn create_submission(
        &self,
        category_id: &ResourceId,
        week_number: u32,
        submission: &NewSubmission,
    ) -> ClientResult<Submission> {
        let path = format!(
            "/categories/{}/weeks/{week_number}/submissions",
            category_id.path_segment()
        );
        let body = self
            .http
            .post(&path, to_body("submission", submission)?)
            .await?;
        decode_envelope("submission", "submission", body)
    }

    /// `GET /weeks/{id}/submissions`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a submission list
    pub async fn get_week_submissions(&self, week_id: &ResourceId) -> ClientResult<Vec<Submission>> {
        let body = self
            .http
            .get(&format!("/weeks/{}/submissions", week_id.path_segment()))
            .await?;
        decode_list("submissions", "submissions", body)
    }

    /// `GET /categories/{id}/weeks/{n}/submission`
    ///
    /// The caller's own submission for a week. Every failure, including a
    /// missing submission, reads as `None`.
    pub async fn get_submission(
        &self,
        category_id: &ResourceId,
        week_number: u32,
    ) -> Option<Submission> {
        let path = format!(
            "/categories/{}/weeks/{week_number}/submission",
            category_id.path_segment()
        );
        let result = self
            .http
            .get(&path)
            .await
            .and_then(|body| decode_envelope("submission", "submission", body));
        match result {
            Ok(submission) => Some(submission),
            Err(e) => {
                debug!(error = %e, "No submission available");
                None
            }
        }
    }

    /// `GET /submissions/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the submission does not exist
    pub async fn get_submission_by_id(&self, submission_id: &ResourceId) -> ClientResult<Submission> {
        let body = self
            .http
            .get(&format!("/submissions/{}", submission_id.path_segment()))
            .await?;
        decode("submission", body)
    }
}
