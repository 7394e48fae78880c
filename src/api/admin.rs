// ABOUTME: Admin endpoints of the SparkRepo API
// ABOUTME: Week creation and editing plus submission review and deletion
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{decode_envelope, decode_list, to_body, SparkApi};
use crate::errors::ClientResult;
use crate::models::{
    NewWeek, ResourceId, Submission, SubmissionFilter, SubmissionUpdate, Week, WeekUpdate,
};

impl SparkApi {
    /// `GET /admin/weeks`: every week across categories
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin
    pub async fn admin_list_weeks(&self) -> ClientResult<Vec<Week>> {
        let body = self.http.get("/admin/weeks").await?;
        decode_list("weeks", "weeks", body)
    }

    /// `POST /admin/categories/{id}/weeks`
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the payload is rejected
    pub async fn admin_create_week(
        &self,
        category_id: &ResourceId,
        week: &NewWeek,
    ) -> ClientResult<Week> {
        let path = format!("/admin/categories/{}/weeks", category_id.path_segment());
        let body = self.http.post(&path, to_body("week", week)?).await?;
        decode_envelope("week", "week", body)
    }

    /// `PUT /admin/weeks/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the week does not exist
    pub async fn admin_update_week(
        &self,
        week_id: &ResourceId,
        update: &WeekUpdate,
    ) -> ClientResult<Week> {
        let path = format!("/admin/weeks/{}", week_id.path_segment());
        let body = self.http.put(&path, to_body("week update", update)?).await?;
        decode_envelope("week", "week", body)
    }

    /// `GET /admin/submissions` with optional filters
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin
    pub async fn admin_list_submissions(
        &self,
        filter: &SubmissionFilter,
    ) -> ClientResult<Vec<Submission>> {
        let query = filter.query_string();
        let path = if query.is_empty() {
            "/admin/submissions".to_owned()
        } else {
            format!("/admin/submissions?{query}")
        };
        let body = self.http.get(&path).await?;
        decode_list("submissions", "submissions", body)
    }

    /// `PUT /admin/submissions/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the submission does not exist
    pub async fn admin_update_submission(
        &self,
        submission_id: &ResourceId,
        update: &SubmissionUpdate,
    ) -> ClientResult<Submission> {
        let path = format!("/admin/submissions/{}", submission_id.path_segment());
        let body = self
            .http
            .put(&path, to_body("submission update", update)?)
            .await?;
        decode_envelope("submission", "submission", body)
    }

    /// `DELETE /admin/submissions/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the submission does not exist
    pub async fn admin_delete_submission(&self, submission_id: &ResourceId) -> ClientResult<()> {
        let path = format!("/admin/submissions/{}", submission_id.path_segment());
        self.http.delete(&path).await?;
        Ok(())
    }
}
