// ABOUTME: Domain models for categories, weeks, submissions and users returned by the backend
// ABOUTME: Includes request payloads for submissions, admin week edits and filters
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Data models shared by the API facade, caches and loaders.
//!
//! The backend is lenient about identifier types (string ids from one store,
//! integers from another), so every id is normalized into [`ResourceId`].

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::date::format_date;

/// Identifier of a backend resource, accepted as a JSON string or integer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Create from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form for use inside a URL path
    #[must_use]
    pub fn path_segment(&self) -> Cow<'_, str> {
        urlencoding::encode(&self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        })
    }
}

/// A course category (e.g. "Scratch Jr", "Canva Basics")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id
    pub id: ResourceId,
    /// Display name
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Category {
    /// Listing priority: Scratch courses first, Canva second, everything else after
    #[must_use]
    pub fn sort_priority(&self) -> u8 {
        let lower = self.name.to_lowercase();
        if lower.contains("scratch") {
            0
        } else if lower.contains("canva") {
            1
        } else {
            2
        }
    }
}

const fn default_active() -> bool {
    true
}

/// A weekly assignment within a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    /// Week id
    pub id: ResourceId,
    /// Owning category
    #[serde(alias = "categoryId")]
    pub category_id: ResourceId,
    /// Owning category name, when the backend joins it in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Position within the category
    pub week_number: u32,
    /// Assignment title
    #[serde(default)]
    pub title: String,
    /// Short name shown in listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Link to the assignment material
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_url: Option<String>,
    /// ISO-8601 due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Whether students can submit
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// ISO-8601 time of the last edit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// Present when requested with `include_submissions=true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submissions: Option<Vec<Submission>>,
}

impl Week {
    /// Title shown to students
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.title)
    }

    /// Human readable due date, `N/A` when unset
    #[must_use]
    pub fn formatted_due_date(&self) -> String {
        format_date(self.due_date.as_deref())
    }
}

/// A student's project submission for a week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Submission id
    pub id: ResourceId,
    /// Week the submission belongs to
    #[serde(alias = "weekId")]
    pub week_id: ResourceId,
    /// Name the student submitted under
    #[serde(default)]
    pub student_name: String,
    /// Link to the student project
    #[serde(default)]
    pub project_url: String,
    /// Project platform, e.g. `scratch`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    /// Student comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Reviewer comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_comment: Option<String>,
    /// Review status (`pending`, `submitted`, `approved`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Week number within the category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_number: Option<u32>,
    /// Title of the week
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_title: Option<String>,
    /// ISO-8601 submission time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    /// ISO-8601 time of the last edit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl Submission {
    /// Human readable submission time, `N/A` when unset
    #[must_use]
    pub fn formatted_submitted_at(&self) -> String {
        format_date(self.submitted_at.as_deref())
    }
}

/// Authenticated user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id
    pub id: ResourceId,
    /// Login name
    pub username: String,
    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Admin role
    #[serde(default)]
    pub is_admin: bool,
}

/// Token plus user, as persisted in session storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Bearer token
    pub token: String,
    /// Signed-in user
    pub user: User,
}

/// Body of a successful `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token
    pub access_token: String,
    /// Signed-in user
    pub user: User,
}

impl From<LoginResponse> for AuthSession {
    fn from(response: LoginResponse) -> Self {
        Self {
            token: response.access_token,
            user: response.user,
        }
    }
}

/// Student submission payload
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewSubmission {
    /// Name the student submitted under
    pub student_name: String,
    /// Link to the student project
    pub project_url: String,
    /// Project platform, e.g. `scratch`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    /// Student comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Admin payload for creating a week
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewWeek {
    /// Week number within the category
    pub week_number: u32,
    /// Assignment title
    pub title: String,
    /// Short name shown in listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Link to the assignment material
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_url: Option<String>,
    /// ISO-8601 due date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Whether students can submit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Admin partial update of a week; unset fields are left untouched
#[derive(Debug, Clone, Default, Serialize)]
pub struct WeekUpdate {
    /// Assignment title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Short name shown in listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Link to the assignment material
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_url: Option<String>,
    /// ISO-8601 due date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Whether students can submit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Admin review of a submission
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubmissionUpdate {
    /// Review status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Reviewer comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_comment: Option<String>,
}

/// Filters for the admin submissions listing
#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    /// Restrict to one category
    pub category_id: Option<ResourceId>,
    /// Restrict to one week
    pub week_id: Option<ResourceId>,
    /// Review status
    pub status: Option<String>,
}

impl SubmissionFilter {
    /// Encoded query string without the leading `?`; empty when no filter is set
    #[must_use]
    pub fn query_string(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if let Some(category_id) = &self.category_id {
            query.append_pair("category_id", category_id.as_str());
        }
        if let Some(week_id) = &self.week_id {
            query.append_pair("week_id", week_id.as_str());
        }
        if let Some(status) = &self.status {
            query.append_pair("status", status);
        }
        query.finish()
    }
}

/// Admin payload for creating a user account
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewUser {
    /// Login name
    pub username: String,
    /// Initial password
    pub password: String,
    /// Contact email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Grant the admin role
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_id_accepts_strings_and_integers() -> Result<(), serde_json::Error> {
        let from_text: ResourceId = serde_json::from_value(json!("abc123"))?;
        let from_number: ResourceId = serde_json::from_value(json!(42))?;
        assert_eq!(from_text.as_str(), "abc123");
        assert_eq!(from_number, ResourceId::from(42));
        Ok(())
    }

    #[test]
    fn test_resource_id_path_segment_is_encoded() {
        assert_eq!(ResourceId::new("a b/c").path_segment(), "a%20b%2Fc");
    }

    #[test]
    fn test_category_priority() {
        let category = |name: &str| Category {
            id: ResourceId::from(name),
            name: name.to_owned(),
            description: None,
        };
        assert_eq!(category("Scratch Jr").sort_priority(), 0);
        assert_eq!(category("Intro to CANVA").sort_priority(), 1);
        assert_eq!(category("Alpha").sort_priority(), 2);
    }

    #[test]
    fn test_week_accepts_camel_case_category_id() -> Result<(), serde_json::Error> {
        let week: Week = serde_json::from_value(json!({
            "id": 7,
            "categoryId": "c1",
            "week_number": 2,
            "title": "Loops"
        }))?;
        assert_eq!(week.category_id.as_str(), "c1");
        assert!(week.is_active);
        assert_eq!(week.display_title(), "Loops");
        assert_eq!(week.formatted_due_date(), "N/A");
        Ok(())
    }

    #[test]
    fn test_filter_query_string() {
        let filter = SubmissionFilter {
            category_id: Some(ResourceId::from(3)),
            week_id: None,
            status: Some("needs review".to_owned()),
        };
        assert_eq!(filter.query_string(), "category_id=3&status=needs+review");
        assert!(SubmissionFilter::default().query_string().is_empty());
    }
}
