use std::collections::HashMap;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use common::types::OptionalProperty;
use metadata::error::MetadataError;
use metadata::issues::IssueFilter;
use metadata::issues::Issues as MDIssues;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

pub struct Issues {
    prov: Arc<MDIssues>,
}

impl Issues {
    pub fn new(prov: Arc<MDIssues>) -> Self {
        Self { prov }
    }

    pub async fn create(
        &self,
        project: String,
        request: CreateIssueRequest,
    ) -> Result<CreateIssueResponse> {
        let req = match validate_create(project, request) {
            CreatePayload::MissingRequired => {
                return Ok(CreateIssueResponse::required_missing());
            }
            CreatePayload::Fields(req) => req,
        };

        let issue = self.prov.create(req)?;

        Ok(CreateIssueResponse::Created(Box::new(issue.into())))
    }

    pub async fn list(
        &self,
        project: String,
        params: HashMap<String, String>,
    ) -> Result<Vec<Issue>> {
        let filter = match build_filter(project, &params) {
            None => return Ok(Vec::new()),
            Some(filter) => filter,
        };

        let resp = self.prov.find(&filter)?;

        Ok(resp.data.into_iter().map(|v| v.into()).collect())
    }

    pub async fn update(&self, request: UpdateIssueRequest) -> Result<UpdateIssueResponse> {
        let (id, fields) = match select_update_fields(request) {
            UpdatePayload::MissingId => return Ok(UpdateIssueResponse::missing_id()),
            UpdatePayload::NoFields { id } => return Ok(UpdateIssueResponse::no_fields(id)),
            UpdatePayload::Fields { id, fields } => (id, fields),
        };

        // a key the store cannot even parse is the same outcome as a
        // missing record, not a fault
        let key = match id.parse::<u64>() {
            Ok(key) => key,
            Err(_) => return Ok(UpdateIssueResponse::not_updated(id)),
        };

        match self.prov.update(key, fields) {
            Ok(_) => Ok(UpdateIssueResponse::updated(id)),
            Err(MetadataError::NotFound(_)) => Ok(UpdateIssueResponse::not_updated(id)),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete(&self, request: DeleteIssueRequest) -> Result<DeleteIssueResponse> {
        let id = match request.id {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(DeleteIssueResponse::missing_id()),
        };

        let key = match id.parse::<u64>() {
            Ok(key) => key,
            Err(_) => return Ok(DeleteIssueResponse::not_deleted(id)),
        };

        match self.prov.delete(key) {
            Ok(_) => Ok(DeleteIssueResponse::deleted(id)),
            Err(MetadataError::NotFound(_)) => Ok(DeleteIssueResponse::not_deleted(id)),
            Err(err) => Err(err.into()),
        }
    }
}

pub(crate) enum CreatePayload {
    MissingRequired,
    Fields(metadata::issues::CreateIssueRequest),
}

/// `issue_title`, `issue_text` and `created_by` must be supplied non-empty;
/// the optional fields default to the empty string. The project always
/// comes from the route, never from the body.
pub(crate) fn validate_create(project: String, req: CreateIssueRequest) -> CreatePayload {
    fn required(v: Option<String>) -> Option<String> {
        v.filter(|s| !s.is_empty())
    }

    let issue_title = required(req.issue_title);
    let issue_text = required(req.issue_text);
    let created_by = required(req.created_by);

    match (issue_title, issue_text, created_by) {
        (Some(issue_title), Some(issue_text), Some(created_by)) => {
            CreatePayload::Fields(metadata::issues::CreateIssueRequest {
                project,
                issue_title,
                issue_text,
                created_by,
                assigned_to: req.assigned_to.unwrap_or_default(),
                status_text: req.status_text.unwrap_or_default(),
            })
        }
        _ => CreatePayload::MissingRequired,
    }
}

pub(crate) enum UpdatePayload {
    MissingId,
    NoFields { id: String },
    Fields {
        id: String,
        fields: metadata::issues::UpdateIssueRequest,
    },
}

/// A string field counts as an update only when supplied non-empty, while
/// the boolean counts whenever the key is present, so `open: false` and
/// `open: null` are valid updates and `issue_title: ""` is not.
pub(crate) fn select_update_fields(req: UpdateIssueRequest) -> UpdatePayload {
    let id = match req.id {
        Some(id) if !id.is_empty() => id,
        _ => return UpdatePayload::MissingId,
    };

    let mut fields = metadata::issues::UpdateIssueRequest::default();
    if let Some(v) = req.issue_title.filter(|s| !s.is_empty()) {
        fields.issue_title.insert(v);
    }
    if let Some(v) = req.issue_text.filter(|s| !s.is_empty()) {
        fields.issue_text.insert(v);
    }
    if let Some(v) = req.created_by.filter(|s| !s.is_empty()) {
        fields.created_by.insert(v);
    }
    if let Some(v) = req.assigned_to.filter(|s| !s.is_empty()) {
        fields.assigned_to.insert(v);
    }
    if let Some(v) = req.status_text.filter(|s| !s.is_empty()) {
        fields.status_text.insert(v);
    }
    let mut open_supplied = false;
    match req.open {
        OptionalProperty::Some(Some(v)) => fields.open.insert(v),
        // an explicit null carries no new value but still counts as sent
        OptionalProperty::Some(None) => open_supplied = true,
        OptionalProperty::None => {}
    }

    if fields.is_empty() && !open_supplied {
        return UpdatePayload::NoFields { id };
    }

    UpdatePayload::Fields { id, fields }
}

/// Query parameters become conjunctive equality filters. `None` means the
/// filter can provably never match (a key no record carries, or an `_id`
/// that is not a valid identity), so listing short-circuits to `[]`.
pub(crate) fn build_filter(
    project: String,
    params: &HashMap<String, String>,
) -> Option<IssueFilter> {
    let mut filter = IssueFilter {
        project: Some(project),
        ..Default::default()
    };

    for (key, value) in params {
        match key.as_str() {
            "_id" => match value.parse::<u64>() {
                Ok(id) => filter.id = Some(id),
                Err(_) => return None,
            },
            // the path value always wins over a stray query parameter
            "project" => {}
            "issue_title" => filter.issue_title = Some(value.clone()),
            "issue_text" => filter.issue_text = Some(value.clone()),
            "created_on" => match value.parse::<DateTime<Utc>>() {
                Ok(ts) => filter.created_on = Some(ts),
                Err(_) => return None,
            },
            "updated_on" => match value.parse::<DateTime<Utc>>() {
                Ok(ts) => filter.updated_on = Some(ts),
                Err(_) => return None,
            },
            "created_by" => filter.created_by = Some(value.clone()),
            "assigned_to" => filter.assigned_to = Some(value.clone()),
            "status_text" => filter.status_text = Some(value.clone()),
            "open" => filter.open = Some(value == "true"),
            _ => return None,
        }
    }

    Some(filter)
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    #[serde(rename = "_id")]
    pub id: String,
    pub project: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub created_by: String,
    pub assigned_to: String,
    pub open: bool,
    pub status_text: String,
}

impl From<metadata::issues::Issue> for Issue {
    fn from(value: metadata::issues::Issue) -> Self {
        Issue {
            id: value.id.to_string(),
            project: value.project,
            issue_title: value.issue_title,
            issue_text: value.issue_text,
            created_on: value.created_on,
            updated_on: value.updated_on,
            created_by: value.created_by,
            assigned_to: value.assigned_to,
            open: value.open,
            status_text: value.status_text,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateIssueRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum CreateIssueResponse {
    Created(Box<Issue>),
    Failed { error: String },
}

impl CreateIssueResponse {
    pub fn required_missing() -> Self {
        CreateIssueResponse::Failed {
            error: "required field(s) missing".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateIssueRequest {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    #[serde(default, skip_serializing_if = "OptionalProperty::is_none")]
    pub open: OptionalProperty<Option<bool>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum UpdateIssueResponse {
    Updated {
        result: String,
        #[serde(rename = "_id")]
        id: String,
    },
    Failed {
        error: String,
        #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
}

impl UpdateIssueResponse {
    pub fn updated(id: String) -> Self {
        UpdateIssueResponse::Updated {
            result: "successfully updated".to_string(),
            id,
        }
    }

    pub fn missing_id() -> Self {
        UpdateIssueResponse::Failed {
            error: "missing _id".to_string(),
            id: None,
        }
    }

    pub fn no_fields(id: String) -> Self {
        UpdateIssueResponse::Failed {
            error: "no update field(s) sent".to_string(),
            id: Some(id),
        }
    }

    pub fn not_updated(id: String) -> Self {
        UpdateIssueResponse::Failed {
            error: "could not update".to_string(),
            id: Some(id),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct DeleteIssueRequest {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum DeleteIssueResponse {
    Deleted {
        result: String,
        #[serde(rename = "_id")]
        id: String,
    },
    Failed {
        error: String,
        #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
}

impl DeleteIssueResponse {
    pub fn deleted(id: String) -> Self {
        DeleteIssueResponse::Deleted {
            result: "successfully deleted".to_string(),
            id,
        }
    }

    pub fn missing_id() -> Self {
        DeleteIssueResponse::Failed {
            error: "missing _id".to_string(),
            id: None,
        }
    }

    pub fn not_deleted(id: String) -> Self {
        DeleteIssueResponse::Failed {
            error: "could not delete".to_string(),
            id: Some(id),
        }
    }
}
