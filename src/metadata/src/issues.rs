use std::sync::Arc;

use bincode::deserialize;
use bincode::serialize;
use chrono::DateTime;
use chrono::Utc;
use common::types::OptionalProperty;
use rocksdb::Transaction;
use rocksdb::TransactionDB;
use serde::Deserialize;
use serde::Serialize;

use crate::error::MetadataError;
use crate::index::next_seq;
use crate::metadata::ListResponse;
use crate::store::path_helpers::list;
use crate::store::path_helpers::make_data_value_key;
use crate::store::path_helpers::make_id_seq_key;
use crate::Result;

const NAMESPACE: &[u8] = b"issues";

/// Issue records live in a single collection keyed by a store-assigned id.
/// The project is an ordinary record attribute, so lookups by id are not
/// project-scoped while listing filters on it like any other field.
pub struct Issues {
    db: Arc<TransactionDB>,
}

impl Issues {
    pub fn new(db: Arc<TransactionDB>) -> Self {
        Issues { db }
    }

    fn get_by_id_(&self, tx: &Transaction<TransactionDB>, id: u64) -> Result<Issue> {
        let key = make_data_value_key(NAMESPACE, id);

        match tx.get(key)? {
            None => Err(MetadataError::NotFound("issue not found".to_string())),
            Some(value) => Ok(deserialize(&value)?),
        }
    }

    pub fn create(&self, req: CreateIssueRequest) -> Result<Issue> {
        let tx = self.db.transaction();
        let created_on = Utc::now();
        let id = next_seq(&tx, make_id_seq_key(NAMESPACE))?;

        let issue = Issue {
            id,
            project: req.project,
            issue_title: req.issue_title,
            issue_text: req.issue_text,
            created_on,
            updated_on: created_on,
            created_by: req.created_by,
            assigned_to: req.assigned_to,
            open: true,
            status_text: req.status_text,
        };
        let data = serialize(&issue)?;
        tx.put(make_data_value_key(NAMESPACE, issue.id), data)?;

        tx.commit()?;
        Ok(issue)
    }

    pub fn get_by_id(&self, id: u64) -> Result<Issue> {
        let tx = self.db.transaction();

        self.get_by_id_(&tx, id)
    }

    pub fn list(&self) -> Result<ListResponse<Issue>> {
        let tx = self.db.transaction();
        list(&tx, NAMESPACE)
    }

    /// Conjunctive equality filtering over the whole collection. An empty
    /// filter matches every record.
    pub fn find(&self, filter: &IssueFilter) -> Result<ListResponse<Issue>> {
        let mut resp = self.list()?;
        resp.data.retain(|issue| filter.matches(issue));
        Ok(resp)
    }

    pub fn update(&self, id: u64, req: UpdateIssueRequest) -> Result<Issue> {
        let tx = self.db.transaction();

        let prev_issue = self.get_by_id_(&tx, id)?;
        let mut issue = prev_issue.clone();

        issue.updated_on = Utc::now();
        if let OptionalProperty::Some(issue_title) = req.issue_title {
            issue.issue_title = issue_title;
        }
        if let OptionalProperty::Some(issue_text) = req.issue_text {
            issue.issue_text = issue_text;
        }
        if let OptionalProperty::Some(created_by) = req.created_by {
            issue.created_by = created_by;
        }
        if let OptionalProperty::Some(assigned_to) = req.assigned_to {
            issue.assigned_to = assigned_to;
        }
        if let OptionalProperty::Some(status_text) = req.status_text {
            issue.status_text = status_text;
        }
        if let OptionalProperty::Some(open) = req.open {
            issue.open = open;
        }

        let data = serialize(&issue)?;
        tx.put(make_data_value_key(NAMESPACE, issue.id), data)?;
        tx.commit()?;
        Ok(issue)
    }

    pub fn delete(&self, id: u64) -> Result<Issue> {
        let tx = self.db.transaction();
        let issue = self.get_by_id_(&tx, id)?;
        tx.delete(make_data_value_key(NAMESPACE, id))?;
        tx.commit()?;
        Ok(issue)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub id: u64,
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

#[derive(Clone, Debug)]
pub struct CreateIssueRequest {
    pub project: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateIssueRequest {
    pub issue_title: OptionalProperty<String>,
    pub issue_text: OptionalProperty<String>,
    pub created_by: OptionalProperty<String>,
    pub assigned_to: OptionalProperty<String>,
    pub status_text: OptionalProperty<String>,
    pub open: OptionalProperty<bool>,
}

impl UpdateIssueRequest {
    pub fn is_empty(&self) -> bool {
        self.issue_title.is_none()
            && self.issue_text.is_none()
            && self.created_by.is_none()
            && self.assigned_to.is_none()
            && self.status_text.is_none()
            && self.open.is_none()
    }
}

#[derive(Clone, Debug, Default)]
pub struct IssueFilter {
    pub id: Option<u64>,
    pub project: Option<String>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_on: Option<DateTime<Utc>>,
    pub updated_on: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
}

impl IssueFilter {
    pub fn matches(&self, issue: &Issue) -> bool {
        fn eq<T: PartialEq>(filter: &Option<T>, value: &T) -> bool {
            match filter {
                None => true,
                Some(v) => v == value,
            }
        }

        eq(&self.id, &issue.id)
            && eq(&self.project, &issue.project)
            && eq(&self.issue_title, &issue.issue_title)
            && eq(&self.issue_text, &issue.issue_text)
            && eq(&self.created_on, &issue.created_on)
            && eq(&self.updated_on, &issue.updated_on)
            && eq(&self.created_by, &issue.created_by)
            && eq(&self.assigned_to, &issue.assigned_to)
            && eq(&self.status_text, &issue.status_text)
            && eq(&self.open, &issue.open)
    }
}
