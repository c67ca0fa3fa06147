use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sinker_model::{Task, TaskStatus, TaskType};

use crate::error::ViewError;

/// Everything the user controls about the task table.
///
/// Plain data: it can be persisted or sent around and fed back into [`crate::project`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub filter: TaskFilter,
    pub sort: SortState,
    pub page: Pagination,
}

/// Client-local filter; never sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskFilter {
    /// Case-insensitive substring of the task name.
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TaskType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.kind.is_none() && self.status.is_none()
    }

    /// Merge a partial update; fields absent from the patch are left untouched.
    ///
    /// An empty string clears `type`/`status`.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(kind) = patch.kind {
            self.kind = non_empty(kind).map(TaskType::from);
        }
        if let Some(status) = patch.status {
            self.status = non_empty(status).map(TaskStatus::from);
        }
    }

    /// All active predicates, ANDed.
    pub fn matches(&self, task: &Task) -> bool {
        if !self.name.is_empty()
            && !task
                .name
                .to_lowercase()
                .contains(&self.name.to_lowercase())
        {
            return false;
        }
        if let Some(kind) = &self.kind
            && task.kind.as_ref() != Some(kind)
        {
            return false;
        }
        if let Some(status) = &self.status
            && task.status.as_ref() != Some(status)
        {
            return false;
        }
        true
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// Partial filter update.
///
/// Deserializes from any JSON object; keys other than `name`, `type` and
/// `status` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Sortable task-table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    Name,
    Cluster,
    Table,
    Topic,
    ConsumerGroup,
    Type,
    Status,
    Lag,
    WriteSpeed,
    LastUpdate,
}

impl SortField {
    pub const ALL: [SortField; 10] = [
        SortField::Name,
        SortField::Cluster,
        SortField::Table,
        SortField::Topic,
        SortField::ConsumerGroup,
        SortField::Type,
        SortField::Status,
        SortField::Lag,
        SortField::WriteSpeed,
        SortField::LastUpdate,
    ];

    /// Backend column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Cluster => "Cluster",
            SortField::Table => "Table",
            SortField::Topic => "Topic",
            SortField::ConsumerGroup => "ConsumerGroup",
            SortField::Type => "Type",
            SortField::Status => "Status",
            SortField::Lag => "Lag",
            SortField::WriteSpeed => "WriteSpeed",
            SortField::LastUpdate => "LastUpdate",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ViewError;

    /// Accepts `ConsumerGroup`, `consumer_group`, `consumer-group`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str().to_ascii_lowercase() == norm)
            .ok_or_else(|| ViewError::UnknownSortField(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Arrow shown next to the sorted column header.
    pub fn indicator(self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<SortField>,
    pub order: SortOrder,
}

impl SortState {
    /// Same field toggles the order; another field starts ascending.
    pub fn select(&mut self, field: SortField) {
        if self.field == Some(field) {
            self.order = self.order.toggled();
        } else {
            self.field = Some(field);
            self.order = SortOrder::Asc;
        }
    }
}

/// Rows per page offered by the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    Ten,
    #[default]
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = ViewError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        match size {
            10 => Ok(PageSize::Ten),
            20 => Ok(PageSize::Twenty),
            50 => Ok(PageSize::Fifty),
            100 => Ok(PageSize::Hundred),
            other => Err(ViewError::InvalidPageSize(other)),
        }
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page_size: PageSize,
    /// 1-based.
    pub current_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            current_page: 1,
        }
    }
}
