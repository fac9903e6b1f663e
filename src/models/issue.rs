use serde::{Deserialize, Serialize};

/// Fields requested from the search endpoint.
pub const SEARCH_FIELDS: [&str; 7] = [
    "id",
    "key",
    "summary",
    "components",
    "labels",
    "assignee",
    "project",
];

#[derive(Debug, Serialize)]
pub struct SearchRequest {
    pub fields: Vec<String>,
    pub jql: String,
    #[serde(rename = "maxResults")]
    pub max_results: u32,
}

impl SearchRequest {
    pub fn new(jql: String, max_results: u32) -> Self {
        Self {
            fields: SEARCH_FIELDS.iter().map(|f| f.to_string()).collect(),
            jql,
            max_results,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default, rename = "isLast")]
    pub is_last: Option<bool>,
    #[serde(default, rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

impl SearchResponse {
    /// True when Jira reports matches beyond the ones returned.
    pub fn is_truncated(&self) -> bool {
        if self.is_last == Some(false) || self.next_page_token.is_some() {
            return true;
        }
        matches!(self.total, Some(total) if total as usize > self.issues.len())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Issue {
    pub id: String,
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub project: Option<Project>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Project {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Component {
    pub name: String,
}

impl Issue {
    pub fn project_name(&self) -> Option<&str> {
        self.fields
            .project
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }

    pub fn assignee_name(&self) -> Option<&str> {
        self.fields.assignee.as_ref().map(|a| a.display_name.as_str())
    }

    pub fn component_names(&self) -> Vec<&str> {
        self.fields.components.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn label_names(&self) -> Vec<&str> {
        self.fields.labels.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
pub(crate) fn issue(key: &str, project: Option<&str>, summary: &str, assignee: Option<&str>) -> Issue {
    Issue {
        id: key.trim_start_matches(|c: char| !c.is_ascii_digit()).to_string(),
        key: key.to_string(),
        fields: IssueFields {
            summary: summary.to_string(),
            assignee: assignee.map(|name| User {
                display_name: name.to_string(),
            }),
            project: project.map(|name| Project {
                name: Some(name.to_string()),
            }),
            components: Vec::new(),
            labels: Vec::new(),
        },
    }
}
