use crate::errors::{ReleaseNotesError, Result};
use crate::models::site::JiraSite;
use crate::notes::markdown::escape;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Anything other than `asc` (any case) sorts newest first.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn as_jql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Component,
    Label,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPredicate {
    ComponentEquals(String),
    LabelsInclude(String),
}

impl FilterPredicate {
    pub fn new(mode: FilterMode, value: &str) -> Self {
        let value = value.trim().to_string();
        match mode {
            FilterMode::Component => FilterPredicate::ComponentEquals(value),
            FilterMode::Label => FilterPredicate::LabelsInclude(value),
        }
    }

    pub fn value(&self) -> &str {
        match self {
            FilterPredicate::ComponentEquals(v) | FilterPredicate::LabelsInclude(v) => v,
        }
    }

    fn to_jql(&self) -> String {
        match self {
            FilterPredicate::ComponentEquals(name) => format!("component = {}", jql_string(name)),
            FilterPredicate::LabelsInclude(name) => format!("labels = {}", jql_string(name)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub projects: Vec<String>,
    pub predicate: FilterPredicate,
    pub order: SortOrder,
}

impl FilterQuery {
    /// The filter without its ordering clause, as used in the browse link.
    pub fn filter_jql(&self) -> String {
        format!(
            "project IN ({}) AND {}",
            self.projects.join(", "),
            self.predicate.to_jql()
        )
    }

    pub fn to_jql(&self) -> String {
        format!("{} ORDER BY created {}", self.filter_jql(), self.order.as_jql())
    }
}

/// Splits a comma-separated project list. Keys are not validated or deduplicated.
pub fn split_projects(projects: &str) -> Vec<String> {
    if projects.trim().is_empty() {
        return Vec::new();
    }
    projects.split(',').map(|p| p.trim().to_string()).collect()
}

pub fn build_filter_query(
    projects: &str,
    version_or_label: &str,
    order: Option<&str>,
    mode: FilterMode,
) -> FilterQuery {
    FilterQuery {
        projects: split_projects(projects),
        predicate: FilterPredicate::new(mode, version_or_label),
        order: SortOrder::parse(order),
    }
}

/// Markdown link to the issue search UI of the first listed project.
pub fn build_query_title(
    domain: &str,
    projects: &str,
    filter: &FilterQuery,
    version_or_label: &str,
) -> Result<String> {
    let first_project = projects
        .split(',')
        .next()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(ReleaseNotesError::NoProjects)?;

    let site = JiraSite::new(domain);
    let url = format!(
        "{}?jql={}",
        site.issues_url(first_project),
        urlencoding::encode(&filter.filter_jql())
    );

    Ok(format!("[Jira - {}]({})", escape(version_or_label.trim()), url))
}

// JQL string literal: double-quoted, with quotes and backslashes escaped.
fn jql_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
