use crate::errors::{ReleaseNotesError, Result};
use crate::models::issue::Issue;
use std::collections::HashMap;

#[derive(Debug)]
pub struct ProjectGroup {
    pub name: String,
    pub issues: Vec<Issue>,
}

/// Issues keyed by project name. Groups iterate in the order their project
/// was first seen, issues in the order they were added.
#[derive(Debug, Default)]
pub struct GroupedIssues {
    groups: Vec<ProjectGroup>,
    index: HashMap<String, usize>,
}

impl GroupedIssues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, project: &str, issue: Issue) {
        let position = match self.index.get(project) {
            Some(&position) => position,
            None => {
                self.groups.push(ProjectGroup {
                    name: project.to_string(),
                    issues: Vec::new(),
                });
                self.index.insert(project.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[position].issues.push(issue);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.groups.iter().map(|g| g.issues.len()).sum()
    }
}

pub fn group_by_project(issues: Vec<Issue>) -> Result<GroupedIssues> {
    let mut grouped = GroupedIssues::new();

    for issue in issues {
        let project = issue
            .project_name()
            .map(str::to_string)
            .ok_or_else(|| ReleaseNotesError::MissingProject {
                key: issue.key.clone(),
            })?;
        grouped.push(&project, issue);
    }

    Ok(grouped)
}
