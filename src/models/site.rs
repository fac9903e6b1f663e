/// A Jira Cloud site, `https://{domain}.atlassian.net`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraSite {
    domain: String,
}

impl JiraSite {
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.trim().to_string(),
        }
    }

    pub fn base_url(&self) -> String {
        format!("https://{}.atlassian.net", self.domain)
    }

    /// Keys go into the path as-is.
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url(), key)
    }

    pub fn issues_url(&self, project: &str) -> String {
        format!(
            "{}/jira/software/c/projects/{}/issues",
            self.base_url(),
            urlencoding::encode(project)
        )
    }
}
