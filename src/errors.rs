use colored::*;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Fetch,
    Render,
}

#[derive(Debug)]
pub enum ReleaseNotesError {
    // Configuration errors
    MissingInput(String),
    InvalidInput(String, String),
    ConfigFile(String),
    NoProjects,

    // Jira fetch errors
    JiraAuthFailed(u16),
    JiraApiError(u16, String),
    NetworkError(String),
    MalformedResponse(String),

    // Render errors
    MissingProject { key: String },
}

impl ReleaseNotesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReleaseNotesError::MissingInput(_)
            | ReleaseNotesError::InvalidInput(..)
            | ReleaseNotesError::ConfigFile(_)
            | ReleaseNotesError::NoProjects => ErrorKind::Configuration,

            ReleaseNotesError::JiraAuthFailed(_)
            | ReleaseNotesError::JiraApiError(..)
            | ReleaseNotesError::NetworkError(_)
            | ReleaseNotesError::MalformedResponse(_) => ErrorKind::Fetch,

            ReleaseNotesError::MissingProject { .. } => ErrorKind::Render,
        }
    }

    /// Single-line message without colors, used for the workflow failure annotation.
    pub fn headline(&self) -> String {
        match self {
            ReleaseNotesError::MissingInput(name) => {
                format!("Missing required input '{}'", name)
            }
            ReleaseNotesError::InvalidInput(name, msg) => {
                format!("Invalid input '{}': {}", name, msg)
            }
            ReleaseNotesError::ConfigFile(msg) => format!("Invalid config file: {}", msg),
            ReleaseNotesError::NoProjects => {
                "No project keys given, cannot build the Jira query link".to_string()
            }
            ReleaseNotesError::JiraAuthFailed(status) => {
                format!("Jira authentication failed ({})", status)
            }
            ReleaseNotesError::JiraApiError(status, body) => {
                format!("Jira API error ({}): {}", status, body)
            }
            ReleaseNotesError::NetworkError(msg) => format!("Network error: {}", msg),
            ReleaseNotesError::MalformedResponse(msg) => {
                format!("Malformed Jira search response: {}", msg)
            }
            ReleaseNotesError::MissingProject { key } => {
                format!("Issue '{}' has no project name", key)
            }
        }
    }
}

impl fmt::Display for ReleaseNotesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Configuration errors
            ReleaseNotesError::MissingInput(name) => {
                write!(f, "{}\n", self.headline().red().bold())?;
                write!(f, "   {}\n\n", "The action cannot run without it".dimmed())?;
                write!(f, "   To fix:\n")?;
                write!(f, "   1. Add '{}' to the step's 'with:' block\n", name)?;
                write!(f, "   2. Or pass {}", format!("--{}", name).green())
            }
            ReleaseNotesError::InvalidInput(_, msg) => {
                write!(f, "{}\n", "Invalid input".red().bold())?;
                write!(f, "   {}", msg.dimmed())
            }
            ReleaseNotesError::ConfigFile(msg) => {
                write!(f, "{}\n", "Invalid config file".red().bold())?;
                write!(f, "   {}\n\n", msg.dimmed())?;
                write!(f, "   Check the TOML syntax and the section names ([jira], [query], [output])")
            }
            ReleaseNotesError::NoProjects => {
                write!(f, "{}\n", "No project keys given".red().bold())?;
                write!(f, "   {}\n\n", "The query link is scoped to the first project in the list".dimmed())?;
                write!(f, "   To fix: set {} (e.g., \"NA, CX\")", "projects".green())
            }

            // Jira fetch errors
            ReleaseNotesError::JiraAuthFailed(status) => {
                write!(f, "{}\n", self.headline().red().bold())?;
                write!(f, "   {}\n\n", "Your API token may have expired or is invalid".dimmed())?;
                write!(f, "   To fix:\n")?;
                write!(f, "   1. Generate new token: {}\n", "https://id.atlassian.com/manage-profile/security/api-tokens".cyan())?;
                write!(f, "   2. Update the repository secret used for 'auth-token'")?;
                if *status == 403 {
                    write!(f, "\n   3. Verify the account can browse every listed project")?;
                }
                Ok(())
            }
            ReleaseNotesError::JiraApiError(status, msg) => {
                write!(f, "{}\n", format!("Jira API error ({})", status).red().bold())?;
                write!(f, "   {}\n\n", msg.dimmed())?;
                write!(f, "   Check the project keys and the component/label name")
            }
            ReleaseNotesError::NetworkError(msg) => {
                write!(f, "{}\n", "Network error".red().bold())?;
                write!(f, "   {}\n\n", msg.dimmed())?;
                write!(f, "   To fix:\n")?;
                write!(f, "   1. Check the 'domain' input\n")?;
                write!(f, "   2. Verify the runner can reach atlassian.net")
            }
            ReleaseNotesError::MalformedResponse(msg) => {
                write!(f, "{}\n", "Malformed Jira search response".red().bold())?;
                write!(f, "   {}", msg.dimmed())
            }

            // Render errors
            ReleaseNotesError::MissingProject { .. } => {
                write!(f, "{}\n", self.headline().red().bold())?;
                write!(f, "   {}", "Every issue must belong to a project group".dimmed())
            }
        }
    }
}

impl std::error::Error for ReleaseNotesError {}

impl From<std::io::Error> for ReleaseNotesError {
    fn from(err: std::io::Error) -> Self {
        ReleaseNotesError::ConfigFile(err.to_string())
    }
}

impl From<serde_json::Error> for ReleaseNotesError {
    fn from(err: serde_json::Error) -> Self {
        ReleaseNotesError::MalformedResponse(err.to_string())
    }
}

impl From<reqwest::Error> for ReleaseNotesError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            if status == 401 || status == 403 {
                ReleaseNotesError::JiraAuthFailed(status.as_u16())
            } else {
                ReleaseNotesError::JiraApiError(status.as_u16(), err.to_string())
            }
        } else if err.is_decode() {
            ReleaseNotesError::MalformedResponse(err.to_string())
        } else {
            ReleaseNotesError::NetworkError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ReleaseNotesError>;
