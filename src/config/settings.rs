use crate::api::jira::MAX_RESULTS_CAP;
use crate::errors::{ReleaseNotesError, Result};
use crate::query::FilterMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_OUTPUT_KEY: &str = "release_notes";

/// Settings as read from a TOML file or the action inputs, before validation.
/// Every field is optional so layers can be merged.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub jira: RawJira,
    pub query: RawQuery,
    pub output: RawOutput,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawJira {
    pub domain: Option<String>,
    pub email: Option<String>,
    pub auth_token: Option<String>,
    pub max_results: Option<u32>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawQuery {
    pub projects: Option<String>,
    pub version: Option<String>,
    pub order: Option<String>,
    pub mode: Option<FilterMode>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawOutput {
    pub key: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug)]
pub struct Settings {
    pub jira: JiraConfig,
    pub query: QueryConfig,
    pub output: OutputConfig,
}

#[derive(Debug)]
pub struct JiraConfig {
    pub domain: String,
    pub auth: AuthMethod,
    pub max_results: u32,
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthMethod {
    /// Pre-encoded credentials, sent as `Authorization: Basic <token>`.
    BasicToken { token: String },
    /// Jira Cloud email + API token.
    ApiToken { email: String, token: String },
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::BasicToken { token } => f
                .debug_struct("BasicToken")
                .field("token", &mask_token(token))
                .finish(),
            AuthMethod::ApiToken { email, token } => f
                .debug_struct("ApiToken")
                .field("email", email)
                .field("token", &mask_token(token))
                .finish(),
        }
    }
}

#[derive(Debug)]
pub struct QueryConfig {
    pub projects: String,
    pub version: String,
    pub order: Option<String>,
    pub mode: FilterMode,
}

#[derive(Debug)]
pub struct OutputConfig {
    pub key: String,
    pub file: Option<PathBuf>,
}

impl RawSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path).map_err(|e| {
            ReleaseNotesError::ConfigFile(format!("{}: {}", path.display(), e))
        })?;

        toml::from_str(&config_str)
            .map_err(|e| ReleaseNotesError::ConfigFile(format!("{}: {}", path.display(), e)))
    }

    /// Layers `overrides` on top of `self`. Blank strings count as unset.
    pub fn merge(self, overrides: RawSettings) -> RawSettings {
        RawSettings {
            jira: RawJira {
                domain: pick(overrides.jira.domain, self.jira.domain),
                email: pick(overrides.jira.email, self.jira.email),
                auth_token: pick(overrides.jira.auth_token, self.jira.auth_token),
                max_results: overrides.jira.max_results.or(self.jira.max_results),
                timeout_secs: overrides.jira.timeout_secs.or(self.jira.timeout_secs),
            },
            query: RawQuery {
                projects: pick(overrides.query.projects, self.query.projects),
                version: pick(overrides.query.version, self.query.version),
                order: pick(overrides.query.order, self.query.order),
                mode: overrides.query.mode.or(self.query.mode),
            },
            output: RawOutput {
                key: pick(overrides.output.key, self.output.key),
                file: overrides.output.file.or(self.output.file),
            },
        }
    }

    pub fn resolve(self) -> Result<Settings> {
        let domain = normalize_domain(&required(self.jira.domain, "domain")?)?;
        let token = required(self.jira.auth_token, "auth-token")?;
        let auth = match non_blank(self.jira.email) {
            Some(email) => AuthMethod::ApiToken { email, token },
            None => AuthMethod::BasicToken { token },
        };

        let max_results = match self.jira.max_results {
            Some(0) => {
                return Err(ReleaseNotesError::InvalidInput(
                    "max-results".to_string(),
                    "must be at least 1".to_string(),
                ))
            }
            Some(n) if n > MAX_RESULTS_CAP => {
                warn!(requested = n, cap = MAX_RESULTS_CAP, "max-results above the search cap, clamping");
                MAX_RESULTS_CAP
            }
            Some(n) => n,
            None => MAX_RESULTS_CAP,
        };

        Ok(Settings {
            jira: JiraConfig {
                domain,
                auth,
                max_results,
                timeout_secs: self.jira.timeout_secs.filter(|&secs| secs > 0),
            },
            query: QueryConfig {
                projects: required(self.query.projects, "projects")?,
                version: required(self.query.version, "version")?,
                order: non_blank(self.query.order),
                mode: self.query.mode.unwrap_or_default(),
            },
            output: OutputConfig {
                key: non_blank(self.output.key).unwrap_or_else(|| DEFAULT_OUTPUT_KEY.to_string()),
                file: self.output.file,
            },
        })
    }
}

/// Parses a raw action input. Blank values count as unset.
pub fn parse_input<T>(name: &str, value: Option<&str>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|e| ReleaseNotesError::InvalidInput(name.to_string(), format!("'{}': {}", v, e))),
        None => Ok(None),
    }
}

pub fn parse_mode(value: Option<&str>) -> Result<Option<FilterMode>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => <FilterMode as clap::ValueEnum>::from_str(v, true)
            .map(Some)
            .map_err(|_| {
                ReleaseNotesError::InvalidInput(
                    "mode".to_string(),
                    format!("'{}' is not one of: component, label", v),
                )
            }),
        None => Ok(None),
    }
}

/// `abcd***wxyz` for long tokens, `***` otherwise.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 12 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn pick(preferred: Option<String>, fallback: Option<String>) -> Option<String> {
    non_blank(preferred).or_else(|| non_blank(fallback))
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    non_blank(value).ok_or_else(|| ReleaseNotesError::MissingInput(name.to_string()))
}

// Accepts `acme` or `acme.atlassian.net`.
fn normalize_domain(domain: &str) -> Result<String> {
    let domain = domain.trim_end_matches(".atlassian.net");
    if domain.is_empty() || domain.contains(|c: char| c == '/' || c == ':' || c.is_whitespace()) {
        return Err(ReleaseNotesError::InvalidInput(
            "domain".to_string(),
            format!("'{}' is not a Jira Cloud site name (e.g., acme for acme.atlassian.net)", domain),
        ));
    }
    Ok(domain.to_string())
}
