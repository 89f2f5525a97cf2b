use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents the API deployments the dashboard can read from.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// Local development backend.
    #[default]
    Local,
    /// Any other backend, addressed by its base URL.
    Custom { api_url: String },
}

impl Environment {
    /// Returns the API base URL, without a trailing slash.
    pub fn api_url(&self) -> String {
        match self {
            Environment::Local => "http://localhost:5000".to_string(),
            Environment::Custom { api_url } => api_url.trim_end_matches('/').to_string(),
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            lower if lower.starts_with("http://") || lower.starts_with("https://") => {
                Ok(Environment::Custom {
                    api_url: trimmed.trim_end_matches('/').to_string(),
                })
            }
            _ => Err(()),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Custom { .. } => write!(f, "Custom"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.api_url())
    }
}
