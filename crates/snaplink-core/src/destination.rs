use crate::error::{CoreError, Result};
use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;

/// `scheme://host[:port][/path]`, scheme `http` or `https`, case-insensitive.
static DESTINATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://[a-z0-9-]+(\.[a-z0-9-]+)*(:[0-9]+)?(/.*)?$")
        .expect("destination pattern is a valid regex")
});

/// A destination URL that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationUrl(String);

impl DestinationUrl {
    pub fn parse(url: impl Into<String>) -> Result<Self> {
        let url = url.into();

        if url.is_empty() {
            return Err(CoreError::InvalidUrl("URL cannot be empty".to_string()));
        }

        if !DESTINATION_PATTERN.is_match(&url) {
            return Err(CoreError::InvalidUrl(format!(
                "URL must look like http(s)://host[:port][/path]: {}",
                url
            )));
        }

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for DestinationUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
