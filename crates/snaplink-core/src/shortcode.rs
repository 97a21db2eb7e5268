use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// Longest short code any store accepts; matches the `short_code` column.
pub const MAX_SHORT_CODE_LEN: usize = 64;

/// A short code identifying a link.
///
/// Short codes are non-empty, at most [`MAX_SHORT_CODE_LEN`] characters and
/// contain only ASCII alphanumerics or underscores. Codec output always
/// satisfies this; user requests are brought into shape with
/// [`ShortCode::sanitize`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(SmolStr);

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl AsRef<str>) -> Result<Self, CoreError> {
        let code = code.as_ref();
        Self::validate(code)?;
        Ok(Self(SmolStr::new(code)))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (e.g. the codec, whose alphabet is a subset of the allowed characters).
    pub fn new_unchecked(code: impl AsRef<str>) -> Self {
        Self(SmolStr::new(code))
    }

    /// Turns a user-requested code into a valid short code.
    ///
    /// Every character outside `[A-Za-z0-9_]` is replaced with `_`, including
    /// surrounding whitespace. A blank request yields `Ok(None)`; a request
    /// longer than [`MAX_SHORT_CODE_LEN`] is rejected.
    pub fn sanitize(requested: &str) -> Result<Option<Self>, CoreError> {
        if requested.trim().is_empty() {
            return Ok(None);
        }

        let sanitized: String = requested
            .chars()
            .map(|c| if is_code_char(c) { c } else { '_' })
            .collect();
        Self::validate(&sanitized)?;
        Ok(Some(Self(SmolStr::new(sanitized))))
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<(), CoreError> {
        if code.is_empty() {
            return Err(CoreError::InvalidShortCode(
                "short code cannot be empty".to_string(),
            ));
        }

        if code.chars().count() > MAX_SHORT_CODE_LEN {
            return Err(CoreError::InvalidShortCode(format!(
                "must be at most {MAX_SHORT_CODE_LEN} characters, got {}",
                code.chars().count()
            )));
        }

        if !code.chars().all(is_code_char) {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only alphanumeric characters or underscores: '{}'",
                code
            )));
        }

        Ok(())
    }
}

fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl std::fmt::Debug for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCode").field(&self.0).finish()
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ShortCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortCode> for String {
    fn from(value: ShortCode) -> Self {
        value.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes() {
        assert!(ShortCode::new("b").is_ok());
        assert!(ShortCode::new("Abc_123").is_ok());
        assert!(ShortCode::new("a".repeat(64)).is_ok());
    }

    #[test]
    fn empty_is_invalid() {
        assert!(ShortCode::new("").is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(ShortCode::new("abc def").is_err());
        assert!(ShortCode::new("abc/def").is_err());
        assert!(ShortCode::new("abc-def").is_err());
    }

    #[test]
    fn sanitize_replaces_disallowed_characters() {
        let code = ShortCode::sanitize("My Link!").unwrap().unwrap();
        assert_eq!(code.as_str(), "My_Link_");
    }

    #[test]
    fn sanitize_replaces_each_non_ascii_char_once() {
        let code = ShortCode::sanitize("café-bar").unwrap().unwrap();
        assert_eq!(code.as_str(), "caf__bar");
    }

    #[test]
    fn sanitize_keeps_valid_codes() {
        let code = ShortCode::sanitize("already_ok_42").unwrap().unwrap();
        assert_eq!(code.as_str(), "already_ok_42");
    }

    #[test]
    fn sanitize_empty_request() {
        assert!(ShortCode::sanitize("").unwrap().is_none());
        assert!(ShortCode::sanitize("   ").unwrap().is_none());
    }

    #[test]
    fn sanitize_maps_surrounding_whitespace() {
        let code = ShortCode::sanitize(" My Link ").unwrap().unwrap();
        assert_eq!(code.as_str(), "_My_Link_");
    }

    #[test]
    fn overlong_codes_are_rejected() {
        assert!(ShortCode::new("a".repeat(MAX_SHORT_CODE_LEN + 1)).is_err());

        let err = ShortCode::sanitize(&"x".repeat(500)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidShortCode(_)));
        let fits = ShortCode::sanitize(&"-".repeat(MAX_SHORT_CODE_LEN)).unwrap().unwrap();
        assert_eq!(fits.as_str(), "_".repeat(MAX_SHORT_CODE_LEN));
    }

    #[test]
    fn to_url_trims_trailing_slash() {
        let code = ShortCode::new("abc123").unwrap();
        assert_eq!(code.to_url("https://snap.link"), "https://snap.link/abc123");
        assert_eq!(code.to_url("https://snap.link/"), "https://snap.link/abc123");
    }

    #[test]
    fn deserialize_rejects_invalid_code() {
        let err = ShortCode::try_from("bad code".to_string()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidShortCode(_)));
    }
}
