//! Typed issue form.
//!
//! The HTTP layer hands over a flat `field -> string` map. [`IssueForm`]
//! validates it once at the boundary so the dispatcher and encoder never deal
//! with missing keys.
//!
//! ```rust
//! use issue_relay::{IssueForm, SubmitType};
//!
//! let form = IssueForm::from_fields([
//!     ("submit_type", "github-proxy-report"),
//!     ("url", "https://example.com/page"),
//!     ("description", "Menu does not open"),
//! ])
//! .unwrap();
//! assert_eq!(form.submit_type, SubmitType::ProxyReport);
//!
//! let tagged = form.with_metadata("public_url", "https://github.com/o/r/issues/1");
//! assert!(form.metadata().is_empty());
//! assert_eq!(tagged.metadata().len(), 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::error::FormError;

/// Which submission flow the reporter picked on the web form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubmitType {
    /// Anonymous report filed by the bot account.
    ProxyReport,
    /// Report filed with the reporter's own GitHub credentials.
    AuthReport,
    /// Anything else. Kept verbatim so the dispatcher can reject it.
    Other(String),
}

impl SubmitType {
    pub const PROXY_REPORT: &'static str = "github-proxy-report";
    pub const AUTH_REPORT: &'static str = "github-auth-report";

    pub fn as_str(&self) -> &str {
        match self {
            SubmitType::ProxyReport => Self::PROXY_REPORT,
            SubmitType::AuthReport => Self::AUTH_REPORT,
            SubmitType::Other(raw) => raw,
        }
    }
}

impl From<&str> for SubmitType {
    fn from(value: &str) -> Self {
        match value {
            Self::PROXY_REPORT => SubmitType::ProxyReport,
            Self::AUTH_REPORT => SubmitType::AuthReport,
            other => SubmitType::Other(other.to_string()),
        }
    }
}

impl From<SubmitType> for String {
    fn from(value: SubmitType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SubmitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated bug report submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueForm {
    pub submit_type: SubmitType,
    /// Address of the page the report is about.
    pub url: String,
    pub description: String,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub problem_category: Option<String>,
    pub browser_test: Option<String>,
    pub steps_reproduce: Option<String>,
    pub ua_header: Option<String>,
    pub reported_with: Option<String>,
    /// Fields the form carried that have no dedicated slot.
    pub extra: BTreeMap<String, String>,
    metadata: BTreeMap<String, String>,
}

impl IssueForm {
    /// Minimal form with the three required fields set.
    pub fn new(
        submit_type: impl Into<SubmitType>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            submit_type: submit_type.into(),
            url: url.into(),
            description: description.into(),
            browser: None,
            os: None,
            problem_category: None,
            browser_test: None,
            steps_reproduce: None,
            ua_header: None,
            reported_with: None,
            extra: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Builds a form from raw submitted fields.
    ///
    /// `submit_type`, `url` and `description` are required; blank values
    /// count as missing. Optional blank fields are dropped. Unknown fields are
    /// preserved in [`IssueForm::extra`]. Only `submit_type` and `url` are
    /// trimmed; free text is kept as submitted.
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self, FormError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields: BTreeMap<String, String> = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let submit_type = take_required(&mut fields, "submit_type")?;
        let url = take_required(&mut fields, "url")?;
        let description = take_required(&mut fields, "description")?;

        Ok(Self {
            submit_type: SubmitType::from(submit_type.trim()),
            url: url.trim().to_string(),
            description,
            browser: take_optional(&mut fields, "browser"),
            os: take_optional(&mut fields, "os"),
            problem_category: take_optional(&mut fields, "problem_category"),
            browser_test: take_optional(&mut fields, "browser_test"),
            steps_reproduce: take_optional(&mut fields, "steps_reproduce"),
            ua_header: take_optional(&mut fields, "ua_header"),
            reported_with: take_optional(&mut fields, "reported_with"),
            extra: fields,
            metadata: BTreeMap::new(),
        })
    }

    /// Returns a copy of this form with one more metadata entry. `self` is
    /// left untouched; an existing entry under `key` is replaced in the copy.
    pub fn with_metadata(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.metadata.insert(key.into(), value.into());
        copy
    }

    /// Metadata overlay entries, in key order.
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}

impl TryFrom<std::collections::HashMap<String, String>> for IssueForm {
    type Error = FormError;

    fn try_from(fields: std::collections::HashMap<String, String>) -> Result<Self, Self::Error> {
        Self::from_fields(fields)
    }
}

fn take_required(
    fields: &mut BTreeMap<String, String>,
    name: &'static str,
) -> Result<String, FormError> {
    take_optional(fields, name).ok_or(FormError::MissingField(name))
}

fn take_optional(fields: &mut BTreeMap<String, String>, name: &str) -> Option<String> {
    fields
        .remove(name)
        .filter(|v| !v.trim().is_empty())
}
