//! Form encoding: [`IssueForm`] → GitHub "create issue" payload.
//!
//! The title follows `"{domain} - {problem summary}"`. Machine-readable
//! metadata is embedded at the top of the body as HTML comments
//! (`<!-- @key: value -->`) so it stays invisible in the rendered issue but can
//! be scraped by moderation tooling.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::form::IssueForm;

/// Title of the stub issue filed publicly while a proxy report awaits
/// moderation.
pub const PLACEHOLDER_TITLE: &str = "Placeholder in-moderation title.";
/// Body of the stub issue filed publicly while a proxy report awaits
/// moderation.
pub const PLACEHOLDER_BODY: &str = "Placeholder in-moderation body.";

/// Form fields copied into the metadata comment block, in this order.
const FORM_METADATA_KEYS: [&str; 3] = ["browser", "ua_header", "reported_with"];

const EXTRA_LABELS_FIELD: &str = "extra_labels";

/// Request body for `POST /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedIssue {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl EncodedIssue {
    /// Fixed payload sent to the public tracker for anonymous reports. None of
    /// the reporter's content is included.
    pub fn placeholder() -> Self {
        Self {
            title: PLACEHOLDER_TITLE.to_string(),
            body: PLACEHOLDER_BODY.to_string(),
            labels: Vec::new(),
        }
    }
}

/// Turns a form into an API-ready payload.
pub trait FormEncoder: Send + Sync {
    fn encode(&self, form: &IssueForm) -> EncodedIssue;
}

/// Default encoder producing Markdown issue bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueFormEncoder;

impl FormEncoder for IssueFormEncoder {
    fn encode(&self, form: &IssueForm) -> EncodedIssue {
        EncodedIssue {
            title: format!(
                "{} - {}",
                domain_of(&form.url),
                problem_summary(form.problem_category.as_deref())
            ),
            body: render_body(form),
            labels: labels_for(form),
        }
    }
}

/// Human-readable summary for a `problem_category` form value.
pub fn problem_summary(category: Option<&str>) -> &'static str {
    match category {
        Some("detection_bug") => "Browser unsupported",
        Some("mobile_site_bug") => "Mobile site is not usable",
        Some("desktop_site_instead") => "Desktop site instead of mobile site",
        Some("video_bug") => "Video or audio doesn't play",
        Some("site_bug") => "Site is not usable",
        Some("layout_bug") => "Design is broken",
        Some("unknown_bug") => "Something else",
        _ => "Unknown",
    }
}

/// Host part of a reported URL. Scheme-less input such as `example.com/a` is
/// accepted; anything unparseable is returned trimmed as-is.
pub fn domain_of(url: &str) -> String {
    let trimmed = url.trim();
    let parsed = reqwest::Url::parse(trimmed)
        .ok()
        .filter(|u| u.host_str().is_some())
        .or_else(|| reqwest::Url::parse(&format!("http://{trimmed}")).ok());

    parsed
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| trimmed.to_string())
}

fn render_body(form: &IssueForm) -> String {
    let mut body = String::new();

    let form_metadata = [
        form.browser.as_deref(),
        form.ua_header.as_deref(),
        form.reported_with.as_deref(),
    ];
    for (key, value) in FORM_METADATA_KEYS.iter().zip(form_metadata) {
        if let Some(value) = value {
            push_metadata_comment(&mut body, key, value);
        }
    }
    for (key, value) in form.metadata() {
        push_metadata_comment(&mut body, key, value);
    }
    if !body.is_empty() {
        body.push('\n');
    }

    let _ = writeln!(body, "**URL**: {}", form.url);
    body.push('\n');
    let _ = writeln!(body, "**Browser / Version**: {}", or_unknown(&form.browser));
    let _ = writeln!(body, "**Operating System**: {}", or_unknown(&form.os));
    let _ = writeln!(
        body,
        "**Tested Another Browser**: {}",
        or_unknown(&form.browser_test)
    );
    body.push('\n');
    let _ = writeln!(
        body,
        "**Problem type**: {}",
        problem_summary(form.problem_category.as_deref())
    );
    let _ = writeln!(body, "**Description**: {}", form.description);
    body.push_str("**Steps to Reproduce**:\n");
    let _ = writeln!(body, "{}", or_unknown(&form.steps_reproduce));

    let details: Vec<_> = form
        .extra
        .iter()
        .filter(|(key, _)| key.as_str() != EXTRA_LABELS_FIELD)
        .collect();
    if !details.is_empty() {
        body.push_str("\n<details>\n<summary>Additional details</summary>\n\n");
        for (key, value) in details {
            let _ = writeln!(body, "- {key}: {value}");
        }
        body.push_str("</details>\n");
    }

    body
}

fn push_metadata_comment(body: &mut String, key: &str, value: &str) {
    // A literal "-->" would close the comment early.
    let value = value.replace("-->", "-- >");
    let _ = writeln!(body, "<!-- @{key}: {value} -->");
}

fn or_unknown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("Unknown")
}

fn labels_for(form: &IssueForm) -> Vec<String> {
    let mut labels = Vec::new();

    if let Some(name) = form
        .browser
        .as_deref()
        .and_then(|b| b.split_whitespace().next())
    {
        labels.push(format!("browser-{}", name.to_ascii_lowercase()));
    }

    if let Some(extra) = form.extra.get(EXTRA_LABELS_FIELD) {
        for label in extra.split(',').map(str::trim).filter(|l| !l.is_empty()) {
            if !labels.iter().any(|l| l == label) {
                labels.push(label.to_string());
            }
        }
    }

    labels
}
