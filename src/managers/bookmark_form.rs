//! Add-bookmark form state and URL validation.

use url::Url;

use crate::types::errors::ValidationError;
use crate::types::view::FormView;

/// Prefixes `https://` unless the input already names an http(s) scheme.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

fn has_http_scheme(input: &str) -> bool {
    ["http://", "https://"].iter().any(|prefix| {
        input
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Empty input is valid so an untouched field shows no error. Anything else
/// must parse as an absolute URL with a host once normalized.
pub fn validate_url(input: &str) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        return Ok(());
    }
    match Url::parse(&normalize_url(input)) {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
        _ => Err(ValidationError::InvalidUrl),
    }
}

/// Validated, normalized values handed to the list manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub title: String,
    pub url: String,
}

/// State of one add-bookmark form.
#[derive(Debug, Default)]
pub struct BookmarkForm {
    title: String,
    url: String,
    url_error: Option<ValidationError>,
    submitting: bool,
}

impl BookmarkForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn url_error(&self) -> Option<&ValidationError> {
        self.url_error.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// Stores the raw input and re-validates it.
    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
        self.url_error = validate_url(url).err();
    }

    pub fn can_submit(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.url.trim().is_empty()
            && self.url_error.is_none()
            && !self.submitting
    }

    /// Starts a submission, or says why it cannot start.
    ///
    /// While a submission is in flight every further call fails with
    /// `SubmissionInFlight` until [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> Result<Submission, ValidationError> {
        if self.submitting {
            return Err(ValidationError::SubmissionInFlight);
        }
        let submission = validate_submission(&self.title, &self.url)?;
        self.submitting = true;
        Ok(submission)
    }

    /// Ends the in-flight submission. Fields are cleared only on success so
    /// a failed add can be retried as typed.
    pub fn finish_submit(&mut self, succeeded: bool) {
        self.submitting = false;
        if succeeded {
            self.title.clear();
            self.url.clear();
            self.url_error = None;
        }
    }

    pub fn view(&self) -> FormView {
        FormView {
            title: self.title.clone(),
            url: self.url.clone(),
            url_error: self.url_error.as_ref().map(ToString::to_string),
            can_submit: self.can_submit(),
            submitting: self.submitting,
            button_label: if self.submitting {
                "Adding...".to_string()
            } else {
                "Add Bookmark".to_string()
            },
        }
    }
}

/// Checks a title/url pair and returns the trimmed title and normalized url.
pub fn validate_submission(title: &str, url: &str) -> Result<Submission, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if url.trim().is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    validate_url(url)?;
    Ok(Submission {
        title: title.to_string(),
        url: normalize_url(url),
    })
}
