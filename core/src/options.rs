//! Card-creation options and the pre-flight checks run before submitting them.

use chrono::{DateTime, FixedOffset};

use crate::error::ValidationError;
use crate::transport::FormParams;

/// Upper bound on card names and descriptions, in characters.
pub const MAX_TEXT_LEN: usize = 16384;

/// Width of the API's hex object identifiers.
pub const ID_LEN: usize = 24;

/// Wire literal the API reads as "no value".
const NULL_LITERAL: &str = "null";

/// Due dates are sent with an explicit numeric offset and no fractional
/// seconds; the API does not accept the `Z` form here.
const DUE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Inputs for `Board::add_card`.
///
/// Empty strings and empty vectors mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddCardOpts {
    pub name: String,
    pub description: String,
    /// `"top"`, `"bottom"` or empty.
    pub position: String,
    /// `None` clears the due date.
    pub due: Option<DateTime<FixedOffset>>,
    pub list_id: String,
    pub labels: Vec<String>,
    pub members: Vec<String>,
}

impl AddCardOpts {
    pub fn new(name: impl Into<String>, list_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            list_id: list_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn position(mut self, position: impl Into<String>) -> Self {
        self.position = position.into();
        self
    }

    #[must_use]
    pub fn due(mut self, due: DateTime<FixedOffset>) -> Self {
        self.due = Some(due);
        self
    }

    #[must_use]
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }

    /// Check the options, stopping at the first violated rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name_len = self.name.chars().count();
        if !(1..=MAX_TEXT_LEN).contains(&name_len) {
            return Err(ValidationError::Name);
        }

        if self.description.chars().count() > MAX_TEXT_LEN {
            return Err(ValidationError::Description);
        }

        if !matches!(self.position.as_str(), "" | "top" | "bottom") {
            return Err(ValidationError::Position(self.position.clone()));
        }

        // Also catches a missing list id.
        if self.list_id.chars().count() != ID_LEN {
            return Err(ValidationError::ListId);
        }

        Ok(())
    }

    /// Form parameters for `POST /cards`. Optional fields are omitted when
    /// empty; `due` is always sent.
    pub fn to_form(&self) -> FormParams {
        let mut params = FormParams::new();
        params.set("name", self.name.as_str());
        params.set("idList", self.list_id.as_str());
        // Source-URL copying is not supported; the parameter stays inert.
        params.set("urlSource", NULL_LITERAL);

        if !self.description.is_empty() {
            params.set("desc", self.description.as_str());
        }
        if !self.position.is_empty() {
            params.set("pos", self.position.as_str());
        }
        if !self.labels.is_empty() {
            params.set("idLabels", self.labels.join(","));
        }
        if !self.members.is_empty() {
            params.set("idMembers", self.members.join(","));
        }

        match &self.due {
            Some(due) => params.set("due", due.format(DUE_FORMAT).to_string()),
            None => params.set("due", NULL_LITERAL),
        }
        params
    }
}
