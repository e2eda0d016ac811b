//! Value objects embedded in resources.
//!
//! These carry no session and have no identity of their own beyond the
//! resource that contains them.

use chrono::{DateTime, FixedOffset};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Resource ids are required and must not be blank.
pub(crate) fn non_empty_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let id = String::deserialize(deserializer)?;
    if id.is_empty() {
        return Err(D::Error::custom("resource id is empty"));
    }
    Ok(id)
}

/// A label as embedded in a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Label {
    pub id: String,
    pub id_board: String,
    pub name: String,
    pub color: Option<String>,
}

/// Minimal `{id, name}` reference used inside action payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceRef {
    pub id: String,
    pub name: String,
}

/// Abbreviated member embedded in actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberRef {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub initials: String,
    pub avatar_hash: Option<String>,
}

/// Summary counters shown on the front of a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Badges {
    pub votes: u32,
    pub viewing_member_voted: bool,
    pub subscribed: bool,
    pub check_items: u32,
    pub check_items_checked: u32,
    pub comments: u32,
    pub attachments: u32,
    pub description: bool,
    pub due: Option<DateTime<FixedOffset>>,
}
