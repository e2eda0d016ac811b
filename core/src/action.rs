//! Actions: the activity log of a board or card.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::session::Session;
use crate::types::{MemberRef, ResourceRef};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(skip)]
    pub(crate) session: Session,
    #[serde(deserialize_with = "crate::types::non_empty_id")]
    pub id: String,
    #[serde(default)]
    pub id_member_creator: String,
    /// Action type, e.g. `createCard`, `commentCard`, `updateCard`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub data: ActionData,
    #[serde(default)]
    pub member_creator: Option<MemberRef>,
}

/// The resources an action touched. Which fields are present depends on `kind`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ActionData {
    pub board: Option<ResourceRef>,
    pub list: Option<ResourceRef>,
    pub card: Option<ResourceRef>,
    pub text: Option<String>,
}
