//! Board members.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::board::Board;
use crate::card::Card;
use crate::error::Result;
use crate::session::Session;

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(skip)]
    pub(crate) session: Session,
    #[serde(deserialize_with = "crate::types::non_empty_id")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub username: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub full_name: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub initials: String,
    #[serde(default)]
    pub avatar_hash: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub bio: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub confirmed: bool,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub member_type: String,
}

impl Member {
    /// Every board this member belongs to, not only the one it was reached from.
    pub fn boards(&self) -> Result<Vec<Board>> {
        self.session.fetch_all(&format!("/members/{}/boards", self.id))
    }

    /// Cards assigned to this member across all boards.
    pub fn cards(&self) -> Result<Vec<Card>> {
        self.session.fetch_all(&format!("/members/{}/cards", self.id))
    }
}
