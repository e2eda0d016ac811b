//! Checklists and their items.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::session::Session;

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    #[serde(skip)]
    pub(crate) session: Session,
    #[serde(deserialize_with = "crate::types::non_empty_id")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id_board: String,
    #[serde(default)]
    pub id_card: String,
    #[serde(default)]
    pub pos: f64,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub check_items: Vec<CheckItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckItem {
    pub id: String,
    pub name: String,
    pub state: CheckItemState,
    pub pos: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckItemState {
    Complete,
    #[default]
    Incomplete,
}

impl Checklist {
    pub fn completed_count(&self) -> usize {
        self.check_items
            .iter()
            .filter(|item| item.state == CheckItemState::Complete)
            .count()
    }
}
