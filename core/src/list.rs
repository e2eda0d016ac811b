//! Lists: the columns of a board.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::board::Board;
use crate::card::Card;
use crate::error::Result;
use crate::session::Session;

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    #[serde(skip)]
    pub(crate) session: Session,
    #[serde(deserialize_with = "crate::types::non_empty_id")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub closed: bool,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub id_board: String,
    #[serde(default)]
    pub pos: f64,
    #[serde(default)]
    pub subscribed: Option<bool>,
}

impl List {
    /// Open cards in this list, in list order.
    pub fn cards(&self) -> Result<Vec<Card>> {
        self.session.fetch_all(&format!("/lists/{}/cards", self.id))
    }

    pub fn board(&self) -> Result<Board> {
        self.session.fetch_one(&format!("/boards/{}", self.id_board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fake::{Call, FakeTransport};
    use crate::session::HasSession;

    #[test]
    fn list_navigates_to_cards_and_board() {
        let (session, fake) = FakeTransport::new()
            .respond("/lists/l1", r#"{"id":"l1","name":"Doing","idBoard":"b1","pos":16384.5}"#)
            .respond("/lists/l1/cards", r#"[{"id":"c1","idList":"l1"},{"id":"c2","idList":"l1"}]"#)
            .respond("/boards/b1", r#"{"id":"b1","name":"Roadmap"}"#)
            .into_session();

        let list = session.list("l1").unwrap();
        assert_eq!(list.pos, 16384.5);
        assert_eq!(list.subscribed, None);

        let cards = list.cards().unwrap();
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c.id_list == "l1" && c.session().is_attached()));
        assert_eq!(list.board().unwrap().name, "Roadmap");

        assert_eq!(
            fake.calls(),
            vec![
                Call::Get("/lists/l1".to_string()),
                Call::Get("/lists/l1/cards".to_string()),
                Call::Get("/boards/b1".to_string()),
            ]
        );
    }
}
