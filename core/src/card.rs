//! Cards and their own children (checklists, members, activity).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::action::Action;
use crate::board::Board;
use crate::checklist::Checklist;
use crate::error::Result;
use crate::list::List;
use crate::member::Member;
use crate::session::Session;
use crate::types::{Badges, Label};

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(skip)]
    pub(crate) session: Session,
    #[serde(deserialize_with = "crate::types::non_empty_id")]
    pub id: String,
    #[serde(default)]
    pub id_short: u64,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub pos: f64,
    #[serde(default)]
    pub due: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub due_complete: bool,
    #[serde(default)]
    pub date_last_activity: Option<DateTime<FixedOffset>>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub id_board: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub id_list: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub id_members: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub id_labels: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub id_checklists: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub badges: Badges,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub url: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub short_url: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub short_link: String,
    #[serde(default)]
    pub subscribed: bool,
}

impl Card {
    pub fn checklists(&self) -> Result<Vec<Checklist>> {
        self.session.fetch_all(&self.path("checklists"))
    }

    pub fn members(&self) -> Result<Vec<Member>> {
        self.session.fetch_all(&self.path("members"))
    }

    pub fn actions(&self) -> Result<Vec<Action>> {
        self.session.fetch_all(&self.path("actions"))
    }

    pub fn list(&self) -> Result<List> {
        self.session.fetch_one(&format!("/lists/{}", self.id_list))
    }

    pub fn board(&self) -> Result<Board> {
        self.session.fetch_one(&format!("/boards/{}", self.id_board))
    }

    fn path(&self, child: &str) -> String {
        format!("/cards/{}/{child}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::session::fake::{Call, FakeTransport};

    #[test]
    fn decodes_card_with_nullable_due() {
        let raw = r#"{
            "id": "5abbe4b7ddc1b351ef961414",
            "idShort": 7,
            "name": "Write the announcement",
            "desc": "",
            "closed": false,
            "pos": 65535,
            "due": "2021-01-02T03:04:05.000Z",
            "dueComplete": false,
            "dateLastActivity": "2021-01-01T12:00:00.000Z",
            "idBoard": "5abbe4b7ddc1b351ef961400",
            "idList": "5abbe4b7ddc1b351ef961401",
            "idMembers": [],
            "idLabels": ["lb1"],
            "labels": [
                {"id": "lb1", "idBoard": "5abbe4b7ddc1b351ef961400",
                 "name": "Blocked", "color": "red"}
            ],
            "badges": {
                "votes": 0, "comments": 2, "attachments": 1,
                "checkItems": 4, "checkItemsChecked": 3,
                "description": false, "due": "2021-01-02T03:04:05.000Z"
            },
            "shortLink": "H0TZyzbK"
        }"#;
        let card: Card = serde_json::from_str(raw).unwrap();
        assert_eq!(card.id_short, 7);
        assert_eq!(
            card.due.map(|d| d.with_timezone(&Utc)),
            Some(Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap())
        );
        assert_eq!(card.labels[0].color.as_deref(), Some("red"));
        assert_eq!(card.badges.check_items_checked, 3);

        let undated: Card = serde_json::from_str(r#"{"id":"c1","due":null}"#).unwrap();
        assert_eq!(undated.due, None);
    }

    #[test]
    fn card_navigates_to_its_children() {
        let (session, fake) = FakeTransport::new()
            .respond("/cards/c1", r#"{"id":"c1","idBoard":"b1","idList":"l1"}"#)
            .respond("/cards/c1/checklists", r#"[{"id":"k1","idCard":"c1","checkItems":[]}]"#)
            .respond("/cards/c1/members", r#"[{"id":"m1"}]"#)
            .respond("/cards/c1/actions", r#"[]"#)
            .respond("/lists/l1", r#"{"id":"l1","idBoard":"b1"}"#)
            .respond("/boards/b1", r#"{"id":"b1"}"#)
            .into_session();

        let card = session.card("c1").unwrap();
        assert_eq!(card.checklists().unwrap()[0].id_card, "c1");
        assert_eq!(card.members().unwrap()[0].id, "m1");
        assert!(card.actions().unwrap().is_empty());
        assert_eq!(card.list().unwrap().id, "l1");
        assert_eq!(card.board().unwrap().id, "b1");

        let paths: Vec<String> = fake
            .calls()
            .into_iter()
            .map(|c| match c {
                Call::Get(p) | Call::Post(p, _) => p,
            })
            .collect();
        assert_eq!(
            paths,
            [
                "/cards/c1",
                "/cards/c1/checklists",
                "/cards/c1/members",
                "/cards/c1/actions",
                "/lists/l1",
                "/boards/b1",
            ]
        );
    }
}
