//! Boards: the root of the resource tree, and the navigator over their
//! children.
//!
//! Every child accessor issues one GET below `/boards/{id}` and returns
//! resources carrying this board's session, so results can be navigated
//! further without re-supplying credentials.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tracing::debug;

use crate::action::Action;
use crate::card::Card;
use crate::checklist::Checklist;
use crate::error::Result;
use crate::list::List;
use crate::member::Member;
use crate::options::AddCardOpts;
use crate::session::Session;

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(skip)]
    pub(crate) session: Session,
    #[serde(deserialize_with = "crate::types::non_empty_id")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub desc_data: Option<serde_json::Value>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub id_organization: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub pinned: bool,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub url: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub short_url: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub prefs: BoardPrefs,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub label_names: LabelNames,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardPrefs {
    #[serde_as(as = "DefaultOnNull")]
    pub permission_level: String,
    #[serde_as(as = "DefaultOnNull")]
    pub voting: String,
    #[serde_as(as = "DefaultOnNull")]
    pub comments: String,
    #[serde_as(as = "DefaultOnNull")]
    pub invitations: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "selfjoin")]
    pub self_join: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub card_covers: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub card_aging: String,
    #[serde_as(as = "DefaultOnNull")]
    pub calendar_feed_enabled: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub background: String,
    pub background_color: Option<String>,
    pub background_image: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub background_image_scaled: Vec<BoardBackground>,
    #[serde_as(as = "DefaultOnNull")]
    pub background_tile: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub background_brightness: String,
    #[serde_as(as = "DefaultOnNull")]
    pub can_be_public: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub can_be_org: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub can_be_private: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub can_invite: bool,
}

/// One resized variant of a board's background image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardBackground {
    pub width: u32,
    pub height: u32,
    pub url: String,
}

/// Display names for the six fixed label colors.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelNames {
    #[serde_as(as = "DefaultOnNull")]
    pub red: String,
    #[serde_as(as = "DefaultOnNull")]
    pub orange: String,
    #[serde_as(as = "DefaultOnNull")]
    pub yellow: String,
    #[serde_as(as = "DefaultOnNull")]
    pub green: String,
    #[serde_as(as = "DefaultOnNull")]
    pub blue: String,
    #[serde_as(as = "DefaultOnNull")]
    pub purple: String,
}

impl Board {
    pub fn lists(&self) -> Result<Vec<List>> {
        self.session.fetch_all(&self.path("lists"))
    }

    pub fn members(&self) -> Result<Vec<Member>> {
        self.session.fetch_all(&self.path("members"))
    }

    pub fn cards(&self) -> Result<Vec<Card>> {
        self.session.fetch_all(&self.path("cards"))
    }

    pub fn card(&self, card_id: &str) -> Result<Card> {
        self.session.fetch_one(&self.path(&format!("cards/{card_id}")))
    }

    pub fn checklists(&self) -> Result<Vec<Checklist>> {
        self.session.fetch_all(&self.path("checklists"))
    }

    /// Cards on this board assigned to `member_id`.
    pub fn member_cards(&self, member_id: &str) -> Result<Vec<Card>> {
        self.session
            .fetch_all(&self.path(&format!("members/{member_id}/cards")))
    }

    pub fn actions(&self) -> Result<Vec<Action>> {
        self.session.fetch_all(&self.path("actions"))
    }

    /// Create a card. Options are validated before anything is sent; an
    /// invalid set never reaches the transport.
    ///
    /// Not idempotent: submitting the same options twice creates two cards.
    pub fn add_card(&self, opts: &AddCardOpts) -> Result<Card> {
        if let Err(err) = opts.validate() {
            debug!(board = %self.id, %err, "rejecting card options");
            return Err(err.into());
        }
        self.session.submit("/cards", &opts.to_form())
    }

    fn path(&self, child: &str) -> String {
        format!("/boards/{}/{child}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::{ApiError, ValidationError};
    use crate::session::fake::{Call, FakeTransport};
    use crate::session::HasSession;
    use crate::transport::FormParams;

    const LIST_ID: &str = "5f1a2b3c4d5e6f7a8b9c0d1e";

    fn board_on(fake: FakeTransport) -> (Board, std::sync::Arc<FakeTransport>) {
        let (session, fake) = fake
            .respond("/boards/b1", r#"{"id":"b1","name":"Roadmap"}"#)
            .into_session();
        let board = session.board("b1").unwrap();
        (board, fake)
    }

    fn gets(fake: &FakeTransport) -> Vec<String> {
        fake.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Get(path) => Some(path),
                Call::Post(..) => None,
            })
            .collect()
    }

    #[test]
    fn decodes_full_board() {
        let raw = r##"{
            "id": "4eea4ffc91e31d1746000046",
            "name": "Example Board",
            "desc": "This board is used in the API examples",
            "descData": {"emoji": {}},
            "closed": false,
            "idOrganization": null,
            "pinned": true,
            "url": "https://trello.com/b/OXiBYZoj/example-board",
            "shortUrl": "https://trello.com/b/OXiBYZoj",
            "prefs": {
                "permissionLevel": "private",
                "voting": "disabled",
                "comments": "members",
                "invitations": "members",
                "selfjoin": true,
                "cardCovers": true,
                "cardAging": "regular",
                "calendarFeedEnabled": false,
                "background": "blue",
                "backgroundColor": "#0079BF",
                "backgroundImage": null,
                "backgroundImageScaled": [
                    {"width": 140, "height": 100, "url": "https://example.invalid/140x100.jpg"},
                    {"width": 1920, "height": 1200, "url": "https://example.invalid/1920x1200.jpg"}
                ],
                "backgroundTile": false,
                "backgroundBrightness": "dark",
                "canBePublic": true,
                "canBeOrg": true,
                "canBePrivate": true,
                "canInvite": true
            },
            "labelNames": {
                "red": "Blocked", "orange": "", "yellow": "Review",
                "green": "Done", "blue": "", "purple": "Spike"
            }
        }"##;
        let board: Board = serde_json::from_str(raw).unwrap();
        assert_eq!(board.id, "4eea4ffc91e31d1746000046");
        assert!(board.pinned);
        assert_eq!(board.id_organization, None);
        assert_eq!(board.prefs.permission_level, "private");
        assert!(board.prefs.self_join);
        assert_eq!(board.prefs.background_color.as_deref(), Some("#0079BF"));
        assert_eq!(board.prefs.background_image, None);
        assert_eq!(
            board.prefs.background_image_scaled[1],
            BoardBackground {
                width: 1920,
                height: 1200,
                url: "https://example.invalid/1920x1200.jpg".to_string(),
            }
        );
        assert_eq!(board.label_names.red, "Blocked");
        assert_eq!(board.label_names.purple, "Spike");
        assert!(!board.session().is_attached());
    }

    #[test]
    fn board_without_id_fails_to_decode() {
        let result: std::result::Result<Board, _> = serde_json::from_str(r#"{"name":"X"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn board_with_empty_id_fails_to_decode() {
        let result: std::result::Result<Board, _> = serde_json::from_str(r#"{"id":""}"#);
        assert!(result.is_err());
    }

    #[test]
    fn null_fields_decode_as_defaults() {
        let raw = r#"{
            "id": "b1",
            "name": null,
            "desc": null,
            "prefs": {
                "permissionLevel": null,
                "backgroundImage": null,
                "backgroundImageScaled": null,
                "canInvite": null
            },
            "labelNames": null
        }"#;
        let board: Board = serde_json::from_str(raw).unwrap();
        assert_eq!(board.name, "");
        assert_eq!(board.desc, "");
        assert_eq!(board.prefs.permission_level, "");
        assert_eq!(board.prefs.background_image, None);
        assert!(board.prefs.background_image_scaled.is_empty());
        assert!(!board.prefs.can_invite);
        assert_eq!(board.label_names, LabelNames::default());
    }

    #[test]
    fn child_collections_use_board_paths() {
        let (board, fake) = board_on(
            FakeTransport::new()
                .respond(
                    "/boards/b1/lists",
                    r#"[{"id":"l1","name":"To Do"},{"id":"l2","name":"Done"}]"#,
                )
                .respond("/boards/b1/members", r#"[{"id":"m1","username":"ada"}]"#)
                .respond("/boards/b1/cards", r#"[{"id":"c1","name":"Task"}]"#)
                .respond("/boards/b1/checklists", r#"[{"id":"k1","name":"Steps"}]"#)
                .respond("/boards/b1/actions", r#"[{"id":"a1","type":"createCard"}]"#),
        );

        let lists = board.lists().unwrap();
        let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["To Do", "Done"]);
        assert_eq!(board.members().unwrap()[0].username, "ada");
        assert_eq!(board.cards().unwrap()[0].id, "c1");
        assert_eq!(board.checklists().unwrap()[0].name, "Steps");
        assert_eq!(board.actions().unwrap()[0].kind, "createCard");

        assert_eq!(
            gets(&fake),
            [
                "/boards/b1",
                "/boards/b1/lists",
                "/boards/b1/members",
                "/boards/b1/cards",
                "/boards/b1/checklists",
                "/boards/b1/actions",
            ]
        );
        assert!(lists
            .iter()
            .all(|l| Session::same(l.session(), board.session())));
    }

    #[test]
    fn single_card_and_member_cards() {
        let (board, fake) = board_on(
            FakeTransport::new()
                .respond("/boards/b1/cards/c9", r#"{"id":"c9","name":"Nine"}"#)
                .respond("/boards/b1/members/m1/cards", r#"[{"id":"c1"},{"id":"c2"}]"#),
        );
        assert_eq!(board.card("c9").unwrap().name, "Nine");
        let cards = board.member_cards("m1").unwrap();
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c.session().is_attached()));
        assert_eq!(
            gets(&fake),
            ["/boards/b1", "/boards/b1/cards/c9", "/boards/b1/members/m1/cards"]
        );
    }

    #[test]
    fn add_card_rejects_invalid_options_without_calling_transport() {
        let (board, fake) = board_on(FakeTransport::new());
        let calls_before = fake.calls().len();

        let err = board.add_card(&AddCardOpts::new("", LIST_ID)).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ValidationError::Name)));

        let long_name = "x".repeat(16385);
        let err = board.add_card(&AddCardOpts::new(long_name, LIST_ID)).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ValidationError::Name)));

        let err = board.add_card(&AddCardOpts::new("Task", "short")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ValidationError::ListId)));

        assert_eq!(fake.calls().len(), calls_before);
    }

    #[test]
    fn add_card_posts_form_and_attaches_session() {
        let (board, fake) = board_on(FakeTransport::new().respond(
            "/cards",
            r#"{"id":"c1","name":"Ship it","idList":"5f1a2b3c4d5e6f7a8b9c0d1e","idBoard":"b1"}"#,
        ));
        let due = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2021, 1, 2, 3, 4, 5)
            .unwrap();
        let opts = AddCardOpts::new("Ship it", LIST_ID)
            .position("top")
            .due(due)
            .labels(["a", "b"]);

        let card = board.add_card(&opts).unwrap();
        assert_eq!(card.id, "c1");
        assert!(Session::same(card.session(), board.session()));

        let expected: FormParams = [
            ("name", "Ship it"),
            ("idList", LIST_ID),
            ("urlSource", "null"),
            ("pos", "top"),
            ("idLabels", "a,b"),
            ("due", "2021-01-02T03:04:05+00:00"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            fake.calls().last().cloned(),
            Some(Call::Post("/cards".to_string(), expected))
        );
    }

    #[test]
    fn add_card_transport_failure_returns_no_card() {
        let (board, _) = board_on(FakeTransport::new());
        let err = board.add_card(&AddCardOpts::new("Task", LIST_ID)).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
