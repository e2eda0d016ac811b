//! In-memory stand-in for the board API.
//!
//! Serves the read endpoints the client navigates plus `POST /cards`, with
//! the same key/token query-parameter authentication. DTOs here are defined
//! independently of `trello-core`; the core's integration tests catch drift.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub closed: bool,
    pub pinned: bool,
    pub id_organization: Option<String>,
    pub url: String,
    pub prefs: BoardPrefs,
    pub label_names: HashMap<String, String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPrefs {
    pub permission_level: String,
    pub background: String,
    pub background_color: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub name: String,
    pub closed: bool,
    pub id_board: String,
    pub pos: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub id_short: u64,
    pub name: String,
    pub desc: String,
    pub closed: bool,
    pub pos: f64,
    pub due: Option<String>,
    pub id_board: String,
    pub id_list: String,
    pub id_members: Vec<String>,
    pub id_labels: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub initials: String,
    pub member_type: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: String,
    pub name: String,
    pub id_board: String,
    pub id_card: String,
    pub check_items: Vec<CheckItem>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CheckItem {
    pub id: String,
    pub name: String,
    pub state: String,
    pub pos: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    pub id_member_creator: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub data: ActionData,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<Ref>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Ref>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Ref>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Ref {
    pub id: String,
    pub name: String,
}

/// Form body accepted by `POST /cards`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCard {
    pub name: Option<String>,
    pub id_list: Option<String>,
    pub desc: Option<String>,
    pub pos: Option<String>,
    pub due: Option<String>,
    pub id_labels: Option<String>,
    pub id_members: Option<String>,
    pub url_source: Option<String>,
}

/// Everything the server knows. `me` is the member that owns the token.
#[derive(Clone, Debug, Default)]
pub struct Store {
    pub me: String,
    pub boards: Vec<Board>,
    pub lists: Vec<List>,
    pub cards: Vec<Card>,
    pub members: Vec<Member>,
    pub checklists: Vec<Checklist>,
    pub actions: Vec<Action>,
    /// Board id to member ids.
    pub memberships: HashMap<String, Vec<String>>,
}

/// Key/token pair every request must carry as query parameters.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub key: String,
    pub token: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            key: "test-key".to_string(),
            token: "test-token".to_string(),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    credentials: Arc<Credentials>,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Ids in the seeded store, for tests.
pub mod fixture {
    pub const BOARD: &str = "5f0000000000000000000b01";
    pub const LIST_TODO: &str = "5f0000000000000000000101";
    pub const LIST_DONE: &str = "5f0000000000000000000102";
    pub const CARD_PLAN: &str = "5f0000000000000000000c01";
    pub const CARD_SHIP: &str = "5f0000000000000000000c02";
    pub const MEMBER_ADA: &str = "5f0000000000000000000a01";
    pub const MEMBER_GRACE: &str = "5f0000000000000000000a02";
    pub const CHECKLIST: &str = "5f0000000000000000000d01";
}

impl Store {
    /// One board with two lists, two members, two cards and a checklist.
    pub fn seeded() -> Self {
        use fixture::*;

        let board = Board {
            id: BOARD.to_string(),
            name: "Launch".to_string(),
            desc: "Release planning".to_string(),
            url: format!("https://example.invalid/b/{BOARD}"),
            prefs: BoardPrefs {
                permission_level: "private".to_string(),
                background: "blue".to_string(),
                background_color: Some("#0079BF".to_string()),
            },
            label_names: [("red", "Blocked"), ("green", "Done")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Board::default()
        };
        let list = |id: &str, name: &str, pos: f64| List {
            id: id.to_string(),
            name: name.to_string(),
            id_board: BOARD.to_string(),
            pos,
            ..List::default()
        };
        let member = |id: &str, username: &str, full_name: &str, initials: &str| Member {
            id: id.to_string(),
            username: username.to_string(),
            full_name: full_name.to_string(),
            initials: initials.to_string(),
            member_type: "normal".to_string(),
        };
        let cards = vec![
            Card {
                id: CARD_PLAN.to_string(),
                id_short: 1,
                name: "Plan the launch".to_string(),
                pos: 16384.0,
                id_board: BOARD.to_string(),
                id_list: LIST_TODO.to_string(),
                id_members: vec![MEMBER_ADA.to_string()],
                ..Card::default()
            },
            Card {
                id: CARD_SHIP.to_string(),
                id_short: 2,
                name: "Ship it".to_string(),
                pos: 16384.0,
                due: Some("2021-01-02T03:04:05.000Z".to_string()),
                id_board: BOARD.to_string(),
                id_list: LIST_DONE.to_string(),
                id_members: vec![MEMBER_ADA.to_string(), MEMBER_GRACE.to_string()],
                ..Card::default()
            },
        ];
        let checklist = Checklist {
            id: CHECKLIST.to_string(),
            name: "Steps".to_string(),
            id_board: BOARD.to_string(),
            id_card: CARD_PLAN.to_string(),
            check_items: vec![
                CheckItem {
                    id: new_id(),
                    name: "Draft".to_string(),
                    state: "complete".to_string(),
                    pos: 1.0,
                },
                CheckItem {
                    id: new_id(),
                    name: "Review".to_string(),
                    state: "incomplete".to_string(),
                    pos: 2.0,
                },
            ],
        };

        Store {
            me: MEMBER_ADA.to_string(),
            boards: vec![board],
            lists: vec![list(LIST_TODO, "To Do", 1.0), list(LIST_DONE, "Done", 2.0)],
            cards,
            members: vec![
                member(MEMBER_ADA, "ada", "Ada Lovelace", "AL"),
                member(MEMBER_GRACE, "grace", "Grace Hopper", "GH"),
            ],
            checklists: vec![checklist],
            actions: Vec::new(),
            memberships: HashMap::from([(
                BOARD.to_string(),
                vec![MEMBER_ADA.to_string(), MEMBER_GRACE.to_string()],
            )]),
        }
    }

    fn board(&self, id: &str) -> Result<&Board, (StatusCode, String)> {
        self.boards.iter().find(|b| b.id == id).ok_or_else(not_found)
    }

    fn list(&self, id: &str) -> Result<&List, (StatusCode, String)> {
        self.lists.iter().find(|l| l.id == id).ok_or_else(not_found)
    }

    fn card(&self, id: &str) -> Result<&Card, (StatusCode, String)> {
        self.cards.iter().find(|c| c.id == id).ok_or_else(not_found)
    }

    fn member(&self, id: &str) -> Result<&Member, (StatusCode, String)> {
        let id = if id == "me" { self.me.as_str() } else { id };
        self.members
            .iter()
            .find(|m| m.id == id || m.username == id)
            .ok_or_else(not_found)
    }

    fn cards_where(&self, keep: impl Fn(&Card) -> bool) -> Vec<Card> {
        let mut cards: Vec<Card> = self.cards.iter().filter(|c| keep(c)).cloned().collect();
        cards.sort_by(|a, b| a.pos.total_cmp(&b.pos));
        cards
    }
}

fn not_found() -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found.".to_string(),
    )
}

fn bad_request(msg: &str) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, msg.to_string())
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()[..24].to_string()
}

/// Router over the seeded store with default credentials.
pub fn app() -> Router {
    app_with(Store::seeded(), Credentials::default())
}

pub fn app_with(store: Store, credentials: Credentials) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(store)),
        credentials: Arc::new(credentials),
    };
    Router::new()
        .route("/boards", get(list_boards))
        .route("/boards/", get(list_boards))
        .route("/boards/{id}", get(get_board))
        .route("/boards/{id}/lists", get(board_lists))
        .route("/boards/{id}/members", get(board_members))
        .route("/boards/{id}/cards", get(board_cards))
        .route("/boards/{id}/cards/{card_id}", get(board_card))
        .route("/boards/{id}/checklists", get(board_checklists))
        .route("/boards/{id}/members/{member_id}/cards", get(board_member_cards))
        .route("/boards/{id}/actions", get(board_actions))
        .route("/lists/{id}", get(get_list))
        .route("/lists/{id}/cards", get(list_cards))
        .route("/cards", post(create_card))
        .route("/cards/{id}", get(get_card))
        .route("/cards/{id}/checklists", get(card_checklists))
        .route("/cards/{id}/members", get(card_members))
        .route("/cards/{id}/actions", get(card_actions))
        .route("/members/{id}", get(get_member))
        .route("/members/{id}/boards", get(member_boards))
        .route("/members/{id}/cards", get(member_cards))
        .layer(middleware::from_fn_with_state(state.clone(), require_credentials))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Store::seeded(), Credentials::default()).await
}

pub async fn run_with(
    listener: TcpListener,
    store: Store,
    credentials: Credentials,
) -> Result<(), std::io::Error> {
    info!(addr = ?listener.local_addr().ok(), "mock board API listening");
    axum::serve(listener, app_with(store, credentials)).await
}

async fn require_credentials(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = query.get("key") == Some(&state.credentials.key)
        && query.get("token") == Some(&state.credentials.token);
    if !authorized {
        debug!(path = %request.uri().path(), "rejecting request without valid credentials");
        return (StatusCode::UNAUTHORIZED, "invalid key").into_response();
    }
    next.run(request).await
}

async fn list_boards(State(state): State<AppState>) -> Json<Vec<Board>> {
    Json(state.db.read().await.boards.clone())
}

async fn get_board(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Board> {
    let db = state.db.read().await;
    db.board(&id).cloned().map(Json)
}

async fn board_lists(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<List>> {
    let db = state.db.read().await;
    db.board(&id)?;
    let mut lists: Vec<List> = db.lists.iter().filter(|l| l.id_board == id).cloned().collect();
    lists.sort_by(|a, b| a.pos.total_cmp(&b.pos));
    Ok(Json(lists))
}

async fn board_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Member>> {
    let db = state.db.read().await;
    db.board(&id)?;
    let ids = db.memberships.get(&id).cloned().unwrap_or_default();
    Ok(Json(
        db.members.iter().filter(|m| ids.contains(&m.id)).cloned().collect(),
    ))
}

async fn board_cards(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Card>> {
    let db = state.db.read().await;
    db.board(&id)?;
    Ok(Json(db.cards_where(|c| c.id_board == id)))
}

async fn board_card(
    State(state): State<AppState>,
    Path((id, card_id)): Path<(String, String)>,
) -> ApiResult<Card> {
    let db = state.db.read().await;
    db.board(&id)?;
    let card = db.card(&card_id)?;
    if card.id_board != id {
        return Err(not_found());
    }
    Ok(Json(card.clone()))
}

async fn board_checklists(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Checklist>> {
    let db = state.db.read().await;
    db.board(&id)?;
    Ok(Json(
        db.checklists.iter().filter(|c| c.id_board == id).cloned().collect(),
    ))
}

async fn board_member_cards(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(String, String)>,
) -> ApiResult<Vec<Card>> {
    let db = state.db.read().await;
    db.board(&id)?;
    let member_id = db.member(&member_id)?.id.clone();
    Ok(Json(db.cards_where(|c| {
        c.id_board == id && c.id_members.contains(&member_id)
    })))
}

async fn board_actions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Action>> {
    let db = state.db.read().await;
    db.board(&id)?;
    Ok(Json(
        db.actions
            .iter()
            .rev()
            .filter(|a| a.data.board.as_ref().is_some_and(|b| b.id == id))
            .cloned()
            .collect(),
    ))
}

async fn get_list(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<List> {
    let db = state.db.read().await;
    db.list(&id).cloned().map(Json)
}

async fn list_cards(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<Card>> {
    let db = state.db.read().await;
    db.list(&id)?;
    Ok(Json(db.cards_where(|c| c.id_list == id && !c.closed)))
}

async fn get_card(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Card> {
    let db = state.db.read().await;
    db.card(&id).cloned().map(Json)
}

async fn card_checklists(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Checklist>> {
    let db = state.db.read().await;
    db.card(&id)?;
    Ok(Json(
        db.checklists.iter().filter(|c| c.id_card == id).cloned().collect(),
    ))
}

async fn card_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Member>> {
    let db = state.db.read().await;
    let card = db.card(&id)?;
    Ok(Json(
        db.members
            .iter()
            .filter(|m| card.id_members.contains(&m.id))
            .cloned()
            .collect(),
    ))
}

async fn card_actions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Action>> {
    let db = state.db.read().await;
    db.card(&id)?;
    Ok(Json(
        db.actions
            .iter()
            .rev()
            .filter(|a| a.data.card.as_ref().is_some_and(|c| c.id == id))
            .cloned()
            .collect(),
    ))
}

async fn get_member(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Member> {
    let db = state.db.read().await;
    db.member(&id).cloned().map(Json)
}

async fn member_boards(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Board>> {
    let db = state.db.read().await;
    let member_id = db.member(&id)?.id.clone();
    Ok(Json(
        db.boards
            .iter()
            .filter(|b| {
                db.memberships
                    .get(&b.id)
                    .is_some_and(|ids| ids.contains(&member_id))
            })
            .cloned()
            .collect(),
    ))
}

async fn member_cards(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Card>> {
    let db = state.db.read().await;
    let member_id = db.member(&id)?.id.clone();
    Ok(Json(db.cards_where(|c| c.id_members.contains(&member_id))))
}

async fn create_card(
    State(state): State<AppState>,
    Form(input): Form<CreateCard>,
) -> ApiResult<Card> {
    let mut db = state.db.write().await;

    let name = input
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| bad_request("invalid value for name"))?;
    let id_list = input.id_list.unwrap_or_default();
    let list = db.list(&id_list)?.clone();
    let due = parse_due(input.due.as_deref())?;
    let pos = next_pos(&db, &list.id, input.pos.as_deref())?;

    let card = Card {
        id: new_id(),
        id_short: db.cards.iter().filter(|c| c.id_board == list.id_board).count() as u64 + 1,
        name,
        desc: input.desc.unwrap_or_default(),
        pos,
        due,
        id_board: list.id_board.clone(),
        id_list: list.id.clone(),
        id_members: split_ids(input.id_members.as_deref()),
        id_labels: split_ids(input.id_labels.as_deref()),
        ..Card::default()
    };

    let board_name = db.board(&list.id_board).map(|b| b.name.clone()).unwrap_or_default();
    let action = Action {
        id: new_id(),
        id_member_creator: db.me.clone(),
        kind: "createCard".to_string(),
        date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        data: ActionData {
            board: Some(Ref {
                id: list.id_board.clone(),
                name: board_name,
            }),
            list: Some(Ref {
                id: list.id.clone(),
                name: list.name.clone(),
            }),
            card: Some(Ref {
                id: card.id.clone(),
                name: card.name.clone(),
            }),
        },
    };

    debug!(card = %card.id, list = %list.id, "created card");
    db.cards.push(card.clone());
    db.actions.push(action);
    Ok(Json(card))
}

/// `"null"` or absent clears the due date; anything else must be RFC 3339.
fn parse_due(raw: Option<&str>) -> Result<Option<String>, (StatusCode, String)> {
    match raw {
        None | Some("null") | Some("") => Ok(None),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|d| Some(d.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true)))
            .map_err(|_| bad_request("invalid value for due")),
    }
}

fn next_pos(store: &Store, list_id: &str, pos: Option<&str>) -> Result<f64, (StatusCode, String)> {
    let positions = store
        .cards
        .iter()
        .filter(|c| c.id_list == list_id)
        .map(|c| c.pos);
    match pos.unwrap_or("bottom") {
        "top" => Ok(positions.fold(65536.0_f64, f64::min) / 2.0),
        "bottom" => Ok(positions.fold(0.0_f64, f64::max) + 65536.0),
        _ => Err(bad_request("invalid value for pos")),
    }
}

fn split_ids(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_serializes_camel_case() {
        let card = Card {
            id: "c1".to_string(),
            id_list: "l1".to_string(),
            ..Card::default()
        };
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["id"], "c1");
        assert_eq!(json["idList"], "l1");
        assert_eq!(json["due"], serde_json::Value::Null);
        assert_eq!(json["idMembers"], serde_json::json!([]));
    }

    #[test]
    fn action_type_field_is_renamed() {
        let action = Action {
            kind: "createCard".to_string(),
            ..Action::default()
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "createCard");
        assert!(json["data"].get("board").is_none());
    }

    #[test]
    fn generated_ids_are_24_hex_chars() {
        let id = new_id();
        assert_eq!(id.len(), 24);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn due_null_clears_and_offsets_normalise_to_utc() {
        assert_eq!(parse_due(Some("null")).unwrap(), None);
        assert_eq!(parse_due(None).unwrap(), None);
        assert_eq!(
            parse_due(Some("2021-01-02T05:04:05+02:00")).unwrap().as_deref(),
            Some("2021-01-02T03:04:05.000Z")
        );
        assert!(parse_due(Some("tomorrow")).is_err());
    }

    #[test]
    fn top_goes_before_and_bottom_after_existing_cards() {
        let store = Store::seeded();
        let top = next_pos(&store, fixture::LIST_TODO, Some("top")).unwrap();
        let bottom = next_pos(&store, fixture::LIST_TODO, None).unwrap();
        assert!(top < 16384.0);
        assert!(bottom > 16384.0);
        assert!(next_pos(&store, fixture::LIST_TODO, Some("middle")).is_err());
    }

    #[test]
    fn split_ids_ignores_blanks() {
        assert_eq!(split_ids(Some("a, b,,c")), vec!["a", "b", "c"]);
        assert!(split_ids(None).is_empty());
    }

    #[test]
    fn member_lookup_accepts_me_and_username() {
        let store = Store::seeded();
        assert_eq!(store.member("me").unwrap().username, "ada");
        assert_eq!(store.member("grace").unwrap().id, fixture::MEMBER_GRACE);
        assert!(store.member("nobody").is_err());
    }
}
