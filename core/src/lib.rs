//! Typed client for a board / list / card API.
//!
//! # Overview
//! A `Session` wraps a `Transport` (authenticated GET and form POST). From it
//! a caller fetches boards, and every decoded resource carries the session so
//! it can fetch its own children: `session.boards()?[0].lists()?`. No URLs or
//! JSON are handled by the caller.
//!
//! # Design
//! - Navigation is one transport call per operation; nothing is cached and
//!   fetched resources are independent values.
//! - The only write, `Board::add_card`, validates its options locally and
//!   fails before any request when they are invalid.
//! - `TrelloClient` is a ready-made `Transport` that builds `HttpRequest`
//!   values and interprets `HttpResponse` values, leaving the actual I/O to a
//!   host-supplied `HttpExecutor`.
//! - Errors are passed through unchanged; there are no retries.

pub mod action;
pub mod board;
pub mod card;
pub mod checklist;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod list;
pub mod member;
pub mod options;
pub mod session;
pub mod transport;
pub mod types;

pub use action::{Action, ActionData};
pub use board::{Board, BoardBackground, BoardPrefs, LabelNames};
pub use card::Card;
pub use checklist::{CheckItem, CheckItemState, Checklist};
pub use client::TrelloClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, Result, TransportError, ValidationError};
pub use http::{HttpExecutor, HttpMethod, HttpRequest, HttpResponse};
pub use list::List;
pub use member::Member;
pub use options::AddCardOpts;
pub use session::{HasSession, Session};
pub use transport::{FormParams, Transport};
pub use types::{Badges, Label, MemberRef, ResourceRef};
