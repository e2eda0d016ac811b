//! The shared handle every resource carries so it can fetch its own children.
//!
//! # Design
//! A `Session` is an `Arc` around the caller's `Transport`. Resources never
//! own the transport; they hold a clone of the handle, attached once right
//! after decoding. All navigator operations go through `fetch_one`,
//! `fetch_all` or `submit`, which make exactly one transport call, decode the
//! body, and attach the session to whatever was decoded.
//!
//! `Session::default()` is detached: resources deserialized directly by a
//! caller (rather than by a navigator) get one, and any navigation from them
//! fails with `TransportError::Detached`.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::action::Action;
use crate::board::Board;
use crate::card::Card;
use crate::checklist::Checklist;
use crate::error::{Result, TransportError};
use crate::list::List;
use crate::member::Member;
use crate::transport::{FormParams, Transport};

/// Cheap-to-clone handle to the transport backing a tree of resources.
#[derive(Clone, Default)]
pub struct Session {
    transport: Option<Arc<dyn Transport>>,
}

impl Session {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Some(Arc::new(transport)),
        }
    }

    /// Share an existing transport handle.
    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport: Some(transport),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.transport.is_some()
    }

    /// True when both handles point at the same transport.
    pub fn same(a: &Session, b: &Session) -> bool {
        match (&a.transport, &b.transport) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Boards visible to the authenticated caller.
    pub fn boards(&self) -> Result<Vec<Board>> {
        self.fetch_all("/boards/")
    }

    pub fn board(&self, board_id: &str) -> Result<Board> {
        self.fetch_one(&format!("/boards/{board_id}"))
    }

    pub fn list(&self, list_id: &str) -> Result<List> {
        self.fetch_one(&format!("/lists/{list_id}"))
    }

    pub fn card(&self, card_id: &str) -> Result<Card> {
        self.fetch_one(&format!("/cards/{card_id}"))
    }

    /// A member by id or username; `"me"` is the token's owner.
    pub fn member(&self, member_id: &str) -> Result<Member> {
        self.fetch_one(&format!("/members/{member_id}"))
    }

    fn transport(&self) -> std::result::Result<&dyn Transport, TransportError> {
        self.transport.as_deref().ok_or(TransportError::Detached)
    }

    pub(crate) fn fetch_one<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned + HasSession,
    {
        debug!(path, "fetching resource");
        let body = self.transport()?.get(path)?;
        let mut item: T = serde_json::from_slice(&body)?;
        item.attach(self);
        Ok(item)
    }

    pub(crate) fn fetch_all<T>(&self, path: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + HasSession,
    {
        debug!(path, "fetching collection");
        let body = self.transport()?.get(path)?;
        let mut items: Vec<T> = serde_json::from_slice(&body)?;
        for item in &mut items {
            item.attach(self);
        }
        debug!(path, count = items.len(), "decoded collection");
        Ok(items)
    }

    pub(crate) fn submit<T>(&self, path: &str, form: &FormParams) -> Result<T>
    where
        T: DeserializeOwned + HasSession,
    {
        debug!(path, "submitting form");
        let body = self.transport()?.post(path, form)?;
        let mut item: T = serde_json::from_slice(&body)?;
        item.attach(self);
        Ok(item)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Implemented by every resource decoded from the API.
pub trait HasSession {
    fn session(&self) -> &Session;

    /// Called once by the navigator right after decoding.
    fn attach(&mut self, session: &Session);
}

macro_rules! impl_has_session {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl HasSession for $ty {
                fn session(&self) -> &Session {
                    &self.session
                }

                fn attach(&mut self, session: &Session) {
                    self.session = session.clone();
                }
            }
        )+
    };
}

impl_has_session!(Board, List, Card, Member, Checklist, Action);
