//! Application state

use std::sync::Arc;

use socketioxide::SocketIo;

use crate::realtime::MessageRouter;
use rb_core::board::BoardStore;

/// Shared application state for the REST routes. The store, the router and
/// the Socket.IO handle are injected at startup; there is no ambient global.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    board: Arc<BoardStore>,
    router: Arc<MessageRouter>,
    io: SocketIo,
}

impl AppState {
    pub fn new(board: Arc<BoardStore>, router: Arc<MessageRouter>, io: SocketIo) -> Self {
        Self {
            inner: Arc::new(AppStateInner { board, router, io }),
        }
    }

    /// The authoritative board store
    pub fn board(&self) -> &BoardStore {
        &self.inner.board
    }

    /// The shared message router
    pub fn router(&self) -> &MessageRouter {
        &self.inner.router
    }

    /// Handle for fanning facade mutations out to connected clients
    pub fn io(&self) -> &SocketIo {
        &self.inner.io
    }
}
