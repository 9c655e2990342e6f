use std::sync::Arc;

use bugboard_db::Store;
use bugboard_events::{EventLog, LiveBroker, NotificationDispatcher};

use crate::auth::authenticator::TokenAuthenticator;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc` or wraps one.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend (Postgres or in-memory).
    pub store: Arc<dyn Store>,
    pub config: Arc<ServerConfig>,
    /// Validates and rotates session cookies.
    pub authenticator: Arc<TokenAuthenticator>,
    /// Live feed broker behind the WebSocket subscriptions.
    pub broker: Arc<LiveBroker>,
    pub event_log: EventLog,
    pub dispatcher: NotificationDispatcher,
}

impl AppState {
    /// Wire the services around `store`.
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        let broker = Arc::new(LiveBroker::default());
        let authenticator = Arc::new(TokenAuthenticator::new(
            Arc::clone(&store),
            config.jwt.clone(),
        ));

        Self {
            event_log: EventLog::new(Arc::clone(&store)),
            dispatcher: NotificationDispatcher::new(Arc::clone(&store), Arc::clone(&broker)),
            store,
            config: Arc::new(config),
            authenticator,
            broker,
        }
    }
}
