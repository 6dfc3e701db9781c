use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::models::BotProfile;
use crate::services::messaging::MessagingProvider;
use crate::services::session::SessionStore;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub profile: BotProfile,
    pub messaging: Box<dyn MessagingProvider>,
    pub sessions: SessionStore,
    /// Operator notifications mirrored for the dev chat endpoint.
    pub dev_notifications: Mutex<Vec<String>>,
}
