use std::sync::Arc;
use tidechat_llm::ChatClient;
use tidechat_store::StoreClient;
use crate::config::Config;
use crate::session::SessionAuthority;

/// Shared application state passed to all handlers
///
/// All resources are wrapped in Arc for efficient sharing across async tasks.
/// The session authority is a trait object so tests can swap the mechanism in
/// without a process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<StoreClient>,
    pub llm_client: Arc<dyn ChatClient>,
    pub sessions: Arc<dyn SessionAuthority>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: StoreClient,
        llm_client: Arc<dyn ChatClient>,
        sessions: Arc<dyn SessionAuthority>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            llm_client,
            sessions,
        }
    }
}
