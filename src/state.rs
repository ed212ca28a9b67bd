use crate::auth::repo::UserStore;
use crate::config::{AppConfig, StorageBackend};
use crate::db::PgStore;
use crate::follows::repo::SocialGraph;
use crate::memory::MemoryStore;
use crate::tweets::repo::TweetStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub graph: Arc<dyn SocialGraph>,
    pub tweets: Arc<dyn TweetStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        match config.storage {
            StorageBackend::Postgres => {
                let store = PgStore::connect(&config).await?;
                store.migrate().await?;
                Ok(Self::from_store(Arc::new(store), config))
            }
            StorageBackend::Memory => {
                tracing::warn!("using in-memory storage; data is lost on shutdown");
                Ok(Self::from_store(Arc::new(MemoryStore::default()), config))
            }
        }
    }

    /// Wire one backend into every store slot.
    pub fn from_store<S>(store: Arc<S>, config: AppConfig) -> Self
    where
        S: UserStore + SocialGraph + TweetStore + 'static,
    {
        Self {
            users: store.clone(),
            graph: store.clone(),
            tweets: store,
            config: Arc::new(config),
        }
    }

    #[cfg(test)]
    pub fn fake() -> (Self, Arc<MemoryStore>) {
        Self::fake_with(|_| {})
    }

    #[cfg(test)]
    pub fn fake_with(tweak: impl FnOnce(&mut AppConfig)) -> (Self, Arc<MemoryStore>) {
        let mut config = AppConfig {
            storage: StorageBackend::Memory,
            database_url: None,
            max_connections: 1,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            timeline_include_own: true,
        };
        tweak(&mut config);
        let store = Arc::new(MemoryStore::default());
        (Self::from_store(store.clone(), config), store)
    }
}
