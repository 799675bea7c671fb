//! Converse application composition root
//!
//! Builds every collaborator from configuration and composes the domain
//! routers into a single application.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tokio::task::JoinHandle;

use converse_accounts::{AccountsConfig, AccountsRepositories, AccountsState};
use converse_auth::{AuthBackend, AuthConfig};
use converse_conversations::{
    ChatConfig, ConversationEngine, ConversationsRepositories, ConversationsState,
};
use converse_email::{EmailConfig, EmailService, EmailServiceFactory, Mailer};
use converse_llm::{LlmConfig, LlmService, LlmServiceFactory};

/// Everything the routers need, already constructed
#[derive(Clone)]
pub struct AppServices {
    pub accounts: AccountsRepositories,
    pub conversations: ConversationsRepositories,
    pub auth_config: AuthConfig,
    pub accounts_config: AccountsConfig,
    pub chat_config: ChatConfig,
    pub email: Arc<dyn EmailService>,
    pub llm: Arc<dyn LlmService>,
}

impl AppServices {
    /// Postgres-backed services configured from the environment
    pub async fn from_env(pool: PgPool) -> Result<Self, anyhow::Error> {
        let email = EmailServiceFactory::create(EmailConfig::from_env()?).await?;
        let llm = LlmServiceFactory::create(LlmConfig::from_env()?)?;

        Ok(Self {
            accounts: AccountsRepositories::postgres(pool.clone()),
            conversations: ConversationsRepositories::postgres(pool),
            auth_config: AuthConfig::from_env()?,
            accounts_config: AccountsConfig::from_env()?,
            chat_config: ChatConfig::from_env()?,
            email,
            llm,
        })
    }

    /// Periodically purge expired reset tokens
    pub fn spawn_reset_token_sweeper(&self) -> JoinHandle<()> {
        converse_accounts::spawn_reset_token_sweeper(
            self.accounts.reset_tokens.clone(),
            self.accounts_config.reset_token_ttl(),
            self.accounts_config.sweep_interval(),
        )
    }
}

/// Create the main application router from ready-made services.
///
/// Must run inside a tokio runtime: the background mailer is spawned here.
pub fn create_app_with(services: AppServices) -> Result<Router, anyhow::Error> {
    let auth = AuthBackend::new(services.accounts.identities(), services.auth_config)?;
    let mailer = Mailer::spawn(services.email);

    let accounts_state = AccountsState {
        repos: services.accounts,
        auth: auth.clone(),
        mailer,
        config: services.accounts_config,
    };

    let conversations_state = ConversationsState {
        engine: ConversationEngine::new(
            services.conversations,
            services.llm,
            services.chat_config,
        ),
        auth,
    };

    // Compose domain routers with shared infrastructure routes
    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(converse_accounts::routes().with_state(accounts_state))
        .merge(converse_conversations::routes().with_state(conversations_state));

    Ok(app)
}

/// Create the main application router against Postgres, configured from the environment
pub async fn create_app(pool: PgPool) -> Result<Router, anyhow::Error> {
    create_app_with(AppServices::from_env(pool).await?)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
