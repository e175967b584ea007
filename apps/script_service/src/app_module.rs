use std::sync::Arc;

use mongodb::Database;
use script_llm::{LLMClient, LLMClientConfig, LLMProvider, RetryConfig};

use crate::{
    auth::{
        firebase_identity::FirebaseIdentityProvider, identity_provider::IdentityProvider,
        jwt::JwtConfig,
    },
    config::AppConfig,
    error::{AppError, AppResult},
    script_generator::script_generator_service::ScriptGeneratorService,
    scripts::{
        cloud_script_store::CloudScriptStore, local_script_store::LocalScriptStore,
        script_store::ScriptStore,
    },
};

#[derive(Clone)]
pub struct AppService {
    pub script_generator_service: ScriptGeneratorService,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub local_scripts: Arc<LocalScriptStore>,
}

impl AppService {
    pub fn new(config: &AppConfig) -> Self {
        let provider = LLMProvider::Gemini {
            api_key: config.model.api_key.clone(),
            model: config.model.model.clone(),
            base_url: config.model.base_url.clone(),
        };
        let llm_client = LLMClient::new(
            provider,
            Some(LLMClientConfig {
                timeout: config.model.timeout,
                retry_config: RetryConfig {
                    max_retries: config.model.max_retries,
                    ..RetryConfig::default()
                },
            }),
        );

        Self {
            script_generator_service: ScriptGeneratorService::new(Arc::new(llm_client)),
            identity_provider: Arc::new(FirebaseIdentityProvider::new(
                config.identity.api_key.clone(),
                config.identity.base_url.clone(),
            )),
            local_scripts: Arc::new(LocalScriptStore::new(&config.local_scripts_path)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: AppService,
    pub jwt: JwtConfig,
    pub database: Option<Database>,
}

impl AppState {
    pub fn new(config: &AppConfig, database: Option<Database>) -> Self {
        Self {
            service: AppService::new(config),
            jwt: config.jwt.clone(),
            database,
        }
    }

    /// Anonymous callers share the local file; signed-in callers get their own cloud store.
    pub fn script_store(&self, user_id: Option<&str>) -> AppResult<Arc<dyn ScriptStore>> {
        match user_id {
            None => Ok(self.service.local_scripts.clone()),
            Some(user_id) => {
                let database = self.database.as_ref().ok_or_else(|| {
                    AppError::ServiceUnavailable(
                        "Cloud storage is not configured for this server".to_string(),
                    )
                })?;
                Ok(Arc::new(CloudScriptStore::new(database, user_id)))
            }
        }
    }
}
