use super::kv::IKVRepo;
use crate::config::LANGUAGE_KEY;
use std::sync::Arc;

#[async_trait::async_trait]
pub trait ILanguageRepo: Send + Sync {
    /// Id of the language the user is learning
    async fn load(&self) -> anyhow::Result<Option<String>>;
    async fn save(&self, language_id: &str) -> anyhow::Result<()>;
}

pub struct KVLanguageRepo {
    kv: Arc<dyn IKVRepo>,
}

impl KVLanguageRepo {
    pub fn new(kv: Arc<dyn IKVRepo>) -> Self {
        Self { kv }
    }
}

#[async_trait::async_trait]
impl ILanguageRepo for KVLanguageRepo {
    async fn load(&self) -> anyhow::Result<Option<String>> {
        let value = match self.kv.get(LANGUAGE_KEY).await? {
            Some(value) => value,
            None => return Ok(None),
        };
        // Stored as a json string, older versions stored the raw id
        let language_id = serde_json::from_str::<String>(&value).unwrap_or(value);
        Ok(Some(language_id))
    }

    async fn save(&self, language_id: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string(language_id)?;
        self.kv.set(LANGUAGE_KEY, &json).await
    }
}
