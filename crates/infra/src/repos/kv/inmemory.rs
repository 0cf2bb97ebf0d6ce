use super::IKVRepo;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

pub struct InMemoryKVRepo {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl InMemoryKVRepo {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Makes every following write fail, used for testing how storage failures are handled
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow::Error::msg("Storage is not writable"));
        }
        Ok(())
    }
}

impl Default for InMemoryKVRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IKVRepo for InMemoryKVRepo {
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.check_writable()?;
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let values = self.values.lock().unwrap();
        Ok(values.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.check_writable()?;
        let mut values = self.values.lock().unwrap();
        values.remove(key);
        Ok(())
    }
}
