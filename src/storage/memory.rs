use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ObjectStore, PutObject, PutReceipt, StorageFault};

/// Keeps objects in process memory. Used with `FORMSINK_STORAGE=memory`
/// for local runs without a bucket.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, PutObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<PutObject> {
        self.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, PutObject>> {
        // A poisoned map is still a valid map.
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn put(&self, object: PutObject) -> Result<PutReceipt, StorageFault> {
        self.lock().insert(object.key.clone(), object);
        Ok(PutReceipt::default())
    }
}
