use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Run-scoped memo of provider answers, shared between provider handles.
#[derive(Clone)]
pub struct Cache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<HashMap<K, V>>>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let cache = self.inner.lock().await;
        let value = cache.get(key).cloned();
        if value.is_some() {
            debug!("Cache HIT for {:?}", key);
        } else {
            debug!("Cache MISS for {:?}", key);
        }
        value
    }

    pub async fn put(&self, key: K, value: V) {
        let mut cache = self.inner.lock().await;
        debug!("Cache PUT for {:?}", key);
        cache.insert(key, value);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_get_put() {
        let cache = Cache::<String, f64>::new();
        assert!(cache.is_empty().await);

        cache.put("VTI".to_string(), 281.4).await;
        assert_eq!(cache.get(&"VTI".to_string()).await, Some(281.4));
        assert!(cache.get(&"BND".to_string()).await.is_none());

        // Overwrite keeps a single entry
        cache.put("VTI".to_string(), 282.0).await;
        assert_eq!(cache.get(&"VTI".to_string()).await, Some(282.0));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = Cache::<String, f64>::new();
        let handle = cache.clone();
        handle.put("BTC-USD".to_string(), 64000.0).await;
        assert_eq!(cache.get(&"BTC-USD".to_string()).await, Some(64000.0));
    }
}
