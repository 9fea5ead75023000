//! A small in-memory TTL + LRU cache, shared by the LLM gateway, the
//! holistic synthesizer and the sales indicator generator — each keeps its
//! own instance, keyed and sized per §4.C1/C6/C7.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

struct Inner<K, V> {
    map: HashMap<K, Entry<V>>,
    /// Most-recently-used key at the back; eviction pops the front.
    order: VecDeque<K>,
}

pub struct TtlLruCache<K, V> {
    inner: Mutex<Inner<K, V>>,
    ttl: Duration,
    max_size: usize,
}

impl<K, V> TtlLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration, max_size: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
            ttl,
            max_size,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        let expired = match inner.map.get(key) {
            Some(entry) => entry.inserted_at.elapsed() > self.ttl,
            None => return None,
        };
        if expired {
            inner.map.remove(key);
            inner.order.retain(|k| k != key);
            return None;
        }
        let value = inner.map.get(key).map(|e| e.value.clone());
        if value.is_some() {
            inner.order.retain(|k| k != key);
            inner.order.push_back(key.clone());
        }
        value
    }

    pub fn put(&self, key: K, value: V) {
        let mut inner = self.inner.lock();
        if inner.map.contains_key(&key) {
            inner.order.retain(|k| k != &key);
        } else if inner.map.len() >= self.max_size {
            if let Some(oldest) = inner.order.pop_front() {
                inner.map.remove(&oldest);
            }
        }
        inner.order.push_back(key.clone());
        inner.map.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips() {
        let cache: TtlLruCache<String, String> = TtlLruCache::new(Duration::from_secs(60), 8);
        cache.put("a".to_string(), "1".to_string());
        assert_eq!(cache.get(&"a".to_string()), Some("1".to_string()));
    }

    #[test]
    fn expired_entries_are_not_returned() {
        let cache: TtlLruCache<String, String> = TtlLruCache::new(Duration::from_millis(1), 8);
        cache.put("a".to_string(), "1".to_string());
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get(&"a".to_string()), None);
    }

    #[test]
    fn eviction_drops_the_least_recently_used_entry() {
        let cache: TtlLruCache<i32, i32> = TtlLruCache::new(Duration::from_secs(60), 2);
        cache.put(1, 1);
        cache.put(2, 2);
        // touch 1 so 2 becomes least-recently-used
        assert_eq!(cache.get(&1), Some(1));
        cache.put(3, 3);
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some(1));
        assert_eq!(cache.get(&3), Some(3));
    }
}
