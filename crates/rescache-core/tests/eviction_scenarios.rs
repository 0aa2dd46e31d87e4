// ==============================================
// EVICTION SCENARIOS (integration)
// ==============================================
//
// End-to-end behaviour of both policies through the public contract and
// through factory-built shared caches.

use rescache_core::{
    Algorithm, CacheFactory, CacheSettings, EvictionPolicyCache, LfuCache, LruCache, ResourceKind,
    SharedCache,
};

fn factory(algorithm: &str, capacity: i64) -> CacheFactory {
    CacheFactory::new(&CacheSettings {
        algorithm: algorithm.to_string(),
        capacity,
    })
}

#[test]
fn lfu_evicts_never_reaccessed_key() {
    let mut cache = LfuCache::new(3);
    cache.put(1, "A");
    cache.put(2, "B");
    cache.put(3, "C");
    cache.get(&1);
    cache.get(&2);
    cache.put(4, "D");

    assert_eq!(cache.get(&3), None);
    assert_eq!(cache.get(&4), Some("D"));
    assert_eq!(cache.get(&1), Some("A"));
    assert_eq!(cache.get(&2), Some("B"));
}

#[test]
fn lru_evicts_first_inserted_key() {
    let mut cache = LruCache::new(3);
    cache.put(1, "A");
    cache.put(2, "B");
    cache.put(3, "C");
    cache.put(4, "D");

    assert_eq!(cache.get(&1), None);
    assert_eq!(cache.get(&4), Some("D"));
}

#[test]
fn lru_get_redirects_eviction() {
    let mut cache = LruCache::new(3);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.put("c", 3);
    cache.get(&"a");
    cache.put("d", 4);

    assert!(cache.contains(&"a"));
    assert!(!cache.contains(&"b"));
}

#[test]
fn lfu_frequency_law() {
    let mut cache = LfuCache::new(3);
    cache.put('a', ());
    cache.put('b', ());
    cache.put('c', ());
    cache.get(&'a');
    cache.get(&'b');
    assert_eq!(cache.frequency(&'a'), Some(2));
    assert_eq!(cache.frequency(&'b'), Some(2));

    cache.put('d', ());
    assert!(!cache.contains(&'c'));
}

#[test]
fn contract_is_uniform_across_policies() {
    let policies: Vec<Box<dyn EvictionPolicyCache<u32, String>>> =
        vec![Box::new(LruCache::new(2)), Box::new(LfuCache::new(2))];

    for mut cache in policies {
        assert_eq!(cache.put(1, "one".to_string()), None);
        assert_eq!(cache.put(1, "uno".to_string()), Some("one".to_string()));
        assert_eq!(cache.get(&1), Some("uno".to_string()));
        assert_eq!(cache.get(&2), None);

        cache.put(2, "two".to_string());
        cache.put(3, "three".to_string());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.evictions(), 1);

        assert_eq!(cache.remove_by_key(&42), None);
        assert_eq!(cache.len(), 2);
    }
}

#[test]
fn factory_scenarios_match_direct_policies() {
    let lfu: SharedCache<u32, &str> = factory("lfu", 3).create_cache(ResourceKind::USERS);
    lfu.put(1, "A");
    lfu.put(2, "B");
    lfu.put(3, "C");
    lfu.get(&1);
    lfu.get(&2);
    lfu.put(4, "D");
    assert_eq!(lfu.get(&3), None);
    assert_eq!(lfu.stats().evictions, 1);

    let lru: SharedCache<u32, &str> = factory("LRU", 3).create_cache(ResourceKind::PRODUCTS);
    assert_eq!(lru.algorithm(), Algorithm::Lru);
    lru.put(1, "A");
    lru.put(2, "B");
    lru.put(3, "C");
    lru.put(4, "D");
    assert_eq!(lru.get(&1), None);
    assert_eq!(lru.get(&4), Some("D"));
}

#[test]
fn negative_capacity_is_pass_through() {
    for algorithm in ["LRU", "LFU"] {
        let cache: SharedCache<u32, u32> = factory(algorithm, -1).create_cache(ResourceKind::USERS);
        for i in 0..10 {
            assert_eq!(cache.put(i, i), None);
        }
        assert!(cache.is_empty());
        assert_eq!(cache.get(&0), None);
    }
}
