// ==============================================
// READ-THROUGH UNDER CONCURRENCY (integration)
// ==============================================

use futures::future::join_all;
use rescache_core::{CacheFactory, CacheInterceptor, CacheSettings, ResourceKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn interceptor(algorithm: &str) -> CacheInterceptor<u64, String> {
    let factory = CacheFactory::new(&CacheSettings {
        algorithm: algorithm.to_string(),
        capacity: 8,
    });
    CacheInterceptor::new(factory.create_cache(ResourceKind::USERS))
}

#[tokio::test]
async fn concurrent_misses_leave_one_valid_entry() {
    for algorithm in ["LRU", "LFU"] {
        let interceptor = interceptor(algorithm);
        let loads = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            interceptor.read_through(5, || {
                let loads = loads.clone();
                async move {
                    loads.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Ok::<_, ()>("first".to_string())
                }
            }),
            interceptor.read_through(5, || {
                let loads = loads.clone();
                async move {
                    loads.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Ok::<_, ()>("second".to_string())
                }
            }),
        );

        assert_eq!(a, Ok("first".to_string()));
        assert_eq!(b, Ok("second".to_string()));
        assert_eq!(loads.load(Ordering::SeqCst), 2);

        let cache = interceptor.cache();
        assert_eq!(cache.len(), 1);
        let cached = cache.get(&5).unwrap();
        assert!(cached == "first" || cached == "second");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_tasks_share_one_cache() {
    let interceptor = interceptor("LFU");

    let tasks = (0..64u64).map(|i| {
        let interceptor = interceptor.clone();
        tokio::spawn(async move {
            let key = i % 12;
            interceptor
                .read_through(key, || async move { Ok::<_, ()>(format!("user-{}", key)) })
                .await
        })
    });

    for result in join_all(tasks).await {
        let value = result.unwrap().unwrap();
        assert!(value.starts_with("user-"));
    }

    let stats = interceptor.cache().stats();
    assert!(stats.len <= 8);
    assert_eq!(stats.hits + stats.misses, 64);
}
