//! Liveness tracking and stale eviction tests.

use crate::in_memory::helpers::{Router, capability, router, target};
use chrono::Duration;
use rstest::rstest;
use switchyard::{
    config::{MAX_STALE_AFTER_SECS, RouterSettings},
    runtime::CapabilityRouter,
    service_registry::domain::{HealthReport, ServiceCategory},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_reports_are_recorded_without_affecting_resolution(router: Router) {
    let registered = router
        .service
        .register(target("s3", "10.0.0.5:9000", ServiceCategory::ResourceProvider))
        .await
        .expect("registration should succeed");
    let id = registered.id().expect("assigned id");

    router
        .service
        .update_state(id, HealthReport::unhealthy("bucket unreachable"))
        .await
        .expect("health update should succeed");

    let health = router
        .service
        .health(id)
        .await
        .expect("lookup should succeed")
        .expect("health should be tracked");
    let state = health.last_state().expect("state should be recorded");
    assert!(!state.is_healthy());
    assert_eq!(state.reason(), Some("bucket unreachable"));
    router
        .resolver
        .resolve(&capability("s3"), ServiceCategory::ResourceProvider)
        .await
        .expect("unhealthy target should still resolve");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fresh_targets_are_not_stale(router: Router) {
    router
        .service
        .register(target("s3", "10.0.0.5:9000", ServiceCategory::ResourceProvider))
        .await
        .expect("registration should succeed");

    let stale = router
        .service
        .stale_targets(Duration::hours(1))
        .await
        .expect("stale lookup should succeed");

    assert!(stale.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn eviction_removes_only_silent_targets(router: Router) {
    router
        .service
        .register(target("s3", "10.0.0.5:9000", ServiceCategory::ResourceProvider))
        .await
        .expect("registration should succeed");

    let kept = router
        .service
        .evict_stale(Duration::hours(1))
        .await
        .expect("eviction should succeed");
    assert!(kept.is_empty());

    let evicted = router
        .service
        .evict_stale(Duration::hours(-1))
        .await
        .expect("eviction should succeed");
    assert_eq!(evicted.len(), 1);
    assert!(
        router
            .resolver
            .resolve(&capability("s3"), ServiceCategory::ResourceProvider)
            .await
            .is_err()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn router_rejects_a_stale_threshold_past_the_cap() {
    let settings = RouterSettings {
        stale_after_secs: 20_000_000_000_000,
        ..RouterSettings::default()
    };

    assert!(CapabilityRouter::new(settings).is_err());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn router_evicts_nothing_fresh_at_the_largest_threshold() {
    let router = CapabilityRouter::new(RouterSettings {
        stale_after_secs: MAX_STALE_AFTER_SECS,
        ..RouterSettings::default()
    })
    .expect("router should build");
    router
        .targets()
        .register(target("s3", "10.0.0.5:9000", ServiceCategory::ResourceProvider))
        .await
        .expect("registration should succeed");

    let evicted = router.evict_stale().await.expect("eviction should succeed");

    assert!(evicted.is_empty());
}
