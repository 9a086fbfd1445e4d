//! Registration, replacement and isolation tests for the in-memory registry.

use crate::in_memory::helpers::{Router, capability, router, target};
use rstest::rstest;
use switchyard::service_registry::{
    domain::{ServiceCategory, TargetId},
    ports::ServiceRegistryError,
    services::TargetRegistryServiceError,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn last_registration_wins_within_a_slot(router: Router) {
    router
        .service
        .register(
            target("search", "10.0.0.1:7000", ServiceCategory::ToolInvoker)
                .with_configuration("region", "eu"),
        )
        .await
        .expect("first registration should succeed");
    router
        .service
        .register(
            target("search", "10.0.0.1:7000", ServiceCategory::ToolInvoker)
                .with_configuration("region", "us"),
        )
        .await
        .expect("second registration should succeed");

    let listed = router
        .service
        .list(ServiceCategory::ToolInvoker)
        .await
        .expect("list should succeed");

    assert_eq!(listed.len(), 1);
    let entry = listed.first().expect("one entry");
    assert_eq!(
        entry.configurations().get("region").map(String::as_str),
        Some("us")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deregistration_leaves_other_categories_alone(router: Router) {
    let tool = router
        .service
        .register(target("s3", "10.0.0.5:9000", ServiceCategory::ToolInvoker))
        .await
        .expect("tool registration should succeed");
    router
        .service
        .register(target("s3", "10.0.0.5:9001", ServiceCategory::ResourceProvider))
        .await
        .expect("resource registration should succeed");

    let removed = router
        .service
        .deregister(&tool)
        .await
        .expect("deregistration should succeed");

    assert!(removed);
    assert!(
        router
            .service
            .list(ServiceCategory::ToolInvoker)
            .await
            .expect("list should succeed")
            .is_empty()
    );
    let remaining = router
        .resolver
        .resolve(&capability("s3"), ServiceCategory::ResourceProvider)
        .await
        .expect("resource target should still resolve");
    assert_eq!(remaining.address().port(), 9001);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deregistering_an_unknown_target_reports_false(router: Router) {
    let removed = router
        .service
        .deregister(&target("s3", "10.0.0.5:9000", ServiceCategory::ToolInvoker))
        .await
        .expect("deregistration should succeed");

    assert!(!removed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_option_touches_every_category(router: Router) {
    for category in ServiceCategory::ALL {
        router
            .service
            .register(target("s3", "10.0.0.5:9000", category))
            .await
            .expect("registration should succeed");
    }

    let updated = router
        .service
        .update_option(&capability("s3"), "bucket", "artifacts")
        .await
        .expect("update should succeed");

    assert_eq!(updated.len(), ServiceCategory::ALL.len());
    assert!(
        updated
            .iter()
            .all(|entry| entry.configurations().get("bucket").map(String::as_str)
                == Some("artifacts"))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_option_without_targets_is_not_found(router: Router) {
    let result = router
        .service
        .update_option(&capability("s3"), "bucket", "artifacts")
        .await;

    assert!(matches!(
        result,
        Err(TargetRegistryServiceError::Registry(
            ServiceRegistryError::NotFound { .. }
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ping_for_an_unknown_id_is_rejected(router: Router) {
    let unknown = TargetId::new("missing").expect("valid id");

    let result = router.service.ping(&unknown).await;

    assert!(matches!(
        result,
        Err(TargetRegistryServiceError::Registry(
            ServiceRegistryError::UnknownTarget(_)
        ))
    ));
}
