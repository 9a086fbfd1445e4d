//! Resolution tests against the in-memory registry.

use crate::in_memory::helpers::{Router, capability, router, target};
use rstest::rstest;
use switchyard::service_registry::{domain::ServiceCategory, services::ResolveError};

#[rstest]
#[case("s3", "10.0.0.5:9000", ServiceCategory::ResourceProvider)]
#[case("github", "tools.internal:7000", ServiceCategory::ToolInvoker)]
#[case("web.search", "[::1]:9443", ServiceCategory::ToolInvoker)]
#[tokio::test(flavor = "multi_thread")]
async fn registered_target_resolves_to_its_address(
    router: Router,
    #[case] capability_type: &str,
    #[case] address: &str,
    #[case] category: ServiceCategory,
) {
    router
        .service
        .register(target(capability_type, address, category))
        .await
        .expect("registration should succeed");

    let resolved = router
        .resolver
        .resolve(&capability(capability_type), category)
        .await
        .expect("target should resolve");

    assert_eq!(resolved.address().to_string(), address);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolution_is_scoped_to_the_category(router: Router) {
    router
        .service
        .register(target("s3", "10.0.0.5:9000", ServiceCategory::ResourceProvider))
        .await
        .expect("registration should succeed");

    let result = router
        .resolver
        .resolve(&capability("s3"), ServiceCategory::ToolInvoker)
        .await;

    assert!(matches!(
        result,
        Err(ResolveError::NotFound { ref capability_type, category })
            if capability_type.as_str() == "s3" && category == ServiceCategory::ToolInvoker
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reregistration_moves_resolution_to_the_new_address(router: Router) {
    let first = router
        .service
        .register(target("s3", "10.0.0.5:9000", ServiceCategory::ResourceProvider))
        .await
        .expect("first registration should succeed");
    let moved = target("s3", "10.0.0.6:9000", ServiceCategory::ResourceProvider)
        .with_id(first.id().expect("assigned id").clone());
    router
        .service
        .register(moved)
        .await
        .expect("second registration should succeed");

    let resolved = router
        .resolver
        .resolve(&capability("s3"), ServiceCategory::ResourceProvider)
        .await
        .expect("target should resolve");

    assert_eq!(resolved.address().to_string(), "10.0.0.6:9000");
    assert_eq!(resolved.id(), first.id());
}
