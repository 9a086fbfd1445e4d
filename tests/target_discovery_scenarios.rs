//! Behaviour tests for target registration and resolution.

mod target_discovery_steps;

use rstest_bdd_macros::scenario;
use target_discovery_steps::world::{DiscoveryWorld, world};

#[scenario(
    path = "tests/features/target_discovery.feature",
    name = "Resolve a registered resource provider"
)]
#[tokio::test(flavor = "multi_thread")]
async fn resolve_registered_resource_provider(world: DiscoveryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/target_discovery.feature",
    name = "The last registration for a capability type wins"
)]
#[tokio::test(flavor = "multi_thread")]
async fn last_registration_wins(world: DiscoveryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/target_discovery.feature",
    name = "Deregistration is scoped to one category"
)]
#[tokio::test(flavor = "multi_thread")]
async fn deregistration_scoped_to_category(world: DiscoveryWorld) {
    let _ = world;
}
