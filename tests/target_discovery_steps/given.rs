//! Given steps for target discovery BDD scenarios.

use super::world::{DiscoveryWorld, build_target};
use rstest_bdd_macros::given;

#[given("an empty capability router")]
fn an_empty_router(world: &mut DiscoveryWorld) {
    world.registered.clear();
}

#[given(r#"a provider registered "{capability_type}" at "{address}" as "{category}""#)]
fn a_registered_provider(
    world: &mut DiscoveryWorld,
    capability_type: String,
    address: String,
    category: String,
) -> Result<(), eyre::Report> {
    let target = build_target(&capability_type, &address, &category)?;
    world.register(target)
}
