//! When steps for target discovery BDD scenarios.

use super::world::{DiscoveryWorld, build_target, capability, category, run_async};
use rstest_bdd_macros::when;

#[when(r#"a provider registers "{capability_type}" at "{address}" as "{category}""#)]
fn provider_registers(
    world: &mut DiscoveryWorld,
    capability_type: String,
    address: String,
    category: String,
) -> Result<(), eyre::Report> {
    let target = build_target(&capability_type, &address, &category)?;
    world.register(target)
}

#[when(
    r#"a "{category}" provider for "{capability_type}" at "{address}" registers with "{key}" set to "{value}""#
)]
fn configured_provider_registers(
    world: &mut DiscoveryWorld,
    category: String,
    capability_type: String,
    address: String,
    key: String,
    value: String,
) -> Result<(), eyre::Report> {
    let target =
        build_target(&capability_type, &address, &category)?.with_configuration(key, value);
    world.register(target)
}

#[when(r#"the "{category_name}" target "{capability_type}" deregisters"#)]
fn target_deregisters(
    world: &mut DiscoveryWorld,
    category_name: String,
    capability_type: String,
) -> Result<(), eyre::Report> {
    let wanted_category = category(&category_name)?;
    let wanted_type = capability(&capability_type)?;
    let target = world
        .registered
        .iter()
        .find(|target| {
            target.category() == wanted_category && target.capability_type() == &wanted_type
        })
        .cloned()
        .ok_or_else(|| eyre::eyre!("no registered {category_name} target '{capability_type}'"))?;
    let removed = run_async(world.service.deregister(&target))
        .map_err(|err| eyre::eyre!("deregistration failed: {err}"))?;
    if !removed {
        return Err(eyre::eyre!("expected '{capability_type}' to be removed"));
    }
    Ok(())
}
