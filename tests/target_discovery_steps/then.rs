//! Then steps for target discovery BDD scenarios.

use super::world::{DiscoveryWorld, capability, category, run_async};
use rstest_bdd_macros::then;
use switchyard::service_registry::services::ResolveError;

#[then(r#"resolving "{capability_type}" as "{category_name}" returns "{address}""#)]
fn resolving_returns(
    world: &mut DiscoveryWorld,
    capability_type: String,
    category_name: String,
    address: String,
) -> Result<(), eyre::Report> {
    let resolved = run_async(
        world
            .resolver
            .resolve(&capability(&capability_type)?, category(&category_name)?),
    )
    .map_err(|err| eyre::eyre!("resolution failed: {err}"))?;
    let actual = resolved.address().to_string();
    if actual != address {
        return Err(eyre::eyre!("expected {address}, resolved {actual}"));
    }
    Ok(())
}

#[then(r#"resolving "{capability_type}" as "{category_name}" is not found"#)]
fn resolving_is_not_found(
    world: &mut DiscoveryWorld,
    capability_type: String,
    category_name: String,
) -> Result<(), eyre::Report> {
    let result = run_async(
        world
            .resolver
            .resolve(&capability(&capability_type)?, category(&category_name)?),
    );
    if !matches!(result, Err(ResolveError::NotFound { .. })) {
        return Err(eyre::eyre!("expected not found, got {result:?}"));
    }
    Ok(())
}

#[then(r#"listing "{category_name}" targets returns {count:usize} entries"#)]
fn listing_returns_count(
    world: &mut DiscoveryWorld,
    category_name: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let listed = run_async(world.service.list(category(&category_name)?))
        .map_err(|err| eyre::eyre!("list failed: {err}"))?;
    if listed.len() != count {
        return Err(eyre::eyre!(
            "expected {count} targets, found {}",
            listed.len()
        ));
    }
    Ok(())
}

#[then(r#"the "{capability_type}" entry under "{category_name}" has "{key}" set to "{value}""#)]
fn entry_has_configuration(
    world: &mut DiscoveryWorld,
    capability_type: String,
    category_name: String,
    key: String,
    value: String,
) -> Result<(), eyre::Report> {
    let found = run_async(
        world
            .service
            .find(&capability(&capability_type)?, category(&category_name)?),
    )
    .map_err(|err| eyre::eyre!("lookup failed: {err}"))?
    .ok_or_else(|| eyre::eyre!("no '{capability_type}' entry under {category_name}"))?;
    let actual = found.configurations().get(&key);
    if actual != Some(&value) {
        return Err(eyre::eyre!("expected {key}={value}, found {actual:?}"));
    }
    Ok(())
}
