//! Steps exercising the end-to-end loader.

use anyhow::{Result, anyhow, ensure};
use rstest_bdd_macros::{given, then, when};
use strata_config::{ConfigLoader, ResourceLocation};
use test_helpers::fs::ConfigDir;

use super::values::{json_literal, name_list, unquote};
use crate::fixtures::LoaderContext;

#[given("a configuration file {name} containing {contents}")]
fn write_file(loader_context: &LoaderContext, name: String, contents: String) -> Result<()> {
    let dir = match loader_context.dir.take() {
        Some(dir) => dir,
        None => ConfigDir::new()?,
    };
    dir.write(&unquote(&name), contents.trim())?;
    loader_context.dir.set(dir);
    Ok(())
}

#[given("the active profile is {profile}")]
fn set_profile(loader_context: &LoaderContext, profile: String) -> Result<()> {
    loader_context.profile.set(unquote(&profile));
    Ok(())
}

#[given("the resource names {names}")]
fn set_resource_names(loader_context: &LoaderContext, names: String) -> Result<()> {
    loader_context.resource_names.set(name_list(&names));
    Ok(())
}

#[when("the configuration is loaded")]
fn load_configuration(loader_context: &LoaderContext) -> Result<()> {
    let base = loader_context
        .dir
        .with_ref(|dir| dir.path().to_path_buf())
        .ok_or_else(|| anyhow!("no configuration files were written"))?;
    let location = ResourceLocation::builder()
        .base_dir(base)
        .profile(loader_context.profile.take().unwrap_or_else(|| "default".to_owned()))
        .resource_names(loader_context.resource_names.take().unwrap_or_default())
        .build();
    loader_context
        .outcome
        .set(ConfigLoader::new(location).load());
    Ok(())
}

#[then("the value at {path} is {expected}")]
fn assert_value(loader_context: &LoaderContext, path: String, expected: String) -> Result<()> {
    let want = json_literal(&expected)?;
    let path = unquote(&path);
    let actual = loader_context
        .outcome
        .with_ref(|outcome| {
            outcome
                .as_ref()
                .map(|tree| tree.get_value(&path).cloned())
                .map_err(|err| anyhow!(err.to_string()))
        })
        .ok_or_else(|| anyhow!("configuration was not loaded"))??;
    ensure!(
        actual.as_ref() == Some(&want),
        "value at {path} is {actual:?}; expected {want}"
    );
    Ok(())
}
