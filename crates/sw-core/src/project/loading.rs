//! Migration file discovery and loading

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::migration::{MigrationSet, MigrationVersion};
use minijinja::{Environment, UndefinedBehavior};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::definition::{LoadedFile, MigrationFile, ScriptContext};

/// Recursively collect `.yml`/`.yaml` files under `dir`.
pub(super) fn discover_migration_files(dir: &Path, files: &mut Vec<PathBuf>) -> CoreResult<()> {
    for entry in std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })? {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            discover_migration_files(&path, files)?;
            continue;
        }
        if path.extension().is_some_and(|e| e == "yml" || e == "yaml") {
            files.push(path);
        }
    }
    Ok(())
}

/// Template environment for `sql_file` scripts. Undefined variables are errors.
fn script_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}

/// Parse one migration file into a unit.
pub(crate) fn load_migration_file(
    path: &Path,
    env: &Environment<'static>,
    vars: &HashMap<String, serde_yaml::Value>,
) -> CoreResult<LoadedFile> {
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    let file: MigrationFile = serde_yaml::with::singleton_map_recursive::deserialize(
        serde_yaml::Deserializer::from_str(&content),
    )?;
    let scripts = ScriptContext {
        dir: path.parent().unwrap_or_else(|| Path::new(".")),
        env,
        vars,
    };
    file.into_loaded(&scripts)
}

/// Discover and load every migration under the configured paths.
///
/// Returns the registry together with the file each versioned unit came from.
/// Duplicate versions are kept; planning reports them.
pub(super) fn load_migrations(
    root: &Path,
    config: &Config,
    vars: &HashMap<String, serde_yaml::Value>,
) -> CoreResult<(MigrationSet, HashMap<MigrationVersion, PathBuf>)> {
    let mut files = Vec::new();
    for migration_path in config.migration_paths_absolute(root) {
        if !migration_path.exists() {
            log::debug!(
                "Migration path {} does not exist, skipping",
                migration_path.display()
            );
            continue;
        }
        discover_migration_files(&migration_path, &mut files)?;
    }
    files.sort();

    let env = script_environment();
    let mut set = MigrationSet::new();
    let mut sources = HashMap::new();

    for file in files {
        let loaded =
            load_migration_file(&file, &env, vars).map_err(|e| CoreError::MigrationFile {
                path: file.display().to_string(),
                source: Box::new(e),
            })?;
        match loaded {
            LoadedFile::Unit(unit) => {
                log::debug!("Loaded migration {} from {}", unit.label(), file.display());
                sources.entry(unit.version()).or_insert_with(|| file.clone());
                set.push(unit);
            }
            LoadedFile::Maintenance(unit) => {
                log::debug!("Loaded {} from {}", unit.label(), file.display());
                set.push_maintenance(unit);
            }
        }
    }

    Ok((set, sources))
}
