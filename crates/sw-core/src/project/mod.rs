//! Project discovery and loading

mod definition;
mod loading;

use crate::config::{Config, Dialect};
use crate::error::{CoreError, CoreResult};
use crate::migration::{MigrationSet, MigrationVersion};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A Stepwise project: configuration plus every discovered migration
#[derive(Debug)]
pub struct Project {
    /// Project root directory
    pub root: PathBuf,

    /// Project configuration
    pub config: Config,

    /// Target the project was loaded for (drives vars, dialect and database)
    pub target: Option<String>,

    /// Discovered migration and maintenance units
    pub migrations: MigrationSet,

    /// Source file of each versioned unit
    pub sources: HashMap<MigrationVersion, PathBuf>,
}

impl Project {
    /// Load a project from a directory with base configuration
    pub fn load(path: &Path) -> CoreResult<Self> {
        Self::load_for_target(path, None)
    }

    /// Load a project, resolving vars and dialect for a named target
    pub fn load_for_target(path: &Path, target: Option<&str>) -> CoreResult<Self> {
        let root = resolve_root(path)?;
        let config = Config::load_from_dir(&root)?;
        Self::assemble(root, config, target)
    }

    /// Load the migrations under `path` using an already loaded configuration
    pub fn load_with_config(path: &Path, config: Config, target: Option<&str>) -> CoreResult<Self> {
        let root = resolve_root(path)?;
        Self::assemble(root, config, target)
    }

    fn assemble(root: PathBuf, config: Config, target: Option<&str>) -> CoreResult<Self> {
        // Fail on unknown targets before touching any migration file
        config.get_dialect(target)?;

        let vars = config.get_merged_vars(target);
        let (migrations, sources) = loading::load_migrations(&root, &config, &vars)?;

        Ok(Self {
            root,
            config,
            target: target.map(String::from),
            migrations,
            sources,
        })
    }

    /// Dialect for the loaded target
    pub fn dialect(&self) -> Dialect {
        self.config
            .get_dialect(self.target.as_deref())
            .unwrap_or(self.config.dialect)
    }

    pub fn source_of(&self, version: MigrationVersion) -> Option<&Path> {
        self.sources.get(&version).map(PathBuf::as_path)
    }
}

fn resolve_root(path: &Path) -> CoreResult<PathBuf> {
    let root = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    if !root.exists() {
        return Err(CoreError::ProjectNotFound {
            path: root.display().to_string(),
        });
    }
    Ok(root)
}

#[cfg(test)]
#[path = "project_test.rs"]
mod tests;
