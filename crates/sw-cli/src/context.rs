//! Runtime context for CLI commands

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use sw_core::{Config, DatabaseConfig, Dialect, Project};
use sw_db::{DbResult, Processor};
use sw_sql::DialectProfile;

use crate::cli::GlobalArgs;

/// Loaded project plus the resolved target
pub struct RuntimeContext {
    /// The loaded project
    pub project: Project,

    /// Verbose output enabled
    pub verbose: bool,
}

impl RuntimeContext {
    /// Load the project named by the global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let project_path = Path::new(&args.project_dir);
        let target = Config::resolve_target(args.target.as_deref());
        log::debug!("Resolved target: {:?}", target);

        let project = match &args.config {
            Some(config_path) => {
                let config = Config::load(Path::new(config_path))
                    .context("Failed to load configuration file")?;
                Project::load_with_config(project_path, config, target.as_deref())
            }
            None => Project::load_for_target(project_path, target.as_deref()),
        }
        .context("Failed to load project")?;

        let ctx = Self {
            project,
            verbose: args.verbose,
        };
        ctx.verbose(&format!(
            "Loaded project '{}' ({} migrations, dialect {}{})",
            ctx.project.config.name,
            ctx.project.migrations.len(),
            ctx.dialect(),
            ctx.project
                .target
                .as_deref()
                .map(|t| format!(", target {t}"))
                .unwrap_or_default()
        ));
        Ok(ctx)
    }

    pub fn dialect(&self) -> Dialect {
        self.project.dialect()
    }

    pub fn profile(&self) -> Result<&'static DialectProfile> {
        DialectProfile::load(self.dialect())
            .with_context(|| format!("Dialect profile for {} is unusable", self.dialect()))
    }

    /// Database settings for the target, with relative file paths resolved
    /// against the project root
    pub fn database_config(&self) -> Result<DatabaseConfig> {
        let mut database = self
            .project
            .config
            .get_database_config(self.project.target.as_deref())
            .context("Failed to resolve database settings")?;
        if database.path != ":memory:" && Path::new(&database.path).is_relative() {
            database.path = self
                .project
                .root
                .join(&database.path)
                .display()
                .to_string();
        }
        Ok(database)
    }

    /// Open a processor; the error is returned untouched so callers can
    /// fall back to offline rendering
    pub fn try_connect(&self) -> Result<DbResult<Arc<dyn Processor>>> {
        let database = self.database_config()?;
        self.verbose(&format!("Connecting to {} at {}", self.dialect(), database.path));
        Ok(sw_db::connect(self.dialect(), &database))
    }

    pub fn connect(&self) -> Result<Arc<dyn Processor>> {
        self.try_connect()?
            .with_context(|| format!("Failed to connect to {} database", self.dialect()))
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }
}
