use std::{collections::HashMap, path::Path};

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Variable naming the optional settings file layered under the environment.
pub const CONFIG_FILE_VAR: &str = "RECIPE_BOX_CONFIG";

pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";

    fn load_dotenv() {
        // .env next to the manifest wins over one in the working directory
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();
        let file = std::env::var(CONFIG_FILE_VAR).ok();
        Self::from_sources(file.as_deref(), None)
    }

    /// Builds the config from an optional settings file plus environment
    /// variables. `vars` replaces the process environment when given.
    fn from_sources(file: Option<&str>, vars: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = config_rs::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config_rs::File::with_name(path).required(true));
        }

        let settings = builder
            .add_source(
                config_rs::Environment::with_prefix(Self::PREFIX)
                    .prefix_separator("_")
                    .separator(Self::SEPARATOR)
                    .try_parsing(true)
                    .source(vars),
            )
            .build()
            .context("failed to read configuration sources")?;

        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize configuration")?;

        cfg.validate()?;
        Ok(cfg)
    }
}
