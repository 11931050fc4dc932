use std::path::PathBuf;

use crate::config::Config;
use crate::error::{EfError, Result};
use crate::intent::{provider_from_config, IntentProvider};
use crate::storage::Database;

pub struct AppContext {
    pub root: PathBuf,
    pub config: Config,
    pub db: Database,
    pub provider: Box<dyn IntentProvider>,
    pub robot_mode: bool,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let root = Self::find_root()?;
        let config = Config::load(cli.config.as_deref(), &root)?;
        let db_path = cli
            .db
            .clone()
            .unwrap_or_else(|| root.join("directory.db"));
        let db = Database::open(&db_path)?;
        let provider = provider_from_config(&config.llm);

        Ok(Self {
            root,
            config,
            db,
            provider,
            robot_mode: cli.robot,
        })
    }

    fn find_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("EF_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| EfError::MissingConfig("data directory not found".to_string()))?;
        Ok(data_dir.join("ef"))
    }
}
