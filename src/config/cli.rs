use crate::config::toml_config::WorkshopConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "reactor-workshop")]
#[command(about = "Fetch todos and users from a JSONPlaceholder-style API")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Overrides client.base_url")]
    pub base_url: Option<String>,

    #[arg(long, help = "Overrides client.timeout_seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// GET /todos/{id}
    Todo { id: String },
    /// GET /todos
    Todos {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// GET /users
    Users,
}

impl CliConfig {
    /// 命令列參數 > 設定檔 > 預設值
    pub fn resolve(&self) -> Result<WorkshopConfig> {
        let mut resolved = match &self.config {
            Some(path) => WorkshopConfig::from_file(path)?,
            None => WorkshopConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            resolved.client.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            resolved.client.timeout_seconds = Some(timeout);
        }

        resolved.validate()?;
        Ok(resolved)
    }
}
