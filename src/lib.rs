pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::http::{create_client, TodoClient, DEFAULT_BASE_URL};
pub use config::WorkshopConfig;
pub use core::{FluxExt, MonoExt, Signal, SignalLog, TodoApi};
pub use domain::model::{Address, Company, Geo, Todo, User};
pub use utils::error::{Result, WorkshopError};
