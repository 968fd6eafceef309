pub mod flux;
pub mod lifecycle;
pub mod mono;

pub use crate::core::flux::FluxExt;
pub use crate::core::lifecycle::{Signal, SignalLog};
pub use crate::core::mono::MonoExt;
pub use crate::domain::model::{Address, Company, Geo, Todo, User};
pub use crate::domain::ports::{ConfigProvider, TodoApi};
pub use crate::utils::error::Result;
