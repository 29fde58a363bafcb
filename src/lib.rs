pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod report;
pub mod scheduler;
pub mod sim;

pub use config::{Args, SimConfig};
pub use crate::core::{MlfqEvent, SchedCore};
pub use error::{ConfigError, SimError};
pub use scheduler::{LevelPolicy, LevelTable, MlfqOptions};
pub use sim::{JobSpec, Sim};
