pub mod config;
pub mod error;
pub mod metric;
pub mod record;
pub mod settings;

pub use config::Config;
pub use error::*;
pub use metric::*;
pub use record::*;
pub use settings::*;
