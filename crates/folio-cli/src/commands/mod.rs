//! Command implementations.

pub mod config;
pub mod list;
pub mod run;

pub use self::config::execute_config;
pub use self::list::execute_list;
pub use self::run::execute_run;
