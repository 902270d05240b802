pub mod config_store;
pub mod dispatcher;
pub mod errors;
pub mod host_config;
pub mod page_name;
pub mod paths;
pub mod types;
pub mod workspace;

pub use config_store::ConfigStore;
pub use dispatcher::Dispatcher;
pub use errors::HostError;
pub use host_config::HostConfig;
pub use workspace::Workspace;
