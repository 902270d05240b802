pub mod logging;
pub mod messaging;
