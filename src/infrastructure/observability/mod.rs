mod init_tracing;
mod request_id;
mod status_change_log;
mod tracing_config;

pub use init_tracing::init_tracing;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use status_change_log::LogStatusChanges;
pub use tracing_config::TracingConfig;
