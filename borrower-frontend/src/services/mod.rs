pub mod deed_api_client;
pub mod metrics;
pub mod service_check;

pub use deed_api_client::{AuthCodeVerification, DeedApiClient};
pub use metrics::{get_metrics, init_metrics};
pub use service_check::{check_services, ReportEntry, ServiceCheck, ServiceCheckReport};
