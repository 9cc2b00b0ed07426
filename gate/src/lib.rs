pub mod config;
pub mod credentials;
pub mod error;
pub mod gate;
pub mod transport;
pub mod verdict;

pub use config::GateConfig;
pub use credentials::{Credentials, SharedSecret};
pub use error::GateError;
pub use gate::AuthGate;
pub use transport::SessionTransport;
pub use verdict::{LoginOutcome, StatusClass, Verdict};
