pub mod adapter;
pub mod error;
pub mod mock;
pub mod session;
pub mod ssh;

pub use adapter::{ExecutionAdapter, SessionStage};
pub use error::{SessionError, SessionResult};
pub use mock::MockConnector;
pub use session::{DeviceConnector, DeviceSession};
pub use ssh::SshConnector;
