pub mod config;
pub mod error;
pub mod util;
pub mod val;

// Arena-backed stack VM
pub mod vm;

pub use config::VmConfig;
pub use error::{VmError, VmResult};
