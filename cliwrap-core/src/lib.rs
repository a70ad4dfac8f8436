pub mod error;
pub mod executor;
pub mod identity;
pub mod invoker;

pub use error::{CliError, Result};
pub use executor::{
    ExecOutput, ExecRequest, MockExecutor, MockResponse, ProcessExecutor, Redirection,
    SystemExecutor,
};
pub use identity::CliIdentity;
pub use invoker::{Invocation, ProcessInvoker};
