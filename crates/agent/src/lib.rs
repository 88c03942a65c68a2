//! The Ladle agent loop.
//!
//! The agent follows a **Select → Execute → Update** cycle:
//!
//! 1. **Select**: show the model the capability set and the current state,
//!    decode its reply into an action
//! 2. **Execute**: resolve the action by name, validate its parameters,
//!    invoke the capability
//! 3. **Update**: the capability's result replaces the current state
//!
//! The loop continues until a capability produces the termination signal,
//! a step fails, the step budget runs out, or cancellation is requested.

pub mod decode;
pub mod executor;
pub mod loop_runner;
pub mod retry;
pub mod selector;
pub mod state;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use decode::decode_action;
pub use executor::CapabilityExecutor;
pub use loop_runner::AgentLoop;
pub use retry::RetryPolicy;
pub use selector::ActionSelector;
pub use state::StateTracker;
