//! Observability for chat turns.
//!
//! [`TracingChatHooks`] turns lifecycle callbacks into structured `tracing`
//! events; [`HookSet`] fans one callback out to several hooks so a faulty
//! hook cannot take a turn down with it.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use gchat::ChatTurnHooks;
//! use gobserve::{HookSet, TracingChatHooks};
//!
//! let hooks: Arc<dyn ChatTurnHooks> =
//!     Arc::new(HookSet::new().with("tracing", Arc::new(TracingChatHooks)));
//! hooks.on_turn_start(&"session-1".into());
//! ```

mod fanout;
mod tracing_hooks;

pub use fanout::HookSet;
pub use tracing_hooks::TracingChatHooks;
