//! Client-side connection handling: open a channel, issue unary calls over
//! it, and shut it down with a bounded grace period.

mod call_options;
mod channel;
mod configuration;

pub use call_options::CallOptions;
pub use channel::{connect, Channel};
pub use configuration::Configuration;
