//! Role-based authorization
//!
//! Every entry point asks the same question before touching a service:
//! may this role perform this action? The answer comes from a single policy
//! function, [`authorize`], rather than from checks scattered per handler.

mod policy;

pub use policy::{authorize, is_allowed, Action, Role};
