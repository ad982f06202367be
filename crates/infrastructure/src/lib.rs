//! dnstap collector infrastructure: wire formats and network listeners
pub mod collector;
pub mod dnstap;
pub mod framestream;
