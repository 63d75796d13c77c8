// Library surface for headless/integration tests and reuse.
// The terminal front end (App, widgets, key handling) lives in main.rs.
pub mod config;
pub mod decode;
pub mod error;
pub mod provider;
pub mod question;
pub mod runtime;
pub mod session;
