//! # flowsess-core
//!
//! Template sessions for NetFlow v9 / IPFIX style decoders. A session remembers
//! the templates an exporter announced and the largest record size seen per
//! template, keyed by (template id, observation domain id).

pub mod config;
pub mod error;
pub mod session;
pub mod template;

pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use flowsess_dsa::CompositeKey;
pub use session::{BasicSession, Session, SessionGuard, TemplateStore};
pub use template::Template;
