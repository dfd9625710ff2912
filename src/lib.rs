//! # flow-session
//!
//! In-memory template sessions for flow-record decoders.
//!
//! ```
//! use std::sync::Arc;
//! use flow_session::{BasicSession, Template, TemplateStore};
//!
//! struct V9Template { id: u16, domain: u32 }
//!
//! impl Template for V9Template {
//!     fn template_id(&self) -> u16 { self.id }
//!     fn observation_domain_id(&self) -> u32 { self.domain }
//! }
//!
//! let session: BasicSession<V9Template> = BasicSession::new();
//! let mut guard = session.lock();
//! if guard.get_template(256, 1).is_none() {
//!     guard.add_template(Arc::new(V9Template { id: 256, domain: 1 }));
//! }
//! guard.set_record_size(256, 1, 48);
//! assert_eq!(guard.get_record_size(256, 1), Some(48));
//! ```

pub use flowsess_core::{
    config, error, session, template, BasicSession, Result, Session, SessionConfig, SessionError,
    SessionGuard, Template, TemplateStore,
};
pub use flowsess_dsa::CompositeKey;
