use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, TryLockError};

#[cfg(loom)]
use loom::sync::{Mutex, MutexGuard};
#[cfg(not(loom))]
use std::sync::{Mutex, MutexGuard};

use flowsess_dsa::CompositeKey;

use crate::config::{SessionConfig, MAX_CAPACITY};
use crate::template::Template;

/// A template session shared by the decoders of one flow-export source.
///
/// ## Locking
/// The tables are only reachable through the guard returned by [`Session::lock`].
/// A decoder holds one guard across a whole "look up, parse on miss, register"
/// sequence, so two workers can never both learn the same template.
pub trait Session: Send + Sync {
    type Template: Template + ?Sized;
    type Guard<'a>: TemplateStore<Self::Template>
    where
        Self: 'a;

    /// Blocks until the session is exclusively held by the caller.
    fn lock(&self) -> Self::Guard<'_>;

    /// Returns `None` instead of blocking when another thread holds the session.
    fn try_lock(&self) -> Option<Self::Guard<'_>>;
}

/// Operations available while a session is held.
pub trait TemplateStore<T: Template + ?Sized> {
    /// Files `template` under its own key. Returns the template it replaced.
    fn add_template(&mut self, template: Arc<T>) -> Option<Arc<T>>;

    fn get_template(&self, template_id: u16, observation_domain_id: u32) -> Option<Arc<T>>;

    /// Records `size` unless a larger size is already known for the template.
    fn set_record_size(&mut self, template_id: u16, observation_domain_id: u32, size: usize);

    fn get_record_size(&self, template_id: u16, observation_domain_id: u32) -> Option<usize>;
}

struct Tables<T: ?Sized> {
    templates: HashMap<CompositeKey, Arc<T>>,
    sizes: HashMap<CompositeKey, usize>,
}

/// The in-memory session: two keyed tables behind one mutex.
pub struct BasicSession<T: Template + ?Sized = dyn Template> {
    tables: Mutex<Tables<T>>,
}

impl<T: Template + ?Sized> BasicSession<T> {
    /// Creates an empty session sized for a full template id space.
    pub fn new() -> Self {
        Self::with_config(&SessionConfig::default())
    }

    /// Creates an empty session sized from `config`. Hints above
    /// [`MAX_CAPACITY`] are clamped, so an unvalidated config cannot make
    /// construction fail.
    pub fn with_config(config: &SessionConfig) -> Self {
        tracing::debug!(
            "BasicSession: created (template capacity {}, size capacity {})",
            config.template_capacity,
            config.record_size_capacity
        );
        Self {
            tables: Mutex::new(Tables {
                templates: HashMap::with_capacity(config.template_capacity.min(MAX_CAPACITY)),
                sizes: HashMap::with_capacity(config.record_size_capacity.min(MAX_CAPACITY)),
            }),
        }
    }

    /// Blocks until the session is exclusively held by the caller.
    ///
    /// A panic in a previous holder does not make the tables inconsistent
    /// (every mutation is a single map operation), so a poisoned lock is
    /// taken over rather than surfaced.
    pub fn lock(&self) -> SessionGuard<'_, T> {
        let tables = self.tables.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("BasicSession: previous holder panicked. Recovering lock.");
            poisoned.into_inner()
        });
        SessionGuard { tables }
    }

    pub fn try_lock(&self) -> Option<SessionGuard<'_, T>> {
        match self.tables.try_lock() {
            Ok(tables) => Some(SessionGuard { tables }),
            Err(TryLockError::Poisoned(poisoned)) => {
                tracing::warn!("BasicSession: previous holder panicked. Recovering lock.");
                Some(SessionGuard { tables: poisoned.into_inner() })
            }
            Err(TryLockError::WouldBlock) => None,
        }
    }
}

impl<T: Template + ?Sized> Default for BasicSession<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Template + ?Sized> fmt::Debug for BasicSession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicSession").finish_non_exhaustive()
    }
}

impl<T: Template + ?Sized> Session for BasicSession<T> {
    type Template = T;
    type Guard<'a>
        = SessionGuard<'a, T>
    where
        Self: 'a;

    fn lock(&self) -> SessionGuard<'_, T> {
        BasicSession::<T>::lock(self)
    }

    fn try_lock(&self) -> Option<SessionGuard<'_, T>> {
        BasicSession::<T>::try_lock(self)
    }
}

/// Exclusive access to a [`BasicSession`]. The session is released on drop.
pub struct SessionGuard<'a, T: Template + ?Sized> {
    tables: MutexGuard<'a, Tables<T>>,
}

impl<T: Template + ?Sized> SessionGuard<'_, T> {
    /// Releases the session. Equivalent to dropping the guard.
    pub fn unlock(self) {}

    pub fn contains_template(&self, template_id: u16, observation_domain_id: u32) -> bool {
        self.tables
            .templates
            .contains_key(&CompositeKey::new(template_id, observation_domain_id))
    }

    pub fn template_count(&self) -> usize {
        self.tables.templates.len()
    }

    pub fn record_size_count(&self) -> usize {
        self.tables.sizes.len()
    }
}

impl<T: Template + ?Sized> TemplateStore<T> for SessionGuard<'_, T> {
    fn add_template(&mut self, template: Arc<T>) -> Option<Arc<T>> {
        let key = template.key();
        let replaced = self.tables.templates.insert(key, template);
        if replaced.is_some() {
            tracing::debug!("Session: template {} redefined by exporter", key);
        }
        replaced
    }

    fn get_template(&self, template_id: u16, observation_domain_id: u32) -> Option<Arc<T>> {
        self.tables
            .templates
            .get(&CompositeKey::new(template_id, observation_domain_id))
            .cloned()
    }

    fn set_record_size(&mut self, template_id: u16, observation_domain_id: u32, size: usize) {
        let key = CompositeKey::new(template_id, observation_domain_id);
        match self.tables.sizes.entry(key) {
            Entry::Occupied(mut known) => {
                if *known.get() < size {
                    tracing::trace!("Session: record size for {} grew {} -> {}", key, known.get(), size);
                    known.insert(size);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(size);
            }
        }
    }

    fn get_record_size(&self, template_id: u16, observation_domain_id: u32) -> Option<usize> {
        self.tables
            .sizes
            .get(&CompositeKey::new(template_id, observation_domain_id))
            .copied()
    }
}

impl<T: Template + ?Sized> fmt::Debug for SessionGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGuard")
            .field("templates", &self.tables.templates.len())
            .field("record_sizes", &self.tables.sizes.len())
            .finish()
    }
}
