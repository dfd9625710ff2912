use flowsess_dsa::CompositeKey;

/// A decoder-owned template definition, as announced by a flow exporter.
///
/// The session only reads the two identifying fields. Both must stay
/// constant for the lifetime of the object, since they decide the key the
/// template is filed under.
pub trait Template: Send + Sync {
    fn template_id(&self) -> u16;

    fn observation_domain_id(&self) -> u32;

    /// Key this template is stored under.
    fn key(&self) -> CompositeKey {
        CompositeKey::new(self.template_id(), self.observation_domain_id())
    }
}
