use iced::widget::image::Handle;
use std::collections::HashMap;
use std::fmt;

/// Process-local reference to a preview image
///
/// Handles are only meaningful to the registry that issued them and only
/// until they are revoked. They are never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewId {
    generation: u32,
    slot: u32,
}

impl fmt::Display for PreviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preview:{}/{}", self.generation, self.slot)
    }
}

/// Owns every live preview handle.
///
/// Each catalog load starts a new generation. Starting a generation
/// revokes everything the previous one issued, so at most one load's
/// handles are alive at any time.
#[derive(Default)]
pub struct PreviewRegistry {
    generation: u32,
    next_slot: u32,
    /// Each handle owns the only copy of its bytes
    previews: HashMap<PreviewId, Handle>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke every live handle and start issuing handles for a new load.
    /// Returns how many handles were released.
    pub fn begin_generation(&mut self) -> usize {
        let released = self.revoke_all();
        self.generation = self.generation.wrapping_add(1);
        self.next_slot = 0;
        released
    }

    /// Register image bytes and hand out a handle for them
    pub fn create(&mut self, data: Vec<u8>) -> PreviewId {
        let id = PreviewId {
            generation: self.generation,
            slot: self.next_slot,
        };
        self.next_slot += 1;

        // Vec -> Bytes takes over the allocation without copying
        self.previews.insert(id, Handle::from_bytes(data));
        id
    }

    /// The bytes behind a handle, or None once it has been revoked
    pub fn bytes(&self, id: PreviewId) -> Option<&[u8]> {
        match self.previews.get(&id)? {
            Handle::Bytes(_, bytes) => Some(bytes.as_ref()),
            _ => None,
        }
    }

    /// The renderable image behind a handle
    pub fn image(&self, id: PreviewId) -> Option<&Handle> {
        self.previews.get(&id)
    }

    #[cfg(test)]
    pub fn is_live(&self, id: PreviewId) -> bool {
        self.previews.contains_key(&id)
    }

    #[cfg(test)]
    pub fn revoke(&mut self, id: PreviewId) -> bool {
        self.previews.remove(&id).is_some()
    }

    pub fn revoke_all(&mut self) -> usize {
        let released = self.previews.len();
        self.previews.clear();
        released
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.previews.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.previews.is_empty()
    }
}

impl fmt::Debug for PreviewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewRegistry")
            .field("generation", &self.generation)
            .field("live", &self.previews.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_read_back_identical() {
        let mut registry = PreviewRegistry::new();
        let payload: Vec<u8> = (0..=255).cycle().take(4096).collect();

        let id = registry.create(payload.clone());

        assert_eq!(registry.bytes(id), Some(payload.as_slice()));
        assert!(registry.image(id).is_some());
    }

    #[test]
    fn test_bytes_are_stored_once() {
        let mut registry = PreviewRegistry::new();
        let payload: Vec<u8> = (0..=255).cycle().take(64 * 1024).collect();
        let original = payload.as_ptr();

        let id = registry.create(payload);

        // The handle took over the allocation, so what bytes() returns is
        // the same buffer the renderer draws from
        let stored = registry.bytes(id).unwrap();
        assert_eq!(stored.as_ptr(), original);
        assert!(matches!(
            registry.image(id),
            Some(Handle::Bytes(_, shared)) if shared.as_ptr() == original
        ));
    }

    #[test]
    fn test_new_generation_revokes_previous_handles() {
        let mut registry = PreviewRegistry::new();
        registry.begin_generation();
        let first = registry.create(vec![1, 2, 3]);
        let second = registry.create(vec![4, 5, 6]);

        let released = registry.begin_generation();
        let fresh = registry.create(vec![7]);

        assert_eq!(released, 2);
        assert!(!registry.is_live(first));
        assert!(!registry.is_live(second));
        assert!(registry.bytes(first).is_none());
        assert_ne!(first, fresh);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_revoke_single_handle() {
        let mut registry = PreviewRegistry::new();
        let id = registry.create(vec![9; 16]);

        assert!(registry.revoke(id));
        assert!(!registry.revoke(id));
        assert!(registry.is_empty());
    }
}
