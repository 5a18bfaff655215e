//! Document identifier generation.

use ulid::Ulid;

/// Generates primary keys for stored documents.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new lowercase ULID.
    ///
    /// Identifiers sort by creation time, so listing by `id` doubles as
    /// listing in insertion order.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_lowercase_ulid() {
        let id_gen = IdGenerator::new();
        let id = id_gen.generate();

        assert_eq!(id.len(), 26);
        assert_eq!(id, id.to_lowercase());
        assert!(Ulid::from_string(&id).is_ok());
    }

    #[test]
    fn test_generate_unique() {
        let id_gen = IdGenerator::new();
        assert_ne!(id_gen.generate(), id_gen.generate());
    }
}
