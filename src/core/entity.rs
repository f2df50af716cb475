//! Entity trait shared by every stored record type

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for all entities in the catalog.
///
/// All entities have:
/// - id: Unique identifier
/// - created_at: Creation timestamp
///
/// plus the resource names used in URLs and error messages.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "authors", "courses")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "author", "course")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;
}

/// Order entities by creation time, then id, so listings are stable.
pub fn sort_by_creation<T: Entity>(items: &mut [T]) {
    items.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct TestEntity {
        id: Uuid,
        created_at: DateTime<Utc>,
    }

    impl Entity for TestEntity {
        fn resource_name() -> &'static str {
            "test_entities"
        }

        fn resource_name_singular() -> &'static str {
            "test_entity"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }
    }

    #[test]
    fn test_entity_metadata() {
        assert_eq!(TestEntity::resource_name(), "test_entities");
        assert_eq!(TestEntity::resource_name_singular(), "test_entity");
    }

    #[test]
    fn test_sort_by_creation_uses_timestamp_then_id() {
        let now = Utc::now();
        let earlier = now - chrono::Duration::seconds(10);
        let low = Uuid::from_u128(1);
        let high = Uuid::from_u128(2);

        let mut items = vec![
            TestEntity { id: high, created_at: now },
            TestEntity { id: low, created_at: now },
            TestEntity { id: high, created_at: earlier },
        ];
        sort_by_creation(&mut items);

        assert_eq!(items[0].created_at, earlier);
        assert_eq!(items[1].id, low);
        assert_eq!(items[2].id, high);
    }
}
