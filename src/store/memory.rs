use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::courier::Courier;
use crate::models::order::Order;
use crate::store::{CourierFields, CourierStore, OrderFields, OrderStore, StoreError};

trait Record: Clone {
    fn id(&self) -> Uuid;
    fn version(&self) -> u64;
    fn bump(&mut self, now: DateTime<Utc>);
}

impl Record for Order {
    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn bump(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = now;
    }
}

impl Record for Courier {
    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn bump(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = now;
    }
}

struct Table<T> {
    rows: DashMap<Uuid, T>,
}

impl<T: Record> Table<T> {
    fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    fn insert(&self, record: T) -> Result<T, StoreError> {
        match self.rows.entry(record.id()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(record.id())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    fn get(&self, id: Uuid) -> Result<T, StoreError> {
        self.rows
            .get(&id)
            .map(|row| row.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    fn list(&self) -> Vec<T> {
        self.rows.iter().map(|entry| entry.value().clone()).collect()
    }

    // The shard lock held by `get_mut` makes check-and-write atomic per row.
    fn update(
        &self,
        id: Uuid,
        expected_version: Option<u64>,
        apply: impl FnOnce(&mut T),
    ) -> Result<T, StoreError> {
        let mut row = self.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if let Some(expected) = expected_version {
            if row.version() != expected {
                return Err(StoreError::VersionConflict {
                    id,
                    expected,
                    actual: row.version(),
                });
            }
        }

        apply(row.value_mut());
        row.bump(Utc::now());
        Ok(row.value().clone())
    }

    fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

/// DashMap-backed store holding both tables. One instance is shared as the
/// order store and the courier store.
pub struct MemoryStore {
    orders: Table<Order>,
    couriers: Table<Courier>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            orders: Table::new(),
            couriers: Table::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: Order) -> Result<Order, StoreError> {
        self.orders.insert(order)
    }

    async fn get_order(&self, id: Uuid) -> Result<Order, StoreError> {
        self.orders.get(id)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self.orders.list())
    }

    async fn update_order(
        &self,
        id: Uuid,
        fields: OrderFields,
        expected_version: Option<u64>,
    ) -> Result<Order, StoreError> {
        self.orders
            .update(id, expected_version, |order| fields.apply(order))
    }

    async fn delete_order(&self, id: Uuid) -> Result<(), StoreError> {
        self.orders.delete(id)
    }
}

#[async_trait]
impl CourierStore for MemoryStore {
    async fn insert_courier(&self, courier: Courier) -> Result<Courier, StoreError> {
        self.couriers.insert(courier)
    }

    async fn get_courier(&self, id: Uuid) -> Result<Courier, StoreError> {
        self.couriers.get(id)
    }

    async fn list_couriers(&self) -> Result<Vec<Courier>, StoreError> {
        Ok(self.couriers.list())
    }

    async fn update_courier(
        &self,
        id: Uuid,
        fields: CourierFields,
        expected_version: Option<u64>,
    ) -> Result<Courier, StoreError> {
        self.couriers
            .update(id, expected_version, |courier| fields.apply(courier))
    }

    async fn delete_courier(&self, id: Uuid) -> Result<(), StoreError> {
        self.couriers.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::MemoryStore;
    use crate::models::courier::Courier;
    use crate::store::{CourierFields, CourierStore, StoreError};

    fn courier(id_seed: u128) -> Courier {
        let now = Utc::now();
        Courier {
            id: Uuid::from_u128(id_seed),
            name: "test-courier".to_string(),
            phone: String::new(),
            email: String::new(),
            available: true,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    #[tokio::test]
    async fn update_bumps_version() {
        let store = MemoryStore::new();
        store.insert_courier(courier(1)).await.unwrap();

        let updated = store
            .update_courier(Uuid::from_u128(1), CourierFields::availability(false), Some(1))
            .await
            .unwrap();

        assert!(!updated.available);
        assert_eq!(updated.version, 2);
    }

    #[tokio::test]
    async fn stale_version_is_rejected_without_writing() {
        let store = MemoryStore::new();
        store.insert_courier(courier(1)).await.unwrap();

        let err = store
            .update_courier(Uuid::from_u128(1), CourierFields::availability(false), Some(4))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::VersionConflict {
                id: Uuid::from_u128(1),
                expected: 4,
                actual: 1,
            }
        );
        assert!(store.get_courier(Uuid::from_u128(1)).await.unwrap().available);
    }

    #[tokio::test]
    async fn duplicate_insert_and_missing_rows_are_errors() {
        let store = MemoryStore::new();
        store.insert_courier(courier(1)).await.unwrap();

        assert_eq!(
            store.insert_courier(courier(1)).await.unwrap_err(),
            StoreError::Duplicate(Uuid::from_u128(1))
        );
        assert_eq!(
            store.get_courier(Uuid::from_u128(2)).await.unwrap_err(),
            StoreError::NotFound(Uuid::from_u128(2))
        );
        assert_eq!(
            store.delete_courier(Uuid::from_u128(2)).await.unwrap_err(),
            StoreError::NotFound(Uuid::from_u128(2))
        );
    }
}
