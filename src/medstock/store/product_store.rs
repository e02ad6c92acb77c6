use super::backend::StorageBackend;
use super::persistence::Persistence;
use crate::error::{Result, StockError};
use crate::model::{Product, ProductDraft, ProductId, ProductPatch};
use std::collections::HashSet;

/// Owner of the product collection.
///
/// This is the only place that mutates products. Every mutation is staged on a copy,
/// saved through [`Persistence`] exactly once, and only then committed in memory, so
/// a failed save leaves the store exactly as it was.
pub struct ProductStore<B: StorageBackend> {
    products: Vec<Product>,
    persistence: Persistence<B>,
}

impl<B: StorageBackend> ProductStore<B> {
    /// Open the store, falling back to an empty inventory when the stored one is corrupt.
    /// The unreadable slot is copied aside first, so the next save cannot lose it.
    pub fn open(backend: B) -> Result<Self> {
        let persistence = Persistence::new(backend);
        let products = match persistence.load() {
            Ok(products) => products,
            Err(StockError::CorruptState(reason)) => {
                tracing::warn!(%reason, "stored inventory is corrupt, starting with an empty one");
                persistence.back_up_raw()?;
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        Ok(Self {
            products,
            persistence,
        })
    }

    /// Open the store, reporting corrupt state to the caller instead of recovering.
    pub fn open_strict(backend: B) -> Result<Self> {
        let persistence = Persistence::new(backend);
        let products = persistence.load()?;
        Ok(Self {
            products,
            persistence,
        })
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn backend(&self) -> &B {
        self.persistence.backend()
    }

    pub fn add(&mut self, draft: ProductDraft) -> Result<Product> {
        draft.validate()?;
        let taken: HashSet<&ProductId> = self.products.iter().map(|p| &p.id).collect();
        let product = draft.into_product(mint_unique(&taken));

        let mut next = self.products.clone();
        next.push(product.clone());
        self.commit(next)?;
        Ok(product)
    }

    pub fn update(&mut self, id: &ProductId, patch: &ProductPatch) -> Result<Product> {
        let idx = self.position(id)?;
        patch.validate()?;

        let mut next = self.products.clone();
        patch.apply_to(&mut next[idx]);
        let updated = next[idx].clone();
        self.commit(next)?;
        Ok(updated)
    }

    /// Shift the quantity by `delta`, never going below zero.
    pub fn adjust_quantity(&mut self, id: &ProductId, delta: i64) -> Result<Product> {
        let idx = self.position(id)?;

        let mut next = self.products.clone();
        let current = i64::from(next[idx].quantity);
        next[idx].quantity = current.saturating_add(delta).clamp(0, i64::from(u32::MAX)) as u32;
        let adjusted = next[idx].clone();
        self.commit(next)?;
        Ok(adjusted)
    }

    /// Install `products` in place of the whole collection.
    ///
    /// Ids are kept as given, except repeated ones: every occurrence after the first
    /// gets a freshly minted id.
    pub fn replace_all(&mut self, products: Vec<Product>) -> Result<()> {
        let incoming: HashSet<ProductId> = products.iter().map(|p| p.id.clone()).collect();
        let mut seen: HashSet<ProductId> = HashSet::with_capacity(products.len());
        let mut next = Vec::with_capacity(products.len());

        for mut product in products {
            if seen.contains(&product.id) {
                let taken: HashSet<&ProductId> = incoming.iter().chain(seen.iter()).collect();
                let fresh = mint_unique(&taken);
                tracing::warn!(duplicate = %product.id, replacement = %fresh, "duplicate product id re-minted");
                product.id = fresh;
            }
            seen.insert(product.id.clone());
            next.push(product);
        }

        self.commit(next)
    }

    pub fn remove(&mut self, id: &ProductId) -> Result<Product> {
        let idx = self.position(id)?;

        let mut next = self.products.clone();
        let removed = next.remove(idx);
        self.commit(next)?;
        Ok(removed)
    }

    fn position(&self, id: &ProductId) -> Result<usize> {
        self.products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| StockError::NotFound(id.clone()))
    }

    fn commit(&mut self, next: Vec<Product>) -> Result<()> {
        self.persistence.save(&next)?;
        self.products = next;
        Ok(())
    }
}

fn mint_unique(taken: &HashSet<&ProductId>) -> ProductId {
    loop {
        let id = ProductId::mint();
        if !taken.contains(&id) {
            return id;
        }
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::Category;
    use crate::store::mem_backend::MemBackend;
    use chrono::NaiveDate;

    pub struct StoreFixture {
        pub store: ProductStore<MemBackend>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: ProductStore::open(MemBackend::new()).unwrap(),
            }
        }

        pub fn with_products(mut self, count: usize) -> Self {
            for i in 0..count {
                let draft = ProductDraft::new(
                    format!("Medication {}", i + 1),
                    Category::Both,
                    "Tablet",
                    10,
                );
                self.store.add(draft).unwrap();
            }
            self
        }

        pub fn with_product(mut self, name: &str, category: Category, quantity: u32) -> Self {
            let draft = ProductDraft::new(name, category, "Tablet", quantity);
            self.store.add(draft).unwrap();
            self
        }

        pub fn with_expiring_product(mut self, name: &str, quantity: u32, expiry: NaiveDate) -> Self {
            let draft = ProductDraft::new(name, Category::Both, "Tablet", quantity).with_expiry(expiry);
            self.store.add(draft).unwrap();
            self
        }
    }
}
