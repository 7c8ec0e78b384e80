use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use mongodb::{
    Client, Collection,
    bson::{Document, doc},
    options::ReturnDocument,
};
use tokio::sync::Mutex;

use crate::{
    error::StoreError,
    models::{NewProduct, Product, ProductChanges, ProductDocument, ProductId},
};

/// Upper bound on `GET /products`.
pub const LIST_LIMIT: i64 = 100;

/// ProductRepository
///
/// Contract for every persistence operation on products. Each method maps to exactly
/// one document-store call; there are no transactions and no cross-document coordination.
///
/// Identifiers arrive as `ProductId`, so malformed ids never reach an implementation.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts a validated product under a freshly generated id and returns it.
    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// Returns up to `limit` products in the store's natural order.
    async fn list_products(&self, limit: i64) -> Result<Vec<Product>, StoreError>;

    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// Applies `changes` atomically and returns the updated product, or `None` if no
    /// product has this id.
    async fn update_product(
        &self,
        id: &ProductId,
        changes: ProductChanges,
    ) -> Result<Option<Product>, StoreError>;

    /// Hard delete. `true` if a product was removed.
    async fn delete_product(&self, id: &ProductId) -> Result<bool, StoreError>;
}

/// RepositoryState
///
/// Shared handle to the persistence layer held by `AppState`.
pub type RepositoryState = Arc<dyn ProductRepository>;

// --- MongoDB ---

/// MongoProductRepository
///
/// `ProductRepository` backed by the `products` collection. The driver's `Collection`
/// is a cheap handle onto the client's internal connection pool and is safe to share
/// between concurrent requests.
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub const COLLECTION: &'static str = "products";

    pub fn new(client: &Client, database_name: &str) -> Self {
        Self {
            collection: client.database(database_name).collection(Self::COLLECTION),
        }
    }

    /// connect
    ///
    /// Builds the client from a connection string and pings the server, so a bad
    /// `MONGO_URL` is reported at startup instead of on the first request.
    pub async fn connect(mongo_url: &str, database_name: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(mongo_url).await?;
        client
            .database(database_name)
            .run_command(doc! { "ping": 1 })
            .await?;

        tracing::debug!(database = database_name, "connected to MongoDB");

        Ok(Self::new(&client, database_name))
    }

    fn by_id(id: &ProductId) -> Document {
        doc! { "_id": id.object_id() }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        let document = product.into_document(ProductId::generate());
        self.collection.insert_one(&document).await?;
        Ok(document.into())
    }

    async fn list_products(&self, limit: i64) -> Result<Vec<Product>, StoreError> {
        let mut cursor = self.collection.find(doc! {}).limit(limit).await?;

        let mut products = Vec::new();
        while cursor.advance().await? {
            products.push(Product::from(cursor.deserialize_current()?));
        }
        Ok(products)
    }

    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let document = self.collection.find_one(Self::by_id(id)).await?;
        Ok(document.map(Product::from))
    }

    async fn update_product(
        &self,
        id: &ProductId,
        changes: ProductChanges,
    ) -> Result<Option<Product>, StoreError> {
        let document = self
            .collection
            .find_one_and_update(
                Self::by_id(id),
                doc! { "$set": changes.to_set_document() },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(document.map(Product::from))
    }

    async fn delete_product(&self, id: &ProductId) -> Result<bool, StoreError> {
        let result = self.collection.delete_one(Self::by_id(id)).await?;
        Ok(result.deleted_count > 0)
    }
}

// --- In-memory ---

/// MemoryProductRepository
///
/// Process-local `ProductRepository` used by the test suites. Documents are kept in id
/// order, which tracks creation order since ObjectIds lead with their timestamp.
///
/// A failing instance (`new_failing`) rejects every call with `StoreError::Unavailable`.
#[derive(Default)]
pub struct MemoryProductRepository {
    documents: Mutex<BTreeMap<ProductId, ProductDocument>>,
    should_fail: bool,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Number of stored products.
    pub async fn len(&self) -> usize {
        self.documents.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.should_fail {
            return Err(StoreError::Unavailable(
                "in-memory store configured to fail".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        self.check_available()?;
        let id = ProductId::generate();
        let document = product.into_document(id);
        self.documents.lock().await.insert(id, document.clone());
        Ok(document.into())
    }

    async fn list_products(&self, limit: i64) -> Result<Vec<Product>, StoreError> {
        self.check_available()?;
        let take = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(self
            .documents
            .lock()
            .await
            .values()
            .take(take)
            .cloned()
            .map(Product::from)
            .collect())
    }

    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        self.check_available()?;
        Ok(self
            .documents
            .lock()
            .await
            .get(id)
            .cloned()
            .map(Product::from))
    }

    async fn update_product(
        &self,
        id: &ProductId,
        changes: ProductChanges,
    ) -> Result<Option<Product>, StoreError> {
        self.check_available()?;
        let mut documents = self.documents.lock().await;
        Ok(documents.get_mut(id).map(|document| {
            changes.apply_to(document);
            Product::from(document.clone())
        }))
    }

    async fn delete_product(&self, id: &ProductId) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self.documents.lock().await.remove(id).is_some())
    }
}
