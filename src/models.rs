use std::{fmt, str::FromStr};

use mongodb::bson::{Document, oid::ObjectId};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::{Map, Value};

use crate::error::ApiError;

// --- Identifier ---

/// ProductId
///
/// Opaque product identifier. Wraps the store's native ObjectId so handlers only ever
/// deal with `parse` / `is_valid` / `Display`, never with the BSON encoding itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(ObjectId);

impl ProductId {
    /// Fresh identifier for a document about to be inserted.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Whether `raw` is a syntactically valid identifier (24 hex characters).
    pub fn is_valid(raw: &str) -> bool {
        ObjectId::parse_str(raw).is_ok()
    }

    pub(crate) fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl FromStr for ProductId {
    type Err = ApiError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| ApiError::MalformedIdentifier)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

// --- Stored and API representations ---

/// ProductDocument
///
/// Raw document as stored in the `products` collection. `_id` keeps its native ObjectId type.
/// Internal to the persistence layer; converted into `Product` before leaving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub nome: String,
    pub descricao: String,
    pub preco: f64,
    pub estoque: i64,
}

/// Product
///
/// API representation of a product. The identifier is rendered as a hex string under `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub nome: String,
    pub descricao: String,
    pub preco: f64,
    pub estoque: i64,
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            nome: doc.nome,
            descricao: doc.descricao,
            preco: doc.preco,
            estoque: doc.estoque,
        }
    }
}

// --- Request payloads ---

/// CreateProductRequest
///
/// Body of `POST /products`. Every field is required; a missing field or a `null`
/// is rejected during deserialization. Only a JSON object is accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(remote = "Self")]
pub struct CreateProductRequest {
    pub nome: String,
    pub descricao: String,
    pub preco: f64,
    pub estoque: i64,
}

/// UpdateProductRequest
///
/// Body of `PUT /products/{id}`. An omitted field and an explicit `null` both
/// deserialize to `None` and mean "leave unchanged". Only a JSON object is accepted.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(remote = "Self")]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub nome: Option<String>,

    #[serde(default)]
    pub descricao: Option<String>,

    #[serde(default)]
    pub preco: Option<f64>,

    #[serde(default)]
    pub estoque: Option<i64>,
}

// The derived struct visitors also accept sequences and would bind an array body
// positionally. Both payloads go through a JSON object first.

impl<'de> Deserialize<'de> for CreateProductRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Self::deserialize(Value::Object(object)).map_err(D::Error::custom)
    }
}

impl<'de> Deserialize<'de> for UpdateProductRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Self::deserialize(Value::Object(object)).map_err(D::Error::custom)
    }
}

/// NewProduct
///
/// A create payload that passed validation. Only produced by `CreateProductRequest::validate`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub(crate) nome: String,
    pub(crate) descricao: String,
    pub(crate) preco: f64,
    pub(crate) estoque: i64,
}

impl NewProduct {
    pub fn into_document(self, id: ProductId) -> ProductDocument {
        ProductDocument {
            id: id.object_id(),
            nome: self.nome,
            descricao: self.descricao,
            preco: self.preco,
            estoque: self.estoque,
        }
    }
}

/// ProductChanges
///
/// A validated, non-empty set of field assignments. Only produced by
/// `UpdateProductRequest::into_changes`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductChanges {
    pub(crate) nome: Option<String>,
    pub(crate) descricao: Option<String>,
    pub(crate) preco: Option<f64>,
    pub(crate) estoque: Option<i64>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.nome.is_none()
            && self.descricao.is_none()
            && self.preco.is_none()
            && self.estoque.is_none()
    }

    /// Body of the `$set` operator for this change set.
    pub fn to_set_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(nome) = &self.nome {
            set.insert("nome", nome.as_str());
        }
        if let Some(descricao) = &self.descricao {
            set.insert("descricao", descricao.as_str());
        }
        if let Some(preco) = self.preco {
            set.insert("preco", preco);
        }
        if let Some(estoque) = self.estoque {
            set.insert("estoque", estoque);
        }
        set
    }

    /// Applies the assignments to an in-memory document.
    pub fn apply_to(&self, doc: &mut ProductDocument) {
        if let Some(nome) = &self.nome {
            doc.nome = nome.clone();
        }
        if let Some(descricao) = &self.descricao {
            doc.descricao = descricao.clone();
        }
        if let Some(preco) = self.preco {
            doc.preco = preco;
        }
        if let Some(estoque) = self.estoque {
            doc.estoque = estoque;
        }
    }
}

// --- Misc responses ---

/// Payload of the `GET /` liveness probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}
