//! Value constraints on product payloads.
//!
//! Shape errors (missing fields, wrong JSON types) are caught earlier by deserialization;
//! this module enforces what the types alone cannot express. Everything here runs before
//! any persistence call.

use crate::{
    error::{ApiError, ApiResult},
    models::{CreateProductRequest, NewProduct, ProductChanges, UpdateProductRequest},
};

pub fn check_nome(nome: &str) -> ApiResult<()> {
    if nome.trim().is_empty() {
        return Err(ApiError::Validation("nome não pode ser vazio".to_string()));
    }
    Ok(())
}

pub fn check_preco(preco: f64) -> ApiResult<()> {
    // NaN fails the comparison as well.
    if !(preco.is_finite() && preco > 0.0) {
        return Err(ApiError::Validation(
            "preco deve ser maior que zero".to_string(),
        ));
    }
    Ok(())
}

pub fn check_estoque(estoque: i64) -> ApiResult<()> {
    if estoque < 0 {
        return Err(ApiError::Validation(
            "estoque deve ser maior ou igual a zero".to_string(),
        ));
    }
    Ok(())
}

impl CreateProductRequest {
    /// validate
    ///
    /// Checks every field and hands back the payload as a `NewProduct`, the only type
    /// the repository accepts for inserts.
    pub fn validate(self) -> ApiResult<NewProduct> {
        check_nome(&self.nome)?;
        check_preco(self.preco)?;
        check_estoque(self.estoque)?;

        Ok(NewProduct {
            nome: self.nome,
            descricao: self.descricao,
            preco: self.preco,
            estoque: self.estoque,
        })
    }
}

impl UpdateProductRequest {
    /// into_changes
    ///
    /// Drops the fields that were omitted or sent as `null`. An empty remainder is an
    /// `EmptyUpdateSet`; otherwise each supplied field must satisfy the same constraint
    /// as on create.
    pub fn into_changes(self) -> ApiResult<ProductChanges> {
        let changes = ProductChanges {
            nome: self.nome,
            descricao: self.descricao,
            preco: self.preco,
            estoque: self.estoque,
        };

        if changes.is_empty() {
            return Err(ApiError::EmptyUpdateSet);
        }

        if let Some(nome) = &changes.nome {
            check_nome(nome)?;
        }
        if let Some(preco) = changes.preco {
            check_preco(preco)?;
        }
        if let Some(estoque) = changes.estoque {
            check_estoque(estoque)?;
        }

        Ok(changes)
    }
}
