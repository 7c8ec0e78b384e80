use mongodb::bson::oid::ObjectId;
use product_api::{
    ApiError,
    models::{
        CreateProductRequest, Product, ProductDocument, ProductId, UpdateProductRequest,
    },
    validation::{check_estoque, check_nome, check_preco},
};

fn smartphone() -> CreateProductRequest {
    CreateProductRequest {
        nome: "Smartphone X".to_string(),
        descricao: "Um smartphone de última geração.".to_string(),
        preco: 1999.99,
        estoque: 50,
    }
}

// --- Serialization ---

#[test]
fn test_product_serializes_id_as_hex_string_under_underscore_id() {
    let oid = ObjectId::parse_str("64b7f0c2a1b2c3d4e5f6a7b8").unwrap();
    let product = Product::from(ProductDocument {
        id: oid,
        nome: "Caneca".to_string(),
        descricao: "Cerâmica".to_string(),
        preco: 29.9,
        estoque: 3,
    });

    let json = serde_json::to_value(&product).unwrap();

    assert_eq!(json["_id"], "64b7f0c2a1b2c3d4e5f6a7b8");
    assert_eq!(json["nome"], "Caneca");
    assert_eq!(json["preco"], 29.9);
    assert_eq!(json["estoque"], 3);
    assert!(json.get("id").is_none(), "the identifier key must be `_id`");
}

#[test]
fn test_create_request_rejects_missing_and_null_fields() {
    let missing = serde_json::from_str::<CreateProductRequest>(
        r#"{"nome":"X","descricao":"d","preco":1.0}"#,
    );
    assert!(missing.is_err(), "estoque is required");

    let null_field = serde_json::from_str::<CreateProductRequest>(
        r#"{"nome":null,"descricao":"d","preco":1.0,"estoque":1}"#,
    );
    assert!(null_field.is_err(), "null is not a valid nome");
}

#[test]
fn test_create_request_rejects_fractional_estoque() {
    let result = serde_json::from_str::<CreateProductRequest>(
        r#"{"nome":"X","descricao":"d","preco":1.0,"estoque":1.5}"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_update_request_treats_null_as_absent() {
    let update: UpdateProductRequest =
        serde_json::from_str(r#"{"nome":null,"estoque":10}"#).unwrap();

    assert!(update.nome.is_none());
    assert!(update.descricao.is_none());
    assert_eq!(update.estoque, Some(10));
}

#[test]
fn test_request_payloads_must_be_json_objects() {
    let create = serde_json::from_str::<CreateProductRequest>(
        r#"["Smartphone X","desc",1999.99,50]"#,
    );
    assert!(create.is_err());

    assert!(serde_json::from_str::<UpdateProductRequest>("[null,null,null,7]").is_err());
    assert!(serde_json::from_str::<UpdateProductRequest>("[]").is_err());
    assert!(serde_json::from_str::<UpdateProductRequest>("7").is_err());
}

// --- Field constraints ---

#[test]
fn test_preco_must_be_strictly_positive() {
    assert!(check_preco(0.01).is_ok());
    assert!(matches!(check_preco(0.0), Err(ApiError::Validation(_))));
    assert!(matches!(check_preco(-5.0), Err(ApiError::Validation(_))));
    assert!(matches!(check_preco(f64::NAN), Err(ApiError::Validation(_))));
}

#[test]
fn test_estoque_must_not_be_negative() {
    assert!(check_estoque(0).is_ok());
    assert!(check_estoque(50).is_ok());
    assert!(matches!(check_estoque(-1), Err(ApiError::Validation(_))));
}

#[test]
fn test_nome_must_not_be_blank() {
    assert!(check_nome("Smartphone X").is_ok());
    assert!(matches!(check_nome(""), Err(ApiError::Validation(_))));
    assert!(matches!(check_nome("   "), Err(ApiError::Validation(_))));
}

// --- Request validation ---

#[test]
fn test_create_validate_accepts_valid_payload() {
    let new_product = smartphone().validate().unwrap();
    let document = new_product.into_document(ProductId::generate());

    assert_eq!(document.nome, "Smartphone X");
    assert_eq!(document.preco, 1999.99);
    assert_eq!(document.estoque, 50);
}

#[test]
fn test_create_validate_rejects_bad_values() {
    let zero_price = CreateProductRequest {
        preco: 0.0,
        ..smartphone()
    };
    assert!(matches!(zero_price.validate(), Err(ApiError::Validation(_))));

    let negative_stock = CreateProductRequest {
        estoque: -3,
        ..smartphone()
    };
    assert!(matches!(
        negative_stock.validate(),
        Err(ApiError::Validation(_))
    ));
}

#[test]
fn test_update_with_no_fields_is_an_empty_update_set() {
    let empty = UpdateProductRequest::default();
    assert!(matches!(empty.into_changes(), Err(ApiError::EmptyUpdateSet)));

    let all_null: UpdateProductRequest = serde_json::from_str(
        r#"{"nome":null,"descricao":null,"preco":null,"estoque":null}"#,
    )
    .unwrap();
    assert!(matches!(all_null.into_changes(), Err(ApiError::EmptyUpdateSet)));
}

#[test]
fn test_update_applies_create_constraints_to_supplied_fields() {
    let bad_price = UpdateProductRequest {
        preco: Some(-1.0),
        ..UpdateProductRequest::default()
    };
    assert!(matches!(bad_price.into_changes(), Err(ApiError::Validation(_))));

    let good = UpdateProductRequest {
        estoque: Some(10),
        ..UpdateProductRequest::default()
    };
    let changes = good.into_changes().unwrap();
    let set = changes.to_set_document();
    assert_eq!(set.len(), 1);
    assert!(set.contains_key("estoque"));
}

#[test]
fn test_changes_apply_only_supplied_fields() {
    let mut document = smartphone()
        .validate()
        .unwrap()
        .into_document(ProductId::generate());

    let changes = UpdateProductRequest {
        estoque: Some(10),
        ..UpdateProductRequest::default()
    }
    .into_changes()
    .unwrap();
    changes.apply_to(&mut document);

    assert_eq!(document.estoque, 10);
    assert_eq!(document.nome, "Smartphone X");
    assert_eq!(document.preco, 1999.99);
}
