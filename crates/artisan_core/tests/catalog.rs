use artisan_core::{cart_subtotal_cents, CartItem, ModelValidationError, Product};

#[test]
fn subtotal_sums_line_totals() {
    let bowl = Product::new("Raku bowl", "raku-bowl", 4_500);
    let scarf = Product::new("Hand-woven scarf", "hand-woven-scarf", 3_250);
    let cart = vec![CartItem::new(bowl, 2), CartItem::new(scarf, 1)];

    assert_eq!(cart[0].line_total_cents().unwrap(), 9_000);
    assert_eq!(cart_subtotal_cents(&cart).unwrap(), 12_250);
    assert_eq!(cart_subtotal_cents(&[]).unwrap(), 0);
}

#[test]
fn product_validation_rules() {
    assert!(Product::new("Candle", "soy-candle-2", 0).validate().is_ok());

    assert_eq!(
        Product::new("  ", "candle", 100).validate(),
        Err(ModelValidationError::EmptyProductName)
    );
    assert_eq!(
        Product::new("Candle", "Soy Candle", 100).validate(),
        Err(ModelValidationError::InvalidSlug("Soy Candle".to_string()))
    );
    assert_eq!(
        Product::new("Candle", "candle-", 100).validate(),
        Err(ModelValidationError::InvalidSlug("candle-".to_string()))
    );
    assert_eq!(
        Product::new("Candle", "candle", -1).validate(),
        Err(ModelValidationError::NegativePrice(-1))
    );
}

#[test]
fn subtotal_rejects_invalid_lines_and_overflow() {
    let vase = Product::new("Vase", "vase", 1_000);
    assert_eq!(
        cart_subtotal_cents(&[CartItem::new(vase, 0)]),
        Err(ModelValidationError::ZeroQuantity)
    );

    let pricey = Product::new("Tapestry", "tapestry", i64::MAX);
    assert_eq!(
        cart_subtotal_cents(&[CartItem::new(pricey, 2)]),
        Err(ModelValidationError::AmountOverflow)
    );
}

#[test]
fn product_json_shape_is_stable() {
    let product = Product::new("Raku bowl", "raku-bowl", 4_500);
    let value = serde_json::to_value(&product).unwrap();

    assert_eq!(value["slug"], "raku-bowl");
    assert_eq!(value["price_cents"], 4_500);
    assert!(value["image_url"].is_null());
    assert_eq!(value["id"], product.id.to_string());
}
