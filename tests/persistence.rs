//! Snapshot persistence across store restarts.

use std::fs;

use rusty_money::{
    Money,
    iso::{GBP, USD},
};
use tempfile::tempdir;
use testresult::TestResult;

use trolley::prelude::*;

fn product(id: u64, minor: i64) -> Product {
    Product::new(id, format!("Product {id}"), Money::from_minor(minor, USD))
}

#[test]
fn cart_and_likes_survive_a_restart() -> TestResult {
    let dir = tempdir()?;

    let mut store = CartStore::open(FileStorage::new(dir.path()), USD);
    store.add_to_cart(&product(1, 1999).with_image_url("https://img.example/1.png"))?;
    store.add_to_cart(&product(2, 250))?;
    store.add_to_cart(&product(1, 1999))?;
    store.toggle_like(ProductId::new(2))?;
    store.toggle_like(ProductId::new(7))?;

    let before_cart = store.cart().clone();
    let before_liked = store.liked().clone();
    drop(store);

    let reopened = CartStore::open(FileStorage::new(dir.path()), USD);

    assert_eq!(*reopened.cart(), before_cart);
    assert_eq!(*reopened.liked(), before_liked);
    assert_eq!(reopened.cart().subtotal()?, Money::from_minor(4248, USD));

    Ok(())
}

#[test]
fn clear_is_visible_after_restart() -> TestResult {
    let dir = tempdir()?;

    let mut store = CartStore::open(FileStorage::new(dir.path()), USD);
    store.add_to_cart(&product(1, 100))?;
    store.clear_cart()?;
    drop(store);

    let reopened = CartStore::open(FileStorage::new(dir.path()), USD);

    assert!(reopened.cart().is_empty());

    Ok(())
}

#[test]
fn corrupt_files_start_empty() -> TestResult {
    let dir = tempdir()?;
    fs::write(dir.path().join(format!("{CART_KEY}.json")), "[{\"id\":")?;
    fs::write(dir.path().join(format!("{LIKED_KEY}.json")), "{}")?;

    let mut store = CartStore::open(FileStorage::new(dir.path()), USD);

    assert!(store.cart().is_empty());
    assert!(store.liked().is_empty());

    // The next mutation overwrites the corrupt snapshot wholesale.
    store.add_to_cart(&product(3, 300))?;
    let reopened = CartStore::open(FileStorage::new(dir.path()), USD);
    assert_eq!(reopened.cart().line_count(), 1);

    Ok(())
}

#[test]
fn legacy_snapshot_with_numeric_prices_loads() -> TestResult {
    let raw = r#"[
        {"id":3,"name":"Headphones","price":59.99,"imageUrl":"h.png","quantity":1},
        {"id":1,"name":"Keyboard","price":20,"quantity":2}
    ]"#;
    let storage = MemoryStorage::with_slots([(CART_KEY, raw), (LIKED_KEY, "[3,3,1]")]);

    let store = CartStore::open(storage, GBP);

    assert_eq!(store.cart().subtotal()?, Money::from_minor(9999, GBP));
    assert_eq!(
        store.cart().order_lines(),
        vec![
            OrderLine {
                id: ProductId::new(3),
                quantity: 1
            },
            OrderLine {
                id: ProductId::new(1),
                quantity: 2
            },
        ]
    );
    assert_eq!(store.liked().len(), 2);

    Ok(())
}
