use std::io;

use clap::Args;
use trolley::{
    products::ProductId, receipt::write_cart_to, storage::SnapshotStorage, store::CartStore,
};
use trolley_app::catalog::load_catalog;

use super::Session;

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Catalog product ID
    id: ProductId,
}

#[derive(Debug, Args)]
pub(crate) struct SetArgs {
    /// Product ID of the cart line
    id: ProductId,

    /// New quantity
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

#[derive(Debug, Args)]
pub(crate) struct RemoveArgs {
    /// Product ID of the cart line
    id: ProductId,
}

pub(crate) fn show(session: &Session) -> Result<(), String> {
    write_cart_to(io::stdout().lock(), session.store.cart())
        .map_err(|error| format!("failed to print cart: {error}"))
}

pub(crate) async fn add(mut session: Session, args: AddArgs) -> Result<(), String> {
    let view = load_catalog(&session.context.catalog).await;

    if let Some(notice) = view.notice {
        return Err(notice);
    }

    let product = view
        .products
        .iter()
        .find(|product| product.id == args.id)
        .ok_or_else(|| format!("product {} is not in the catalog", args.id))?;

    session
        .store
        .add_to_cart(product)
        .map_err(|error| format!("failed to add {} to cart: {error}", product.name))?;

    println!("Added {} to cart.", product.name);

    Ok(())
}

pub(crate) fn set(mut session: Session, args: &SetArgs) -> Result<(), String> {
    set_quantity(&mut session.store, args, io::stdout().lock())
}

pub(crate) fn remove(mut session: Session, args: &RemoveArgs) -> Result<(), String> {
    remove_line(&mut session.store, args, io::stdout().lock())
}

fn set_quantity<S: SnapshotStorage>(
    store: &mut CartStore<S>,
    args: &SetArgs,
    out: impl io::Write,
) -> Result<(), String> {
    let changed = store
        .update_quantity(args.id, args.quantity)
        .map_err(|error| format!("failed to save cart: {error}"))?;

    report(store, args.id, changed, out)
}

fn remove_line<S: SnapshotStorage>(
    store: &mut CartStore<S>,
    args: &RemoveArgs,
    out: impl io::Write,
) -> Result<(), String> {
    let removed = store
        .remove_from_cart(args.id)
        .map_err(|error| format!("failed to save cart: {error}"))?;

    report(store, args.id, removed, out)
}

/// Unknown ids leave the cart as it was; say so and show it.
fn report<S: SnapshotStorage>(
    store: &CartStore<S>,
    id: ProductId,
    changed: bool,
    mut out: impl io::Write,
) -> Result<(), String> {
    if !changed {
        writeln!(out, "Product {id} is not in the cart.")
            .map_err(|error| format!("failed to print cart: {error}"))?;
    }

    write_cart_to(out, store.cart()).map_err(|error| format!("failed to print cart: {error}"))
}

pub(crate) fn clear(mut session: Session) -> Result<(), String> {
    session
        .store
        .clear_cart()
        .map_err(|error| format!("failed to save cart: {error}"))?;

    println!("Cart cleared.");

    Ok(())
}
