use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use trolley::{liked::LikedSet, products::Product};
use trolley_app::catalog::load_catalog;

use super::Session;

pub(crate) async fn run(session: &Session) -> Result<(), String> {
    let view = load_catalog(&session.context.catalog).await;

    if let Some(notice) = &view.notice {
        eprintln!("{notice}");
    }

    write_products_to(io::stdout().lock(), &view.products, session.store.liked())
        .map_err(|error| format!("failed to print products: {error}"))
}

/// Render products as a table, marking the liked ones.
pub(crate) fn write_products_to<'p>(
    mut out: impl io::Write,
    products: impl IntoIterator<Item = &'p Product>,
    liked: &LikedSet,
) -> io::Result<()> {
    let mut builder = Builder::default();
    let mut empty = true;

    builder.push_record(["ID", "Name", "Price", "Liked"]);

    for product in products {
        empty = false;

        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.price.to_string(),
            if liked.contains(product.id) { "♥" } else { "" }.to_string(),
        ]);
    }

    if empty {
        return writeln!(out, "No products found.");
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..3), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    writeln!(out, "{table}")
}
