use clap::Args;
use trolley::products::ProductId;
use trolley_app::catalog::load_catalog;

use super::{Session, products::write_products_to};

#[derive(Debug, Args)]
pub(crate) struct LikeArgs {
    /// Product ID to like or unlike
    id: ProductId,
}

pub(crate) fn toggle(mut session: Session, args: &LikeArgs) -> Result<(), String> {
    let liked = session
        .store
        .toggle_like(args.id)
        .map_err(|error| format!("failed to save liked products: {error}"))?;

    if liked {
        println!("Liked product {}.", args.id);
    } else {
        println!("Unliked product {}.", args.id);
    }

    println!("Liked products: {}", session.store.liked().len());

    Ok(())
}

pub(crate) async fn list(session: &Session) -> Result<(), String> {
    let view = load_catalog(&session.context.catalog).await;

    if let Some(notice) = view.notice {
        return Err(notice);
    }

    let liked = session.store.liked();

    write_products_to(
        std::io::stdout().lock(),
        liked.filter(&view.products),
        liked,
    )
    .map_err(|error| format!("failed to print liked products: {error}"))
}
