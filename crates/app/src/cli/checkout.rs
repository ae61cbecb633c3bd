use trolley_app::checkout::CheckoutError;

use super::Session;

pub(crate) async fn run(mut session: Session) -> Result<(), String> {
    let checkout = session.context.checkout(&session.config.api);

    match checkout.checkout(&mut session.store).await {
        Ok(receipt) => {
            if !receipt.message.is_empty() {
                println!("{}", receipt.message);
            }

            match receipt.total {
                Some(total) => {
                    println!("Total: {total}");

                    if total != receipt.estimate {
                        println!("(estimated {} before checkout)", receipt.estimate);
                    }
                }
                None => println!("Total (estimate): {}", receipt.estimate),
            }

            Ok(())
        }
        Err(CheckoutError::EmptyCart) => Err("Your cart is empty.".to_string()),
        Err(CheckoutError::Store(error)) => Err(format!(
            "Your order was placed, but the cart could not be cleared: {error}"
        )),
        Err(error) => Err(format!("Checkout failed: {error}")),
    }
}
