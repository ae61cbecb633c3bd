use clap::{Parser, Subcommand};
use trolley::{storage::FileStorage, store::CartStore};
use trolley_app::{config::AppConfig, context::AppContext, observability};

mod cart;
mod checkout;
mod liked;
mod products;

#[derive(Debug, Parser)]
#[command(name = "trolley-app", about = "Trolley shopping cart", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the catalog
    Products,

    /// Show the cart with its estimated subtotal
    Cart,

    /// Add one unit of a catalog product to the cart
    Add(cart::AddArgs),

    /// Set the quantity of a cart line; zero or less removes it
    Set(cart::SetArgs),

    /// Remove a line from the cart
    Remove(cart::RemoveArgs),

    /// Empty the cart
    Clear,

    /// Like or unlike a product
    Like(liked::LikeArgs),

    /// List liked products
    Liked,

    /// Submit the cart as an order
    Checkout,
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let session = Session::open(self.config)?;

        match self.command {
            Commands::Products => products::run(&session).await,
            Commands::Cart => cart::show(&session),
            Commands::Add(args) => cart::add(session, args).await,
            Commands::Set(args) => cart::set(session, &args),
            Commands::Remove(args) => cart::remove(session, &args),
            Commands::Clear => cart::clear(session),
            Commands::Like(args) => liked::toggle(session, &args),
            Commands::Liked => liked::list(&session).await,
            Commands::Checkout => checkout::run(session).await,
        }
    }
}

/// Services and local state shared by every command.
pub(crate) struct Session {
    config: AppConfig,
    context: AppContext,
    store: CartStore<FileStorage>,
}

impl Session {
    fn open(config: AppConfig) -> Result<Self, String> {
        let context = AppContext::from_api_config(&config.api)
            .map_err(|error| format!("failed to start: {error}"))?;

        let store = CartStore::open(
            FileStorage::new(config.storage.storage_dir.clone()),
            config.api.currency,
        );

        Ok(Self {
            config,
            context,
            store,
        })
    }
}
