//! Fashion Store CLI - shop, check out and manage the session store from a
//! terminal.
//!
//! Shopper state is kept as one JSON file per document in a data directory
//! (`--data-dir` or `FS_DATA_DIR`), so a second invocation sees what the first
//! one left behind.
//!
//! # Usage
//!
//! ```bash
//! fs-cli products list
//! fs-cli cart add 1 --quantity 2
//! fs-cli login --demo
//! fs-cli register --name "Asha Rao" --email asha@example.com --password secret1 --confirm-password secret1
//! fs-cli checkout shipping --address "12 MG Road" --city Pune --postal-code 411001 --country India
//! fs-cli checkout payment cash-on-delivery
//! fs-cli checkout place-order
//! fs-cli order show
//!
//! # Create the tower-sessions table for the server
//! fs-cli migrate sessions
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use fashion_store_core::PaymentMethod;

mod commands;
mod output;

use commands::Context;

#[derive(Parser)]
#[command(name = "fs-cli")]
#[command(author, version, about = "Fashion Store terminal client")]
struct Cli {
    /// Directory holding the shopper's documents
    #[arg(long, env = "FS_DATA_DIR", default_value = ".fashion-store", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Sign in with credentials, or as the demo user
    Login {
        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long, env = "FS_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Skip the store API and sign in as the demo user
        #[arg(long)]
        demo: bool,
    },
    /// Create an account and sign in as it
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "FS_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        confirm_password: String,
    },
    /// Sign out (cart, wishlist and checkout data stay)
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Checkout steps
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
    /// Inspect or update the latest order
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List all products
    List,
    /// Show one product
    Show { id: String },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and subtotal
    Show,
    /// Add a product (merges with an existing line)
    Add {
        id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity
    Update { id: String, quantity: u32 },
    /// Remove a line
    Remove { id: String },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show wishlisted products
    Show,
    /// Add or remove a product
    Toggle { id: String },
    /// Remove a product
    Remove { id: String },
    /// Add one unit of a wishlisted product to the cart
    MoveToCart { id: String },
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Show which steps are available
    Status,
    /// Save the shipping address
    Shipping {
        #[arg(long)]
        address: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        postal_code: String,
        #[arg(long)]
        country: String,
    },
    /// Save the payment method
    Payment { method: PaymentArg },
    /// Show the order summary
    Summary,
    /// Place the order
    PlaceOrder,
}

#[derive(Subcommand)]
enum OrderAction {
    /// Show an order (the latest when no id is given)
    Show { id: Option<String> },
    /// Mark an order paid
    Pay { id: String },
    /// Mark an order delivered
    Deliver { id: String },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Create the tower-sessions table in the storefront database
    Sessions,
}

/// Payment method names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PaymentArg {
    /// PayPal or a credit/debit card
    Paypal,
    /// Stripe
    Stripe,
    /// Pay the courier on delivery
    CashOnDelivery,
}

impl From<PaymentArg> for PaymentMethod {
    fn from(arg: PaymentArg) -> Self {
        match arg {
            PaymentArg::Paypal => Self::CardOrWallet,
            PaymentArg::Stripe => Self::AlternateGateway,
            PaymentArg::CashOnDelivery => Self::CashOnDelivery,
        }
    }
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Commands::Migrate { target } = cli.command {
        match target {
            MigrateTarget::Sessions => commands::migrate::sessions().await?,
        }
        return Ok(());
    }

    let ctx = Context::open(&cli.data_dir).await?;
    let text = dispatch(&ctx, cli.command).await?;
    output::emit(&text);
    Ok(())
}

async fn dispatch(ctx: &Context, command: Commands) -> Result<String, commands::CommandError> {
    use commands::{account, checkout, shop};

    match command {
        Commands::Products { action } => match action {
            ProductAction::List => shop::list_products(ctx).await,
            ProductAction::Show { id } => shop::show_product(ctx, &id).await,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => shop::show_cart(ctx).await,
            CartAction::Add { id, quantity } => shop::add_to_cart(ctx, &id, quantity).await,
            CartAction::Update { id, quantity } => shop::update_cart(ctx, &id, quantity).await,
            CartAction::Remove { id } => shop::remove_from_cart(ctx, &id).await,
            CartAction::Clear => shop::clear_cart(ctx).await,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => shop::show_wishlist(ctx).await,
            WishlistAction::Toggle { id } => shop::toggle_wishlist(ctx, &id).await,
            WishlistAction::Remove { id } => shop::remove_from_wishlist(ctx, &id).await,
            WishlistAction::MoveToCart { id } => shop::move_to_cart(ctx, &id).await,
        },
        Commands::Login {
            email,
            password,
            demo,
        } => account::login(ctx, email.as_deref(), password.as_deref(), demo).await,
        Commands::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            let form = fashion_store_core::RegistrationForm {
                name,
                email,
                password,
                confirm_password,
            };
            account::register(ctx, &form).await
        }
        Commands::Logout => account::logout(ctx).await,
        Commands::Whoami => account::whoami(ctx).await,
        Commands::Checkout { action } => match action {
            CheckoutAction::Status => checkout::status(ctx).await,
            CheckoutAction::Shipping {
                address,
                city,
                postal_code,
                country,
            } => {
                let form = fashion_store_core::ShippingForm {
                    address,
                    city,
                    postal_code,
                    country,
                };
                checkout::save_shipping(ctx, &form).await
            }
            CheckoutAction::Payment { method } => checkout::save_payment(ctx, method.into()).await,
            CheckoutAction::Summary => checkout::summary(ctx).await,
            CheckoutAction::PlaceOrder => checkout::place_order(ctx).await,
        },
        Commands::Order { action } => match action {
            OrderAction::Show { id } => checkout::show_order(ctx, id.as_deref()).await,
            OrderAction::Pay { id } => checkout::pay_order(ctx, &id).await,
            OrderAction::Deliver { id } => checkout::deliver_order(ctx, &id).await,
        },
        // Handled before a context is opened
        Commands::Migrate { .. } => Ok(String::new()),
    }
}
