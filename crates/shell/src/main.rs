//! `vitrine` - terminal front end for the product catalog.
//!
//! # Usage
//!
//! ```bash
//! vitrine login -e admin@shop.io -p secret1
//! vitrine products list
//! vitrine products create --name Keyboard --price 45 --image kb.png --in-stock
//! vitrine open /products/update/3
//! vitrine logout
//! ```
//!
//! Configuration comes from `VITRINE_*` variables; flags override them.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use vitrine_auth::Credentials;
use vitrine_core::{ProductId, UserId};
use vitrine_products::{Product, ProductDraft};
use vitrine_shell::{Navigation, Notification, Route, Shell, ShellConfig};

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Product catalog client")]
struct Cli {
    /// REST base URL (also: VITRINE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the stored session (also: VITRINE_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// User id allowed into admin pages (also: VITRINE_ADMIN_ID)
    #[arg(long, global = true)]
    admin_id: Option<UserId>,

    /// Print results and notifications as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "VITRINE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "VITRINE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user, confirming the session with the server
    Whoami,
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Navigate to a route, running its guard
    Open { path: String },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List all products
    List {
        /// Only products currently in stock
        #[arg(long)]
        in_stock: bool,
    },
    /// Show one product
    Show { id: ProductId },
    /// Create a product (admin)
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        image: String,
        #[arg(long)]
        in_stock: bool,
    },
    /// Change fields of a product (admin)
    Update {
        id: ProductId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        in_stock: Option<bool>,
    },
    /// Delete a product (admin)
    Delete { id: ProductId },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = ShellConfig::from_env().context("invalid configuration")?;
    if let Some(url) = cli.api_url.clone() {
        config.api_url = url;
    }
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    if let Some(id) = cli.admin_id {
        config.admin_id = Some(id);
    }
    vitrine_observability::init(config.log_format);

    let mut shell = Shell::from_config(&config).context("could not start shell")?;
    let out = Output { json: cli.json };

    run(&mut shell, cli.command, &out).await?;

    let failed = shell.notifications.has_errors();
    for note in shell.notifications.drain() {
        out.notification(&note);
    }
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

async fn run(shell: &mut Shell, command: Commands, out: &Output) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            if let Some(user) = shell
                .auth
                .login(&Credentials::new(email, password), &mut shell.notifications)
                .await
            {
                out.value(&user, &format!("logged in as {} (#{})", user.email, user.id));
            }
        }
        Commands::Register { email, password } => {
            shell
                .auth
                .register(&Credentials::new(email, password), &mut shell.notifications)
                .await;
        }
        Commands::Logout => {
            let nav = shell.logout();
            out.navigation(&nav);
        }
        Commands::Whoami => {
            shell.auth.restore(&mut shell.notifications).await;
            match shell.auth.current_user() {
                Some(user) => out.value(&user, &format!("{} (#{})", user.email, user.id)),
                None => out.line("not logged in"),
            }
        }
        Commands::Open { path } => {
            let nav = shell.open(&path).await?;
            out.navigation(&nav);
        }
        Commands::Products { action } => products(shell, action, out).await?,
    }
    Ok(())
}

async fn products(shell: &mut Shell, action: ProductAction, out: &Output) -> Result<()> {
    match action {
        ProductAction::List { in_stock } => {
            shell.open(Route::Products.pattern()).await?;
            let catalog = shell.catalog.catalog();
            let all: Vec<&Product> = if in_stock {
                catalog.in_stock().collect()
            } else {
                catalog.iter().collect()
            };
            if out.json {
                out.value(&all, "");
            } else {
                all.iter().for_each(|p| out.line(&describe(p)));
            }
        }
        ProductAction::Show { id } => {
            shell.open(&Route::ProductDetail(id).path()).await?;
            if let Some(p) = shell.catalog.selected() {
                out.value(p, &describe(p));
            }
        }
        ProductAction::Create {
            name,
            price,
            image,
            in_stock,
        } => {
            if !guarded(shell, Route::ProductCreate, out) {
                return Ok(());
            }
            let draft = ProductDraft::new(name, price, image).in_stock(in_stock);
            if let Some(p) = shell.catalog.create(&draft, &mut shell.notifications).await {
                out.value(&p, &describe(&p));
            }
        }
        ProductAction::Update {
            id,
            name,
            price,
            image,
            in_stock,
        } => {
            if !guarded(shell, Route::ProductUpdate(id), out) {
                return Ok(());
            }
            let Some(current) = shell.catalog.open(id, &mut shell.notifications).await else {
                return Ok(());
            };
            let mut edited = current.clone();
            if let Some(name) = name {
                edited.name = name;
            }
            if let Some(price) = price {
                edited.price = price;
            }
            if let Some(image) = image {
                edited.image = Some(image);
            }
            if let Some(in_stock) = in_stock {
                edited.in_stock = in_stock;
            }
            if let Some(p) = shell.catalog.update(&edited, &mut shell.notifications).await {
                out.value(&p, &describe(&p));
            }
        }
        ProductAction::Delete { id } => {
            if !guarded(shell, Route::ProductUpdate(id), out) {
                return Ok(());
            }
            shell.catalog.delete(id, &mut shell.notifications).await;
        }
    }
    Ok(())
}

/// Management commands pass through the same guard as the pages.
fn guarded(shell: &mut Shell, route: Route, out: &Output) -> bool {
    let nav = shell.navigator.go(route, &mut shell.notifications);
    if !nav.allowed() {
        out.navigation(&nav);
    }
    nav.allowed()
}

fn describe(p: &Product) -> String {
    let id = p.id.map(|id| format!("#{id}")).unwrap_or_else(|| "#?".to_string());
    let stock = if p.in_stock { "in stock" } else { "out of stock" };
    format!("{id} {} {:.2} ({stock})", p.name, p.price)
}

struct Output {
    json: bool,
}

impl Output {
    fn line(&self, text: &str) {
        if !self.json {
            println!("{text}");
        }
    }

    fn value<T: serde::Serialize + ?Sized>(&self, value: &T, text: &str) {
        if self.json {
            match serde_json::to_string(value) {
                Ok(s) => println!("{s}"),
                Err(e) => tracing::error!(error = %e, "could not encode output"),
            }
        } else {
            println!("{text}");
        }
    }

    fn navigation(&self, nav: &Navigation) {
        let value = serde_json::json!({
            "requested": nav.requested.path(),
            "landed": nav.landed.path(),
            "allowed": nav.allowed(),
        });
        self.value(&value, &format!("-> {}", nav.landed));
    }

    fn notification(&self, note: &Notification) {
        if self.json {
            self.value(note, "");
        } else {
            eprintln!("[{}] {}", note.level.as_str(), note.message);
        }
    }
}
