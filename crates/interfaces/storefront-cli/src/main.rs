use clap::{Parser, Subcommand};
use storefront_cli::{account, commands, CliSort, FilterArgs, GlobalOpts};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(flatten)]
    global: GlobalOpts,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the catalog once and print the products matching the filters
    Products {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, value_enum, default_value_t = CliSort::Recommended)]
        sort: CliSort,
        /// Print the visible products as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how many products carry each facet value
    Facets,
    /// Keep the catalog fresh and print the view on every change
    Watch {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, value_enum, default_value_t = CliSort::Recommended)]
        sort: CliSort,
    },
    Signin {
        #[arg(long)]
        email: String,
    },
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    Signout,
    Whoami,
    Wishlist {
        #[command(subcommand)]
        command: WishlistCommands,
    },
}

#[derive(Subcommand)]
enum WishlistCommands {
    List,
    /// Add a product by id, or remove it if already present
    Toggle { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("default subscriber");

    let global = cli.global;
    match cli.command {
        Commands::Products {
            filters,
            sort,
            json,
        } => {
            commands::cmd_products(&global, &filters, sort, json).await?;
        }
        Commands::Facets => {
            commands::cmd_facets(&global).await?;
        }
        Commands::Watch { filters, sort } => commands::cmd_watch(&global, &filters, sort).await?,
        Commands::Signin { email } => {
            account::handle_signin(&global, &email)?;
        }
        Commands::Signup {
            name,
            email,
            password,
            confirm,
        } => {
            account::handle_signup(&global, &name, &email, &password, &confirm)?;
        }
        Commands::Signout => account::handle_signout(&global)?,
        Commands::Whoami => {
            account::handle_whoami(&global)?;
        }
        Commands::Wishlist { command } => match command {
            WishlistCommands::List => {
                account::handle_wishlist_list(&global)?;
            }
            WishlistCommands::Toggle { id } => {
                account::handle_wishlist_toggle(&global, &id).await?;
            }
        },
    }

    Ok(())
}
