//! Session and wishlist subcommands. These only touch local files, except
//! `wishlist toggle`, which needs the catalog to find the product.

use anyhow::{anyhow, Context, Result};
use storefront_app_core::persistence::FilePersistence;
use storefront_app_core::session::{self, password_strength, strength_label};
use storefront_app_core::wishlist::toggle_favorite;
use storefront_app_core::{format_price, SessionPort, User, Wishlist, WishlistItem};
use storefront_core::ProductId;

use crate::commands::load_catalog;
use crate::GlobalOpts;

pub fn handle_signin(global: &GlobalOpts, email: &str) -> Result<User> {
    let user = session::sign_in(&global.persistence(), email)?;
    println!("Signed in as {} <{}>.", user.name, user.email);
    Ok(user)
}

pub fn handle_signup(
    global: &GlobalOpts,
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<User> {
    let user = session::sign_up(&global.persistence(), name, email, password, confirm)?;
    let score = password_strength(password);
    println!("Account created for {} <{}>.", user.name, user.email);
    println!("Password strength: {} ({score}/4)", strength_label(score));
    Ok(user)
}

pub fn handle_signout(global: &GlobalOpts) -> Result<()> {
    session::sign_out(&global.persistence())?;
    println!("Signed out.");
    Ok(())
}

pub fn handle_whoami(global: &GlobalOpts) -> Result<Option<User>> {
    let user = global
        .persistence()
        .current_user()
        .context("Failed to read session")?;
    match &user {
        Some(u) => println!("{} <{}>", u.name, u.email),
        None => println!("Not signed in."),
    }
    Ok(user)
}

fn require_user(store: &FilePersistence) -> Result<User> {
    store
        .current_user()
        .context("Failed to read session")?
        .ok_or_else(|| anyhow!("Sign in to see your wishlist"))
}

pub fn handle_wishlist_list(global: &GlobalOpts) -> Result<Vec<WishlistItem>> {
    let store = global.persistence();
    require_user(&store)?;
    let items = Wishlist::load(&store)?.items().to_vec();

    if items.is_empty() {
        println!("Your wishlist is empty.");
        return Ok(items);
    }

    println!("{:<6} {:<40} {:>10} {:<20}", "ID", "TITLE", "PRICE", "ADDED");
    println!("{:-<6} {:-<40} {:->10} {:-<20}", "", "", "", "");
    for item in &items {
        println!(
            "{:<6} {:<40} {:>10} {:<20}",
            item.id.to_string(),
            item.title,
            format_price(item.price),
            item.added_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(items)
}

/// Adds or removes a catalog product. Returns whether it is on the wishlist
/// afterwards.
pub async fn handle_wishlist_toggle(global: &GlobalOpts, id: &str) -> Result<bool> {
    let store = global.persistence();
    require_user(&store)?;

    let settings = global.settings(&store)?;
    let wanted: ProductId = id.parse().unwrap_or_else(|e| match e {});
    let (products, _origin) = load_catalog(&settings).await?;
    let product = products
        .iter()
        .find(|p| p.id == wanted)
        .ok_or_else(|| anyhow!("No product with id '{id}' in the catalog"))?;

    let added = toggle_favorite(&store, &store, product)?;
    if added {
        println!("Added '{}' to your wishlist.", product.title);
    } else {
        println!("Removed '{}' from your wishlist.", product.title);
    }
    Ok(added)
}
