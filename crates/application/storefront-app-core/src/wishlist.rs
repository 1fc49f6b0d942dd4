use chrono::{DateTime, Utc};
use storefront_core::{Product, ProductId};

use crate::domain::WishlistItem;
use crate::ports::{SessionPort, WishlistRepo};

#[derive(Debug, thiserror::Error)]
pub enum WishlistError {
    #[error("Sign in to manage your wishlist")]
    SignInRequired,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wishlist {
    items: Vec<WishlistItem>,
}

impl Wishlist {
    pub fn from_items(items: Vec<WishlistItem>) -> Self {
        Self { items }
    }

    pub fn load<W>(repo: &W) -> Result<Self, WishlistError>
    where
        W: WishlistRepo + ?Sized,
    {
        Ok(Self::from_items(repo.load()?))
    }

    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|i| &i.id == id)
    }

    /// Adds `product` if absent, removes it if present. Returns whether it is
    /// on the list afterwards.
    pub fn toggle(&mut self, product: &Product, now: DateTime<Utc>) -> bool {
        if self.contains(&product.id) {
            self.items.retain(|i| i.id != product.id);
            false
        } else {
            self.items.push(WishlistItem {
                id: product.id.clone(),
                title: product.title.clone(),
                image: product.image.clone(),
                price: product.price,
                added_at: now,
            });
            true
        }
    }
}

/// Toggle `product` on the signed-in user's wishlist and persist the result.
pub fn toggle_favorite<S, W>(
    session: &S,
    repo: &W,
    product: &Product,
) -> Result<bool, WishlistError>
where
    S: SessionPort + ?Sized,
    W: WishlistRepo + ?Sized,
{
    if session.current_user()?.is_none() {
        return Err(WishlistError::SignInRequired);
    }
    let mut list = Wishlist::load(repo)?;
    let on_list = list.toggle(product, Utc::now());
    repo.save(list.items())?;
    Ok(on_list)
}
