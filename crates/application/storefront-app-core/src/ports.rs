use crate::domain::{StoreSettings, User, WishlistItem};

pub trait SettingsRepo: Send + Sync + 'static {
    fn load(&self) -> anyhow::Result<StoreSettings>;
    fn save(&self, settings: &StoreSettings) -> anyhow::Result<()>;
}

/// Identity collaborator. Passed explicitly to whatever needs the current
/// user; the coordinator and the filter engine never see it.
pub trait SessionPort: Send + Sync + 'static {
    fn current_user(&self) -> anyhow::Result<Option<User>>;
    fn set(&self, user: &User) -> anyhow::Result<()>;
    fn clear(&self) -> anyhow::Result<()>;
}

pub trait WishlistRepo: Send + Sync + 'static {
    fn load(&self) -> anyhow::Result<Vec<WishlistItem>>;
    fn save(&self, items: &[WishlistItem]) -> anyhow::Result<()>;
}
