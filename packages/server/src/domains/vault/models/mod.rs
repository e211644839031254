pub mod vault_item;

pub use vault_item::*;
