//! Share domain entities.

pub mod item;
pub mod model;
pub mod permission;
pub mod recipient;

pub use item::ItemType;
pub use model::{NewShareRow, ShareRow, SubShareCursor};
pub use permission::SharePermissions;
pub use recipient::RecipientType;
