//! Domain models for admin.

pub mod admin_user;
pub mod order;
pub mod session;
pub mod user;

pub use admin_user::{AdminRole, AdminUser};
pub use order::{Order, OrderCounts};
pub use session::{CurrentAdmin, keys as session_keys};
pub use user::{DirectoryUser, UserDirectory, UserSummary};
