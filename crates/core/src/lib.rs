//! Cafe Rencontre Core - domain types and cart rules.
//!
//! This crate is shared by every Cafe Rencontre component:
//! - `storefront` - Public shop (catalog, cart, checkout)
//! - `admin` - Back-office (orders, products, users)
//! - `cli` - Migrations, seeding and account management
//!
//! # Architecture
//!
//! Everything here is pure apart from reading environment variables in
//! [`config`]: no database access, no HTTP, no async. The cart
//! store talks to persistence only through the [`CartStorage`] trait so the
//! storefront can back it with a session while tests use [`MemoryStorage`].
//!
//! # Modules
//!
//! - [`types`] - Ids, money, statuses and email addresses
//! - [`catalog`] - Products as the cart sees them
//! - [`config`] - Environment variable helpers for the binaries
//! - [`customization`] - Drink modifiers and their surcharges
//! - [`cart`] - Cart lines, pricing and the persisted cart store
//! - [`order`] - Order drafts and whole-cart checkout requests
//! - [`receipt`] - Receipt summaries for printing and checkout responses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod customization;
pub mod order;
pub mod receipt;
pub mod types;

pub use cart::{
    CART_STORAGE_KEY, Cart, CartError, CartLine, CartStorage, CartStore, CartTotals,
    MAX_LINE_QUANTITY, MemoryStorage, StorageError, TAX_RATE,
};
pub use catalog::Product;
pub use config::ConfigError;
pub use customization::{Customization, MilkOption, Size, SugarLevel, SugarLevelError};
pub use order::{CheckoutRequest, MAX_AMOUNT, OrderDraft, OrderDraftError, order_number};
pub use receipt::{Receipt, ReceiptLine};
pub use types::*;
