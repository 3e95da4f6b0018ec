//! Handlers module
//!
//! Orchestrate a request between the repository, the list pipeline and
//! the domain rules. Routes stay thin and only translate HTTP.

mod commands;
mod commission_handler;
mod link_handler;
mod payout_handler;
mod product_handler;


pub use commands::*;
pub use commission_handler::CommissionQueryHandler;
pub use link_handler::{LinkListing, LinkQueryHandler};
pub use payout_handler::PayoutHandler;
pub use product_handler::{ProductListing, ProductQueryHandler};
