pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::account;
pub use domain::cart;
pub use domain::catalog;
pub use domain::order;
pub use outbound::repositories;
