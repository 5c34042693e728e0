pub mod account;
pub mod cart;
pub mod catalog;
pub mod memory;
pub mod order;

pub use account::PostgresAccountRepository;
pub use cart::PostgresCartRepository;
pub use catalog::PostgresCatalog;
pub use memory::InMemoryStore;
pub use order::PostgresOrderRepository;
