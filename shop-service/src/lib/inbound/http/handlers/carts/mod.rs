pub mod add_cart_item;
pub mod clear_cart;
pub mod get_cart;
pub mod remove_cart_item;
pub mod update_cart_item;

pub use add_cart_item::add_cart_item;
pub use clear_cart::clear_cart;
pub use get_cart::get_cart;
pub use remove_cart_item::remove_cart_item;
pub use update_cart_item::update_cart_item;
