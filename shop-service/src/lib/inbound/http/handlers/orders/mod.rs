pub mod get_order;
pub mod list_orders;
pub mod place_order;

pub use get_order::get_order;
pub use list_orders::list_orders;
pub use place_order::place_order;
