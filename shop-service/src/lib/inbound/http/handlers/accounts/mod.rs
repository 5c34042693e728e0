pub mod current_account;
pub mod login;
pub mod logout;
pub mod register;

pub use current_account::current_account;
pub use login::login;
pub use logout::logout;
pub use register::register;
