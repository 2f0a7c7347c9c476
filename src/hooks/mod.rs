pub mod initialize_user;

pub use initialize_user::initialize_user;
