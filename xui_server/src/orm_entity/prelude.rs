pub use super::inbound::Entity as Inbound;
pub use super::user::Entity as User;
