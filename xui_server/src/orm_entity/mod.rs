pub mod prelude;

pub mod inbound;
pub mod user;
