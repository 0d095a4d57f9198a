pub mod database;
pub mod organization;
pub mod query;
pub mod record;
pub mod ticket;
pub mod user;

pub use database::*;
pub use organization::*;
pub use query::*;
pub use record::*;
pub use ticket::*;
pub use user::*;
