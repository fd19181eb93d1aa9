mod model;

pub use model::{PgUserResolver, User, UserResolver};
