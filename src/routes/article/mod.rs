mod handler;
mod model;

pub use handler::find_by_id;
pub use model::{Article, ArticleInfo, ArticleResolver, PgArticleResolver};
