pub mod deserializers;
pub mod http_client;
pub mod types;
pub mod wiki;

pub use types::{ArticleItem, ArticleListPage, CardCategory};
pub use wiki::{WikiClient, WikiSource};
