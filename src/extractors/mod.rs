mod bound_article;
pub use bound_article::BoundArticle;
