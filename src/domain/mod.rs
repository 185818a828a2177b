pub mod article;

pub use article::{source_origin, Article, Published, UNKNOWN};
