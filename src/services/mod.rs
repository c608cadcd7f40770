pub mod posts;
pub mod taxonomy;
