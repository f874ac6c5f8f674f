pub mod headings;
pub mod image;
pub mod meta_description;
pub mod mobile;
pub mod security;
pub mod seo_basic;
pub mod title;
