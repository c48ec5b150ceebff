pub mod books;
pub mod dates;
pub mod escape;
pub mod member;
pub mod pages;

pub use escape::escape_html;
