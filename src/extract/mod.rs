pub mod content;
pub mod links;
pub mod page_type;
pub mod text;


pub use content::ContentExtractor;
pub use links::LinkExtractor;
pub use page_type::PageTypeRules;
