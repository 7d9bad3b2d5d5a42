mod category;
mod product;

pub use category::CategoryService;
pub use product::ProductService;
