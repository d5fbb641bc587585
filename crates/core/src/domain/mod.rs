pub mod cart;
pub mod category;
pub mod product;
