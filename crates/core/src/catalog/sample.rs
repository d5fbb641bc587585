use rust_decimal::Decimal;

use crate::domain::category::CategoryName;
use crate::domain::product::{Product, ProductId};

/// `(id, name, category, price in cents, stock, image)` in listing order.
const SAMPLE_PRODUCTS: [(&str, &str, CategoryName, i64, u32, &str); 12] = [
    ("1", "Diamond Eternity Ring", CategoryName::Rings, 129_999, 10, "/images/rings/50E4SRFBC2137_1.webp"),
    ("2", "Pearl Pendant Necklace", CategoryName::Necklaces, 89_999, 15, "/images/necklace/50O4SS2AYDBA32_1.webp"),
    ("3", "Gold Bangle Set", CategoryName::Bangles, 149_999, 8, "/images/bangles/512216VJR1B00_1.webp"),
    ("4", "Sapphire Drop Earrings", CategoryName::Earrings, 109_999, 12, "/images/earings/510730VZA2B00_1.jpg"),
    ("5", "Emerald Tennis Bracelet", CategoryName::Bracelets, 249_999, 5, "/images/bangles/511251VXB1A00.webp"),
    ("6", "Ruby Stud Earrings", CategoryName::Earrings, 79_999, 20, "/images/earings/513220VJP2A00_1.webp"),
    ("7", "Platinum Wedding Band", CategoryName::Rings, 189_999, 7, "/images/rings/50E4SRFANA737_1.webp"),
    ("8", "Diamond Choker Necklace", CategoryName::Necklaces, 329_999, 3, "/images/necklace/50O4SS2ATDBA32_1.webp"),
    ("9", "Vintage Inspired Ring", CategoryName::Rings, 159_999, 9, "/images/rings/510122FAAAA00.webp"),
    ("10", "Gold Chain Necklace", CategoryName::Necklaces, 119_999, 14, "/images/necklace/51O4DP2AI1BA00_1.webp"),
    ("11", "Silver Bangle with Diamonds", CategoryName::Bangles, 99_999, 11, "/images/bangles/513220VJP2A00_1.webp"),
    ("12", "Pearl Stud Earrings", CategoryName::Earrings, 49_999, 25, "/images/earings/510228VEA2B00_1.webp"),
];

pub fn products() -> Vec<Product> {
    SAMPLE_PRODUCTS
        .iter()
        .map(|(id, name, category, cents, stock, image)| Product {
            id: ProductId::new(*id),
            name: (*name).to_owned(),
            category: *category,
            price: Decimal::new(*cents, 2),
            stock: *stock,
            image: (*image).to_owned(),
        })
        .collect()
}
