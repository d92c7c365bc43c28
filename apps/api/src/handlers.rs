pub mod health;
pub mod partners;
pub mod product_categories;
pub mod products;
pub mod tenants;

mod csv_download;
