//! Product master data and CSV export.

mod ports;
mod service;

#[cfg(test)]
mod tests;

pub use ports::ProductRepository;
pub use service::{
    PRODUCT_CSV_HEADERS, PRODUCT_EXPORT_FILE_PREFIX, PRODUCT_ORDERING_FIELDS, ProductService,
};
