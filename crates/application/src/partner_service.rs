//! Partner master data: CRUD, CSV import and CSV export.

mod export;
mod import_profile;
mod ports;
mod service;

#[cfg(test)]
mod tests;

pub use export::PARTNER_EXPORT_FILE_PREFIX;
pub use import_profile::{PARTNER_CSV_HEADERS, PARTNER_IMPORT_ERROR_PREFIX, PartnerImportProfile};
pub use ports::PartnerRepository;
pub use service::{PARTNER_ORDERING_FIELDS, PartnerService};
