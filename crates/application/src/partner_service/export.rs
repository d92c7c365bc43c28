use masterhub_domain::Partner;

use super::PARTNER_CSV_HEADERS;
use crate::csv_import::CsvDocument;

/// File name prefix of partner exports.
pub const PARTNER_EXPORT_FILE_PREFIX: &str = "partners";

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}

/// Renders partners with the import headers so an export can be re-imported.
pub(super) fn partners_document(partners: &[Partner]) -> CsvDocument {
    let mut document = CsvDocument::new(
        PARTNER_CSV_HEADERS
            .iter()
            .map(|header| (*header).to_owned())
            .collect(),
    );

    for partner in partners {
        let data = partner.data();
        document.push_row(vec![
            data.partner_name().to_owned(),
            text(data.partner_name_kana()),
            data.partner_type().label().to_owned(),
            text(data.contact_name()),
            text(data.tel_number()),
            data.email().to_owned(),
            text(data.postal_code()),
            text(data.state()),
            text(data.city()),
            text(data.address()),
            text(data.address2()),
            if partner.audit().is_deleted() { "1" } else { "0" }.to_owned(),
        ]);
    }

    document
}
