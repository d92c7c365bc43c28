use masterhub_core::AppError;
use masterhub_domain::{Partner, PartnerInput, PartnerType};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::AuditResponse;

/// Incoming payload for partner creation and update.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/partner-request.ts"
)]
pub struct PartnerRequest {
    pub partner_name: Option<String>,
    pub partner_name_kana: Option<String>,
    /// `customer`, `supplier`, `both` or one of their display labels.
    pub partner_type: Option<String>,
    pub contact_name: Option<String>,
    pub tel_number: Option<String>,
    pub email: Option<String>,
    pub postal_code: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub address2: Option<String>,
}

impl TryFrom<PartnerRequest> for PartnerInput {
    type Error = AppError;

    fn try_from(request: PartnerRequest) -> Result<Self, Self::Error> {
        let partner_type = match request
            .partner_type
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            Some(raw) => Some(
                raw.parse::<PartnerType>()
                    .ok()
                    .or_else(|| PartnerType::from_label(raw))
                    .ok_or_else(|| {
                        AppError::Validation(format!(
                            "partner_type: select a valid choice; '{raw}' is not one of the available choices"
                        ))
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            partner_name: request.partner_name,
            partner_name_kana: request.partner_name_kana,
            partner_type,
            contact_name: request.contact_name,
            tel_number: request.tel_number,
            email: request.email,
            postal_code: request.postal_code,
            state: request.state,
            city: request.city,
            address: request.address,
            address2: request.address2,
        })
    }
}

/// API representation of a partner.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/partner-response.ts"
)]
pub struct PartnerResponse {
    pub id: String,
    pub partner_name: String,
    pub partner_name_kana: Option<String>,
    pub partner_type: String,
    pub partner_type_label: String,
    pub contact_name: Option<String>,
    pub tel_number: Option<String>,
    pub email: String,
    pub postal_code: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub address2: Option<String>,
    #[serde(flatten)]
    pub audit: AuditResponse,
}

impl From<Partner> for PartnerResponse {
    fn from(partner: Partner) -> Self {
        let data = partner.data();
        Self {
            id: partner.id().to_string(),
            partner_name: data.partner_name().to_owned(),
            partner_name_kana: data.partner_name_kana().map(ToOwned::to_owned),
            partner_type: data.partner_type().as_str().to_owned(),
            partner_type_label: data.partner_type().label().to_owned(),
            contact_name: data.contact_name().map(ToOwned::to_owned),
            tel_number: data.tel_number().map(ToOwned::to_owned),
            email: data.email().to_owned(),
            postal_code: data.postal_code().map(ToOwned::to_owned),
            state: data.state().map(ToOwned::to_owned),
            city: data.city().map(ToOwned::to_owned),
            address: data.address().map(ToOwned::to_owned),
            address2: data.address2().map(ToOwned::to_owned),
            audit: AuditResponse::from(partner.audit()),
        }
    }
}
