use serde::Serialize;
use utoipa::ToSchema;

pub const DOCUMENT_ID_PREFIX: &str = "GUCCI-ID-";

/// Fully rendered task-detail document.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub header: HeaderBlock,
    pub account: AccountBlock,
    pub job_details: JobDetailsBlock,
    pub terms: TermsBlock,
    pub attention: AttentionBlock,
    pub footer: FooterBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HeaderBlock {
    #[schema(example = "DETAIL TUGAS PEKERJAAN")]
    pub title: String,
    #[schema(example = "GUCCI BUSINESS PROGRAM")]
    pub program: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountBlock {
    pub title: String,
    #[schema(example = "08123456789")]
    pub account_id: String,
    #[schema(example = "Rp150.000")]
    pub product_price: String,
    #[schema(example = "20%-50%")]
    pub commission: String,
    pub validity_label: String,
    #[schema(example = 60)]
    pub validity_minutes: u32,
    pub validity_unit: String,
    pub note: String,
}

impl AccountBlock {
    /// Label/value pairs of the summary panel, in display order.
    pub fn summary_rows(&self) -> [(&'static str, &str); 3] {
        [
            ("ID AKUN", self.account_id.as_str()),
            ("HARGA PRODUK", self.product_price.as_str()),
            ("KOMISI", self.commission.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct JobDetailsBlock {
    pub title: String,
    pub rows: Vec<JobDetailRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct JobDetailRow {
    #[schema(example = "Tugas")]
    pub label: String,
    pub value: String,
    /// Always "Done"; not a tracked state.
    #[schema(example = "Done")]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TermsBlock {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttentionBlock {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FooterBlock {
    #[schema(example = "19 Okt 2026, 09.41")]
    pub issued_at: String,
    pub label: String,
    /// Nine uppercase base-36 characters.
    #[schema(example = "K3J9Q0ZP1")]
    pub document_id: String,
}

impl FooterBlock {
    /// Single footer line as printed at the bottom of the document.
    pub fn line(&self) -> String {
        format!(
            "Issued: {} • {} • {}{}",
            self.issued_at, self.label, DOCUMENT_ID_PREFIX, self.document_id
        )
    }
}
