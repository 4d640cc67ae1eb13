//! Maps a task record onto the fixed task-detail layout.

use super::id::DocumentIdSource;
use super::view::{
    AccountBlock, AttentionBlock, DocumentView, FooterBlock, HeaderBlock, JobDetailRow,
    JobDetailsBlock, TermsBlock,
};
use crate::formatter::format_currency;
use crate::task::TaskRecord;

pub const TITLE: &str = "DETAIL TUGAS PEKERJAAN";
pub const PROGRAM_LABEL: &str = "GUCCI BUSINESS PROGRAM";
pub const COMMISSION_RANGE: &str = "20%-50%";
pub const VALIDITY_MINUTES: u32 = 60;
pub const DONE_MARKER: &str = "Done";

const VALIDITY_LABEL: &str = "MASA BERLAKU TUGAS PESANAN";
const VALIDITY_UNIT: &str = "MENIT";
const ACCOUNT_NOTE: &str = "Pastikan sudah sesuai dengan pilihan";
const FOOTER_LABEL: &str = "Secure Document";

/// Label of the only data-driven job-details row.
pub const TASK_ROW_LABEL: &str = "Tugas";

const TERMS: [&str; 5] = [
    "Detail Tugas ini merupakan bagian dari perjanjian antara Pengguna dan Pihak Gucci Sistem.",
    "Setiap dana yang dikirim oleh Pengguna kepada Pihak Sistem Gruci akan secara otomatis dikonversi menjadi Saldo Akun Kerja milik Pengguna.",
    "Seluruh proses pelaksanaan tugas dilaksanakan sesuai dengan prosedur dan ketentuan yang berlaku pada Sistem Gucci.",
    "Dengan melakukan aktivasi tugas, Pengguna menyatakan telah membaca, memahami, dan menyetujui seluruh isi perjanjian, termasuk ketentuan mengenai konversi dana menjadi saldo akun kerja serta mekanisme penyelesaian tugas.",
    "Dokumen ini berlaku sebagai bukti sah persetujuan antara Pengguna dan Pihak Sistem Gucci tanpa memerlukan tanda tangan tertulis.",
];

const ATTENTION: &str = "Sistem akan menyelesaikan tugas pekerjaan secara otomatis, pengguna hanya perlu menunggu sesuai waktu yang ditentukan.";

/// Render the document for `record`.
///
/// Everything except the footer identifier is derived from `record` and
/// fixed text, so two renders with the same id source are equal.
pub fn render(record: &TaskRecord, ids: &dyn DocumentIdSource) -> DocumentView {
    DocumentView {
        header: HeaderBlock {
            title: TITLE.to_string(),
            program: PROGRAM_LABEL.to_string(),
        },
        account: AccountBlock {
            title: "Account".to_string(),
            account_id: record.phone_number().to_string(),
            product_price: format_currency(record.product_price()),
            commission: COMMISSION_RANGE.to_string(),
            validity_label: VALIDITY_LABEL.to_string(),
            validity_minutes: VALIDITY_MINUTES,
            validity_unit: VALIDITY_UNIT.to_string(),
            note: ACCOUNT_NOTE.to_string(),
        },
        job_details: JobDetailsBlock {
            title: "Job Details".to_string(),
            rows: job_rows(record),
        },
        terms: TermsBlock {
            title: "Please Read".to_string(),
            items: TERMS.iter().map(|t| t.to_string()).collect(),
        },
        attention: AttentionBlock {
            title: "Attention".to_string(),
            message: ATTENTION.to_string(),
        },
        footer: FooterBlock {
            issued_at: record.generated_at().to_string(),
            label: FOOTER_LABEL.to_string(),
            document_id: ids.next_id(),
        },
    }
}

fn job_rows(record: &TaskRecord) -> Vec<JobDetailRow> {
    [
        ("Ketentuan", "Pesanan diterbitkan oleh sistem"),
        ("Proses", "Sistem akan memproses tugas otomatis"),
        (TASK_ROW_LABEL, record.job_category().description()),
        (
            "Penyelesaian",
            "Jika pesanan belum selesai, sistem tidak mengizinkan penarikan.",
        ),
        (
            "Konfirmasi",
            "Hubungi mentor jika terdapat kendala penyelesaian tugas.",
        ),
    ]
    .into_iter()
    .map(|(label, value)| JobDetailRow {
        label: label.to_string(),
        value: value.to_string(),
        status: DONE_MARKER.to_string(),
    })
    .collect()
}
