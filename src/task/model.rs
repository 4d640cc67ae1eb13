use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Job category chosen on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobCategory {
    #[default]
    Single,
    Triple,
    Quad,
    Penta,
}

impl JobCategory {
    pub const ALL: [JobCategory; 4] = [
        JobCategory::Single,
        JobCategory::Triple,
        JobCategory::Quad,
        JobCategory::Penta,
    ];

    /// Text printed verbatim in the "Tugas" row of the document.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Single => "Satu pesanan satu produk total satu pesanan",
            Self::Triple => "Satu pesanan tiga produk total tiga pesanan",
            Self::Quad => "Satu pesanan empat produk total empat pesanan",
            Self::Penta => "Satu pesanan lima produk total lima pesanan",
        }
    }

    /// Short label used by the form's select box.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "1 Pesanan - 1 Produk",
            Self::Triple => "1 Pesanan - 3 Produk",
            Self::Quad => "1 Pesanan - 4 Produk",
            Self::Penta => "1 Pesanan - 5 Produk",
        }
    }

    /// Wire value, as used in JSON bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::Triple => "TRIPLE",
            Self::Quad => "QUAD",
            Self::Penta => "PENTA",
        }
    }
}

/// Immutable snapshot of one form submission.
///
/// Fields are private; a record is only ever built by
/// [`TaskGenerator`](super::TaskGenerator) and read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[schema(example = "08123456789")]
    phone_number: String,
    job_category: JobCategory,
    #[schema(example = 150000.0)]
    product_price: f64,
    #[schema(example = "19 Okt 2026, 09.41")]
    generated_at: String,
}

impl TaskRecord {
    pub(crate) fn new(
        phone_number: String,
        job_category: JobCategory,
        product_price: f64,
        generated_at: String,
    ) -> Self {
        Self {
            phone_number,
            job_category,
            product_price,
            generated_at,
        }
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn job_category(&self) -> JobCategory {
        self.job_category
    }

    pub fn product_price(&self) -> f64 {
        self.product_price
    }

    pub fn generated_at(&self) -> &str {
        &self.generated_at
    }
}

/// One option of the job category select box.
#[derive(Debug, Serialize, ToSchema)]
pub struct JobTypeOption {
    #[schema(example = "SINGLE")]
    pub value: JobCategory,
    #[schema(example = "1 Pesanan - 1 Produk")]
    pub label: String,
    pub description: String,
}

impl From<JobCategory> for JobTypeOption {
    fn from(category: JobCategory) -> Self {
        Self {
            value: category,
            label: category.label().to_string(),
            description: category.description().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_category_wire_values() {
        for category in JobCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            let back: JobCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
        }
    }

    #[test]
    fn test_job_category_default_is_single() {
        assert_eq!(JobCategory::default(), JobCategory::Single);
        assert_eq!(JobCategory::ALL[0], JobCategory::Single);
    }

    #[test]
    fn test_unknown_job_category_rejected() {
        let result: Result<JobCategory, _> = serde_json::from_str("\"HEXA\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_task_record_serializes_camel_case() {
        let record = TaskRecord::new(
            "08123456789".to_string(),
            JobCategory::Quad,
            150000.0,
            "19 Okt 2026, 09.41".to_string(),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["phoneNumber"], "08123456789");
        assert_eq!(value["jobCategory"], "QUAD");
        assert_eq!(value["productPrice"], 150000.0);
        assert_eq!(value["generatedAt"], "19 Okt 2026, 09.41");
    }
}
