//! Builds task records from form input.

use chrono::{DateTime, FixedOffset, Local};

use super::model::{JobCategory, TaskRecord};
use super::validation::{
    parse_price, validate_present, validate_required, ValidationError, FIELD_PHONE_NUMBER,
    FIELD_PRODUCT_PRICE,
};
use crate::formatter::format_generated_at;

/// Source of the generation timestamp.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the machine's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

pub struct TaskGenerator {
    clock: Box<dyn Clock>,
}

impl Default for TaskGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskGenerator {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
        }
    }

    /// Check the form input and return the parsed price.
    ///
    /// Required fields are checked before the price is parsed, phone number
    /// first. The phone number only has to be non-empty and is kept verbatim.
    pub fn validate(&self, phone_number: &str, raw_price: &str) -> Result<f64, ValidationError> {
        validate_present(phone_number, FIELD_PHONE_NUMBER, "Nomor Telepon")?;
        validate_required(raw_price, FIELD_PRODUCT_PRICE, "Harga Produk")?;
        parse_price(raw_price, FIELD_PRODUCT_PRICE)
    }

    /// Validate the form input and stamp a fresh record.
    pub fn generate(
        &self,
        phone_number: &str,
        job_category: JobCategory,
        raw_price: &str,
    ) -> Result<TaskRecord, ValidationError> {
        let product_price = self.validate(phone_number, raw_price)?;
        let generated_at = format_generated_at(&self.clock.now());

        log::debug!(
            "generated task record for {} ({}) at {}",
            phone_number,
            job_category.as_str(),
            generated_at
        );

        Ok(TaskRecord::new(
            phone_number.to_string(),
            job_category,
            product_price,
            generated_at,
        ))
    }
}
