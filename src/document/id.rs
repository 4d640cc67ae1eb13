//! Document identifier sources for the footer.

use rand::Rng;

pub const DOCUMENT_ID_LEN: usize = 9;

const BASE36_UPPER: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Supplies the footer identifier for each render.
pub trait DocumentIdSource: Send + Sync {
    fn next_id(&self) -> String;
}

/// Fresh random identifier on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomDocumentId;

impl DocumentIdSource for RandomDocumentId {
    fn next_id(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..DOCUMENT_ID_LEN)
            .map(|_| BASE36_UPPER[rng.gen_range(0..BASE36_UPPER.len())] as char)
            .collect()
    }
}

/// Returns the same identifier every time.
#[derive(Debug, Clone)]
pub struct FixedDocumentId(pub String);

impl DocumentIdSource for FixedDocumentId {
    fn next_id(&self) -> String {
        self.0.clone()
    }
}

/// True for nine uppercase base-36 characters.
pub fn is_valid_document_id(id: &str) -> bool {
    id.len() == DOCUMENT_ID_LEN && id.bytes().all(|b| BASE36_UPPER.contains(&b))
}
