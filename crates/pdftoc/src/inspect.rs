use std::path::Path;

use crate::prelude::*;

pub fn page_empty(file: &Path) -> Result<bool> {
    pdf::first_page_is_empty(file).with_context(|| f!("failed to read {}", file.display()))
}

pub fn text_in_page(file: &Path, text: &str) -> Result<bool> {
    pdf::first_page_contains(file, text).with_context(|| f!("failed to read {}", file.display()))
}
