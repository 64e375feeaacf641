//! Custom extractors.

mod page;
mod validated_form;

pub use page::Page;
pub use validated_form::{FormErrors, ValidatedForm};
