mod page_extractor;

pub use page_extractor::{extract, PageRecordExtracted};
