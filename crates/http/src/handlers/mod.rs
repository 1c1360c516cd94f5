pub mod attachments;
pub mod notes;
pub mod timeline;
