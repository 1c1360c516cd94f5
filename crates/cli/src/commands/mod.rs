pub mod history;
pub mod migrate;
pub mod serve;
pub mod timeline;
