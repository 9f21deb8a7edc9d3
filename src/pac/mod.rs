pub mod cache;
pub mod downloader;
pub mod engine;
pub mod result;

pub use downloader::load_pac;
pub use engine::PacEvaluator;
pub use result::{parse_pac_result, ProxyDirective};
