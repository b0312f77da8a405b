pub mod http;
pub mod job;
pub mod service;
pub mod worker;

pub use http::HttpGlossService;
pub use job::poll_until_terminal;
pub use service::{parse_execution_output, ExecutionDescription, ExecutionHandle, GlossService};
pub use worker::TranslationWorker;
