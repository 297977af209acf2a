//! Port definitions implemented by the runtime and adapters.

mod output_sink;

pub use output_sink::{NoopSink, OutputLine, OutputSink, OutputStream};
