//! Tracer system for observability and debugging
//!
//! Records LLM calls, LLM responses, tool executions and agent hand-offs with
//! timestamps and correlation IDs. Every console turn gets its own correlation id,
//! so all events caused by one user utterance can be pulled back out together and,
//! when configured, published as a run tree through [`TraceSink`].
//!
//! # Components
//!
//! - **TracerEvent**: Base trait for all event types
//! - **EventStore**: Thread-safe storage for events with filtering
//! - **TracerSystem**: Convenience layer for recording and querying events
//! - **TraceSink**: HTTP publisher for LangSmith-compatible run trees
//! - **TracedRuns**: Runs one unit of work per correlation id and publishes it as one trace
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use agent_team::tracer::TracerSystem;
//!
//! let tracer = TracerSystem::default();
//! tracer.record_agent_interaction("router", "math", "dispatch", None, "workflow", "turn-1");
//!
//! for summary in tracer.get_last_n_summaries(10, None) {
//!     println!("{}", summary);
//! }
//! ```

pub mod event_store;
pub mod trace_sink;
pub mod traced_runs;
pub mod tracer_events;
pub mod tracer_system;

pub use event_store::EventStore;
pub use trace_sink::{RunSummary, TraceSink};
pub use traced_runs::TracedRuns;
pub use tracer_events::{
    AgentInteractionTracerEvent, EventFilterFn, LlmCallTracerEvent, LlmResponseTracerEvent,
    ToolCallTracerEvent, TracerEvent, TracerRecord,
};
pub use tracer_system::{current_timestamp, TracerSystem};
