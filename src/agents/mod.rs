//! Agents of the router team.
//!
//! - [`RouterAgent`] - Classifies a query into an [`AgentKind`]
//! - [`SpecialistAgent`] - Answers a routed query with the tools of its kind
//! - [`SingleAgent`] - Stand-alone assistant holding every tool
//! - [`PoemChain`] - Poem then sentiment analysis, one trace per run

pub mod agent_kind;
pub mod poem_chain;
pub mod router_agent;
pub mod single_agent;
pub mod specialist_agent;

pub use agent_kind::AgentKind;
pub use poem_chain::{PoemAnalysis, PoemChain, POEM_CHAIN_NAME};
pub use router_agent::RouterAgent;
pub use single_agent::SingleAgent;
pub use specialist_agent::SpecialistAgent;
