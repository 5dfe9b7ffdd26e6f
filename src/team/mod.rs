//! The router team: conversation state, the two-stage workflow graph and the
//! session that drives it from the console.
//!
//! A turn appends the user's message, asks the router which specialist should
//! answer, lets exactly that specialist respond (running its tools if the model
//! asks for them) and appends the answer.

pub mod session;
pub mod state;
pub mod workflow;

pub use session::{ConsoleInput, TeamSession, TurnReply};
pub use state::{ChatMessage, ChatRole, ConversationState};
pub use workflow::{Node, TeamWorkflow};
