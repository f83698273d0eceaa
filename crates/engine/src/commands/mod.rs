mod context;
mod cycle;
mod dispatcher;
mod issuer;
mod mode;
mod view;

pub use context::{CommandContext, MessageLog, MessageSink};
pub use cycle::{base_candidates, cycle_to, production_candidates};
pub use dispatcher::CommandDispatcher;
pub use issuer::{issue_for_selection, DEPLOY_ORDER_SEQUENCE};
pub use mode::enter_mode;
