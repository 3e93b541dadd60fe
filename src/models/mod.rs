pub mod appointment;
pub mod conversation;
pub mod operation;
pub mod operation_result;

pub use appointment::{Appointment, AvailabilityQuery, EventType, OptimalDayQuery};
pub use conversation::{ConversationTurn, Session};
pub use operation::{catalogue, FunctionDefinition, Operation, ParamKind, ParameterSpec};
pub use operation_result::OperationResult;
