use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::{
    Appointment, AvailabilityQuery, EventType, Operation, OptimalDayQuery, Session,
};
use crate::services::ai::FunctionCall;
use crate::services::backend::AppointmentBackend;

pub const DEFAULT_APPOINTMENT_MINUTES: i64 = 60;
pub const DEFAULT_SLOT_COUNT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentArgs {
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindAvailabilityArgs {
    pub time_ranges: String,
    pub event_type: EventType,
    #[serde(default)]
    pub count: Option<u32>,
}

/// A model-selected operation with its arguments decoded and validated.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationCall {
    GetAppointments,
    BookAppointment(BookAppointmentArgs),
    FindAvailability(FindAvailabilityArgs),
    FindOptimalDays,
}

impl OperationCall {
    pub fn decode(call: &FunctionCall) -> Result<Self, AppError> {
        let operation = Operation::from_name(&call.name)
            .ok_or_else(|| AppError::UnknownOperation(call.name.clone()))?;

        let raw = match call.arguments.trim() {
            "" => "{}",
            raw => raw,
        };
        let value: Value =
            serde_json::from_str(raw).map_err(|e| AppError::argument_parse(operation.name(), e))?;
        if !value.is_object() {
            return Err(AppError::argument_parse(
                operation.name(),
                "arguments must be a JSON object",
            ));
        }

        let decoded = match operation {
            Operation::GetAppointments => OperationCall::GetAppointments,
            Operation::BookAppointment => OperationCall::BookAppointment(
                serde_json::from_value(value)
                    .map_err(|e| AppError::argument_parse(operation.name(), e))?,
            ),
            Operation::FindAvailability => OperationCall::FindAvailability(
                serde_json::from_value(value)
                    .map_err(|e| AppError::argument_parse(operation.name(), e))?,
            ),
            Operation::FindOptimalDays => OperationCall::FindOptimalDays,
        };

        Ok(decoded)
    }

    pub fn operation(&self) -> Operation {
        match self {
            OperationCall::GetAppointments => Operation::GetAppointments,
            OperationCall::BookAppointment(_) => Operation::BookAppointment,
            OperationCall::FindAvailability(_) => Operation::FindAvailability,
            OperationCall::FindOptimalDays => Operation::FindOptimalDays,
        }
    }

    /// Fills defaults and scopes the call to the session's agent and client.
    /// Ids the model may have produced are ignored.
    pub fn resolve(self, session: &Session) -> Result<OperationRequest, AppError> {
        let agent_id = session.agent_id().to_string();
        let client_id = session.client_id().to_string();

        let request = match self {
            OperationCall::GetAppointments => OperationRequest::ListAppointments {
                agent_id,
                client_id,
            },
            OperationCall::BookAppointment(args) => {
                let end_time = match args.end_time.filter(|t| !t.trim().is_empty()) {
                    Some(end) => end,
                    None => default_end_time(&args.start_time)?,
                };
                OperationRequest::BookAppointment(Appointment {
                    client_id,
                    agent_id,
                    start_time: args.start_time,
                    end_time,
                    title: args.title,
                    description: args.description,
                })
            }
            OperationCall::FindAvailability(args) => {
                let query = AvailabilityQuery {
                    agent_id,
                    client_id,
                    time_ranges: args.time_ranges,
                    event_type: args.event_type,
                    count: args.count.filter(|c| *c > 0).unwrap_or(DEFAULT_SLOT_COUNT),
                };
                if query.ranges().next().is_none() {
                    return Err(AppError::argument_parse(
                        Operation::FindAvailability.name(),
                        "timeRanges must contain at least one start|end pair",
                    ));
                }
                OperationRequest::FindAvailability(query)
            }
            OperationCall::FindOptimalDays => OperationRequest::FindOptimalDays(OptimalDayQuery {
                agent_id,
                client_id,
                start_date: None,
                end_date: None,
            }),
        };

        Ok(request)
    }
}

/// Start time plus the default appointment length, in the same style as the input.
pub fn default_end_time(start_time: &str) -> Result<String, AppError> {
    let length = Duration::minutes(DEFAULT_APPOINTMENT_MINUTES);

    if let Ok(start) = DateTime::parse_from_rfc3339(start_time) {
        return Ok((start + length).to_rfc3339_opts(SecondsFormat::AutoSi, true));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(start) = NaiveDateTime::parse_from_str(start_time, format) {
            return Ok((start + length).format("%Y-%m-%dT%H:%M:%S").to_string());
        }
    }

    Err(AppError::argument_parse(
        Operation::BookAppointment.name(),
        format!("startTime {start_time:?} is not an ISO 8601 timestamp"),
    ))
}

/// A fully resolved backend request, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRequest {
    ListAppointments { agent_id: String, client_id: String },
    BookAppointment(Appointment),
    FindAvailability(AvailabilityQuery),
    FindOptimalDays(OptimalDayQuery),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationOutcome {
    pub operation: Operation,
    pub success: bool,
    /// The serialized result envelope, as handed back to the model.
    pub content: String,
}

impl OperationRequest {
    pub fn operation(&self) -> Operation {
        match self {
            OperationRequest::ListAppointments { .. } => Operation::GetAppointments,
            OperationRequest::BookAppointment(_) => Operation::BookAppointment,
            OperationRequest::FindAvailability(_) => Operation::FindAvailability,
            OperationRequest::FindOptimalDays(_) => Operation::FindOptimalDays,
        }
    }

    pub async fn execute(
        &self,
        backend: &dyn AppointmentBackend,
    ) -> Result<OperationOutcome, AppError> {
        let (success, content) = match self {
            OperationRequest::ListAppointments {
                agent_id,
                client_id,
            } => {
                let result = backend.list_appointments(agent_id, client_id).await;
                (result.success, serde_json::to_string(&result)?)
            }
            OperationRequest::BookAppointment(appointment) => {
                let result = backend.book_appointment(appointment).await;
                (result.success, serde_json::to_string(&result)?)
            }
            OperationRequest::FindAvailability(query) => {
                let result = backend.find_availability(query).await;
                (result.success, serde_json::to_string(&result)?)
            }
            OperationRequest::FindOptimalDays(query) => {
                let result = backend.find_optimal_days(query).await;
                (result.success, serde_json::to_string(&result)?)
            }
        };

        tracing::info!(operation = %self.operation(), success, "operation executed");

        Ok(OperationOutcome {
            operation: self.operation(),
            success,
            content,
        })
    }
}
