use serde_json::{json, Map, Value};

/// The fixed set of backend operations the model may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetAppointments,
    BookAppointment,
    FindAvailability,
    FindOptimalDays,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::GetAppointments,
        Operation::BookAppointment,
        Operation::FindAvailability,
        Operation::FindOptimalDays,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::GetAppointments => "get_appointments",
            Operation::BookAppointment => "book_appointment",
            Operation::FindAvailability => "find_availability",
            Operation::FindOptimalDays => "find_optimal_days",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    pub fn definition(&self) -> FunctionDefinition {
        match self {
            Operation::GetAppointments => FunctionDefinition {
                name: self.name(),
                description: "Get all appointments for the agent",
                parameters: &[
                    ParameterSpec {
                        name: "agentId",
                        kind: ParamKind::String,
                        description: "ID of the agent to get appointments for",
                        required: true,
                    },
                    ParameterSpec {
                        name: "clientId",
                        kind: ParamKind::String,
                        description: "ID of the client to get appointments for",
                        required: true,
                    },
                ],
            },
            Operation::BookAppointment => FunctionDefinition {
                name: self.name(),
                description: "Book an appointment for a client at a specific time",
                parameters: &[
                    ParameterSpec {
                        name: "startTime",
                        kind: ParamKind::String,
                        description: "ISO 8601 format start time for the appointment",
                        required: true,
                    },
                    ParameterSpec {
                        name: "endTime",
                        kind: ParamKind::String,
                        description: "ISO 8601 format end time for the appointment",
                        required: false,
                    },
                    ParameterSpec {
                        name: "title",
                        kind: ParamKind::String,
                        description: "Title of the appointment",
                        required: true,
                    },
                    ParameterSpec {
                        name: "description",
                        kind: ParamKind::String,
                        description: "Optional description of the appointment",
                        required: false,
                    },
                ],
            },
            Operation::FindAvailability => FunctionDefinition {
                name: self.name(),
                description: "Find available time slots for appointments",
                parameters: &[
                    ParameterSpec {
                        name: "timeRanges",
                        kind: ParamKind::String,
                        description: "Time ranges to check for availability, each as ISO 8601 start|end, separated by commas",
                        required: true,
                    },
                    ParameterSpec {
                        name: "eventType",
                        kind: ParamKind::String,
                        description: "Type of event - showing, call or meeting",
                        required: true,
                    },
                    ParameterSpec {
                        name: "count",
                        kind: ParamKind::Integer,
                        description: "Number of available slots to return",
                        required: false,
                    },
                ],
            },
            Operation::FindOptimalDays => FunctionDefinition {
                name: self.name(),
                description: "Find optimal days for reconnecting with clients or doing work",
                parameters: &[],
            },
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
    pub required: bool,
}

/// Catalogue entry presented to the model on every first-phase call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ParameterSpec],
}

impl FunctionDefinition {
    /// Renders the parameters as a JSON-schema object.
    pub fn schema(&self) -> Value {
        let mut properties = Map::new();
        for param in self.parameters {
            properties.insert(
                param.name.to_string(),
                json!({
                    "type": param.kind.as_str(),
                    "description": param.description,
                }),
            );
        }

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

pub fn catalogue() -> Vec<FunctionDefinition> {
    Operation::ALL.iter().map(Operation::definition).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.name()), Some(op));
        }
        assert_eq!(Operation::from_name("cancel_appointment"), None);
    }

    #[test]
    fn test_booking_schema_required_subset() {
        let schema = Operation::BookAppointment.definition().schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["startTime", "title"]));
        assert_eq!(schema["properties"]["endTime"]["type"], "string");
    }

    #[test]
    fn test_optimal_days_has_empty_schema() {
        let schema = Operation::FindOptimalDays.definition().schema();
        assert_eq!(schema["properties"], json!({}));
        assert_eq!(schema["required"], json!([]));
    }

    #[test]
    fn test_catalogue_lists_every_operation_once() {
        let names: Vec<_> = catalogue().iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "get_appointments",
                "book_appointment",
                "find_availability",
                "find_optimal_days"
            ]
        );
    }
}
