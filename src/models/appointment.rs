use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub client_id: String,
    pub agent_id: String,
    pub start_time: String,
    pub end_time: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Showing,
    Call,
    Meeting,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Showing => "showing",
            EventType::Call => "call",
            EventType::Meeting => "meeting",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `time_ranges` holds one or more `start|end` pairs separated by commas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub agent_id: String,
    pub client_id: String,
    pub time_ranges: String,
    pub event_type: EventType,
    pub count: u32,
}

impl AvailabilityQuery {
    pub fn ranges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.time_ranges
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .filter_map(|r| r.split_once('|'))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OptimalDayQuery {
    pub agent_id: String,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appointment_uses_camel_case_fields() {
        let appointment = Appointment {
            client_id: "1".to_string(),
            agent_id: "2".to_string(),
            start_time: "2025-04-28T10:00:00".to_string(),
            end_time: "2025-04-28T11:00:00".to_string(),
            title: "Showing at Elm St".to_string(),
            description: None,
        };

        let json = serde_json::to_value(&appointment).unwrap();
        assert_eq!(json["clientId"], "1");
        assert_eq!(json["agentId"], "2");
        assert_eq!(json["startTime"], "2025-04-28T10:00:00");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_event_type_rejects_unknown_values() {
        let parsed: EventType = serde_json::from_str("\"showing\"").unwrap();
        assert_eq!(parsed, EventType::Showing);
        assert!(serde_json::from_str::<EventType>("\"party\"").is_err());
    }

    #[test]
    fn test_availability_ranges_split() {
        let query = AvailabilityQuery {
            agent_id: "1".to_string(),
            client_id: "1".to_string(),
            time_ranges: "2025-05-03T00:00:00|2025-05-03T23:59:59, 2025-05-04T00:00:00|2025-05-04T23:59:59".to_string(),
            event_type: EventType::Meeting,
            count: 3,
        };

        let ranges: Vec<_> = query.ranges().collect();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1], ("2025-05-04T00:00:00", "2025-05-04T23:59:59"));
    }
}
