use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use super::AppointmentBackend;
use crate::errors::AppError;
use crate::models::{Appointment, AvailabilityQuery, Operation, OperationResult, OptimalDayQuery};

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<OperationResult<T>, AppError> {
        let resp = request
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            // Prefer the backend's own explanation when the body is an envelope.
            let cause = serde_json::from_str::<OperationResult<serde_json::Value>>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| format!("backend returned {status}"));
            tracing::warn!(%status, "backend rejected request");
            return Ok(OperationResult::failure(cause));
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::Transport(format!("malformed response: {e}")))
    }
}

fn settle<T>(
    operation: Operation,
    outcome: Result<OperationResult<T>, AppError>,
) -> OperationResult<T> {
    match outcome {
        Ok(result) => result.normalize(operation.name()),
        Err(e) => {
            tracing::error!(operation = %operation, error = %e, "backend call failed");
            OperationResult::failure(format!("{operation}: {e}"))
        }
    }
}

#[async_trait]
impl AppointmentBackend for HttpBackend {
    async fn list_appointments(
        &self,
        agent_id: &str,
        client_id: &str,
    ) -> OperationResult<Vec<Appointment>> {
        let request = self
            .client
            .get(self.url("/api/appointments"))
            .query(&[("agentId", agent_id), ("clientId", client_id)]);

        settle(Operation::GetAppointments, self.fetch(request).await)
    }

    async fn book_appointment(&self, appointment: &Appointment) -> OperationResult<Appointment> {
        let request = self
            .client
            .post(self.url("/api/appointments/book"))
            .json(appointment);

        settle(Operation::BookAppointment, self.fetch(request).await)
    }

    async fn find_availability(&self, query: &AvailabilityQuery) -> OperationResult<Vec<String>> {
        let count = query.count.to_string();
        let request = self.client.get(self.url("/api/availability")).query(&[
            ("agentId", query.agent_id.as_str()),
            ("clientId", query.client_id.as_str()),
            ("eventType", query.event_type.as_str()),
            ("timeRanges", query.time_ranges.as_str()),
            ("count", count.as_str()),
        ]);

        settle(Operation::FindAvailability, self.fetch(request).await)
    }

    async fn find_optimal_days(&self, query: &OptimalDayQuery) -> OperationResult<Vec<String>> {
        let mut params = vec![
            ("agentId", query.agent_id.as_str()),
            ("clientId", query.client_id.as_str()),
        ];
        if let Some(start) = &query.start_date {
            params.push(("startDate", start.as_str()));
        }
        if let Some(end) = &query.end_date {
            params.push(("endDate", end.as_str()));
        }

        let request = self
            .client
            .get(self.url("/api/availability/optimal-days"))
            .query(&params);

        settle(Operation::FindOptimalDays, self.fetch(request).await)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::models::EventType;

    // Nothing listens on port 1, so every request is refused.
    const UNREACHABLE: &str = "http://127.0.0.1:1";

    fn appointment() -> Appointment {
        Appointment {
            client_id: "1".to_string(),
            agent_id: "1".to_string(),
            start_time: "2025-04-28T10:00:00".to_string(),
            end_time: "2025-04-28T11:00:00".to_string(),
            title: "Showing at 12 Elm St".to_string(),
            description: None,
        }
    }

    fn availability_query() -> AvailabilityQuery {
        AvailabilityQuery {
            agent_id: "1".to_string(),
            client_id: "1".to_string(),
            time_ranges: "2025-04-28T00:00:00|2025-04-28T23:59:59".to_string(),
            event_type: EventType::Showing,
            count: 3,
        }
    }

    fn optimal_query() -> OptimalDayQuery {
        OptimalDayQuery {
            agent_id: "1".to_string(),
            client_id: "1".to_string(),
            start_date: None,
            end_date: None,
        }
    }

    fn assert_failed_with<T: std::fmt::Debug>(result: &OperationResult<T>, operation: &str) {
        assert!(!result.success, "expected failure, got {result:?}");
        assert!(result.data.is_none());
        let error = result.error.as_deref().unwrap_or_default();
        assert!(error.contains(operation), "error {error:?} should name {operation}");
    }

    #[tokio::test]
    async fn test_transport_failures_never_raise() {
        let backend = HttpBackend::new(UNREACHABLE.to_string());

        let listed = backend.list_appointments("1", "1").await;
        assert_failed_with(&listed, "get_appointments");

        let booked = backend.book_appointment(&appointment()).await;
        assert_failed_with(&booked, "book_appointment");

        let slots = backend.find_availability(&availability_query()).await;
        assert_failed_with(&slots, "find_availability");

        let days = backend.find_optimal_days(&optimal_query()).await;
        assert_failed_with(&days, "find_optimal_days");
    }

    #[tokio::test]
    async fn test_list_appointments_sends_scope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/appointments")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("agentId".into(), "3".into()),
                Matcher::UrlEncoded("clientId".into(), "8".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success":true,"data":[{"clientId":"8","agentId":"3","startTime":"2025-04-28T10:00:00","endTime":"2025-04-28T11:00:00","title":"Showing"}]}"#,
            )
            .create_async()
            .await;

        let backend = HttpBackend::new(server.url());
        let result = backend.list_appointments("3", "8").await;

        assert!(result.success);
        let data = result.data.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].title, "Showing");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_book_appointment_posts_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/appointments/book")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "startTime": "2025-04-28T10:00:00",
                "endTime": "2025-04-28T11:00:00",
                "title": "Showing at 12 Elm St",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success":true,"data":{"clientId":"1","agentId":"1","startTime":"2025-04-28T10:00:00","endTime":"2025-04-28T11:00:00","title":"Showing at 12 Elm St"}}"#,
            )
            .create_async()
            .await;

        let backend = HttpBackend::new(server.url());
        let result = backend.book_appointment(&appointment()).await;

        assert!(result.success);
        assert_eq!(result.data, Some(appointment()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_conflict_status_uses_backend_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/appointments/book")
            .with_status(409)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":false,"error":"Time slot is already booked"}"#)
            .create_async()
            .await;

        let backend = HttpBackend::new(server.url());
        let result = backend.book_appointment(&appointment()).await;

        assert_eq!(
            result.error.as_deref(),
            Some("book_appointment: Time slot is already booked")
        );
    }

    #[tokio::test]
    async fn test_server_error_without_envelope() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/availability")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let backend = HttpBackend::new(server.url());
        let result = backend.find_availability(&availability_query()).await;

        assert_failed_with(&result, "find_availability");
        assert!(result.error.unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_find_availability_query_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/availability")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("eventType".into(), "showing".into()),
                Matcher::UrlEncoded(
                    "timeRanges".into(),
                    "2025-04-28T00:00:00|2025-04-28T23:59:59".into(),
                ),
                Matcher::UrlEncoded("count".into(), "3".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"data":["2025-04-28T09:00:00|2025-04-28T10:00:00"]}"#)
            .create_async()
            .await;

        let backend = HttpBackend::new(server.url());
        let result = backend.find_availability(&availability_query()).await;

        assert_eq!(
            result.data,
            Some(vec!["2025-04-28T09:00:00|2025-04-28T10:00:00".to_string()])
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_failed_result() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/availability/optimal-days")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let backend = HttpBackend::new(server.url());
        let result = backend.find_optimal_days(&optimal_query()).await;

        assert_failed_with(&result, "find_optimal_days");
        assert!(result.error.unwrap().contains("malformed response"));
    }

    #[tokio::test]
    async fn test_optimal_days_order_is_preserved() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/availability/optimal-days")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("agentId".into(), "1".into()),
                Matcher::UrlEncoded("clientId".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"data":["2025-05-17","2025-05-03","2025-05-10"]}"#)
            .create_async()
            .await;

        let backend = HttpBackend::new(server.url());
        let result = backend.find_optimal_days(&optimal_query()).await;

        assert_eq!(
            result.data,
            Some(vec![
                "2025-05-17".to_string(),
                "2025-05-03".to_string(),
                "2025-05-10".to_string(),
            ])
        );
    }
}
