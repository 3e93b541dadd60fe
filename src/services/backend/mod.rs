pub mod http;

use async_trait::async_trait;

use crate::models::{Appointment, AvailabilityQuery, OperationResult, OptimalDayQuery};

/// Gateway to the appointments REST backend.
///
/// Implementations never fail: transport and decoding problems come back as a
/// failed [`OperationResult`] whose error names the operation.
#[async_trait]
pub trait AppointmentBackend: Send + Sync {
    async fn list_appointments(
        &self,
        agent_id: &str,
        client_id: &str,
    ) -> OperationResult<Vec<Appointment>>;

    async fn book_appointment(&self, appointment: &Appointment) -> OperationResult<Appointment>;

    async fn find_availability(&self, query: &AvailabilityQuery) -> OperationResult<Vec<String>>;

    /// Returned dates are ordered by preference.
    async fn find_optimal_days(&self, query: &OptimalDayQuery) -> OperationResult<Vec<String>>;
}
