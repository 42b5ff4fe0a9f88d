//! Dashboard domain services.
//!
//! Each dashboard is one aggregate read plus the paginated list shown under
//! the stat cards, gated on the viewer's role.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::access::{require_developer, require_organizer, require_tourist};
use crate::domain::ports::{
    BookingSummaryPayload, DashboardPersistenceError, DashboardQuery, DashboardRepository,
    DeveloperDashboardRequest, DeveloperDashboardResponse, OrganizerDashboardRequest,
    OrganizerDashboardResponse, OrganizerStatsPayload, PlatformStatsPayload, TourCardPayload,
    TouristDashboardRequest, TouristDashboardResponse, TouristStatsPayload, UserRepository,
};
use crate::domain::Error;

fn map_dashboard_error(error: DashboardPersistenceError) -> Error {
    match error {
        DashboardPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("dashboard repository unavailable: {message}"))
        }
        DashboardPersistenceError::Query { message } => {
            Error::internal(format!("dashboard repository error: {message}"))
        }
    }
}

/// Dashboard reads over the aggregation and user repositories.
#[derive(Clone)]
pub struct DashboardQueryService<D, U> {
    dashboards: Arc<D>,
    users: Arc<U>,
}

impl<D, U> DashboardQueryService<D, U> {
    /// Create a new dashboard query service.
    pub fn new(dashboards: Arc<D>, users: Arc<U>) -> Self {
        Self { dashboards, users }
    }
}

#[async_trait]
impl<D, U> DashboardQuery for DashboardQueryService<D, U>
where
    D: DashboardRepository,
    U: UserRepository,
{
    async fn tourist_dashboard(
        &self,
        request: TouristDashboardRequest,
    ) -> Result<TouristDashboardResponse, Error> {
        require_tourist(self.users.as_ref(), &request.tourist_id).await?;
        let stats = self
            .dashboards
            .tourist_stats(&request.tourist_id)
            .await
            .map_err(map_dashboard_error)?;
        let page = PageRequest::new(request.page, request.per_page);
        let bookings = self
            .dashboards
            .tourist_recent_bookings(&request.tourist_id, page)
            .await
            .map_err(map_dashboard_error)?;
        Ok(TouristDashboardResponse {
            stats: TouristStatsPayload::from(stats),
            recent_bookings: bookings.map(BookingSummaryPayload::from),
        })
    }

    async fn organizer_dashboard(
        &self,
        request: OrganizerDashboardRequest,
    ) -> Result<OrganizerDashboardResponse, Error> {
        require_organizer(self.users.as_ref(), &request.organizer_id).await?;
        let stats = self
            .dashboards
            .organizer_stats(&request.organizer_id)
            .await
            .map_err(map_dashboard_error)?;
        let page = PageRequest::new(request.page, request.per_page);
        let tours = self
            .dashboards
            .organizer_tours(&request.organizer_id, page)
            .await
            .map_err(map_dashboard_error)?;
        Ok(OrganizerDashboardResponse {
            stats: OrganizerStatsPayload::from(stats),
            tours: tours.map(TourCardPayload::from),
        })
    }

    async fn developer_dashboard(
        &self,
        request: DeveloperDashboardRequest,
    ) -> Result<DeveloperDashboardResponse, Error> {
        require_developer(self.users.as_ref(), &request.developer_id).await?;
        let stats = self
            .dashboards
            .platform_stats()
            .await
            .map_err(map_dashboard_error)?;
        // The user and tour lists page independently under one page size.
        let users_page = PageRequest::new(request.users_page, request.per_page);
        let recent_users = self
            .dashboards
            .recent_users(users_page)
            .await
            .map_err(map_dashboard_error)?;
        let tours_page = PageRequest::new(request.tours_page, request.per_page);
        let recent_tours = self
            .dashboards
            .recent_tours(tours_page)
            .await
            .map_err(map_dashboard_error)?;
        Ok(DeveloperDashboardResponse {
            stats: PlatformStatsPayload::from(stats),
            recent_users,
            recent_tours: recent_tours.map(TourCardPayload::from),
        })
    }
}

#[cfg(test)]
#[path = "dashboard_service_tests.rs"]
mod tests;
