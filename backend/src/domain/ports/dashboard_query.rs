//! Driving port for the three role dashboards.
//!
//! Each dashboard is one request: the stat cards plus the list shown under
//! them, so the page renders from a single response.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, User, UserId};

use super::booking_query::BookingSummaryPayload;
use super::catalog_query::TourCardPayload;
use super::dashboard_repository::{OrganizerStats, PlatformStats, TouristStats};
use super::fixtures;

fn revenue_string(revenue: BigDecimal) -> String {
    revenue.with_scale(2).to_string()
}

/// Stat cards on the tourist dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouristStatsPayload {
    pub total_bookings: i64,
    pub upcoming_bookings: i64,
    pub wishlist_count: i64,
    pub review_count: i64,
}

impl From<TouristStats> for TouristStatsPayload {
    fn from(value: TouristStats) -> Self {
        Self {
            total_bookings: value.total_bookings,
            upcoming_bookings: value.upcoming_bookings,
            wishlist_count: value.wishlist_count,
            review_count: value.review_count,
        }
    }
}

/// Stat cards on the organizer dashboard.
///
/// Revenue rides as a decimal string like prices do, so large sums never
/// lose cents to floating point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerStatsPayload {
    pub total_tours: i64,
    pub published_tours: i64,
    pub total_bookings: i64,
    pub total_revenue: String,
}

impl From<OrganizerStats> for OrganizerStatsPayload {
    fn from(value: OrganizerStats) -> Self {
        Self {
            total_tours: value.total_tours,
            published_tours: value.published_tours,
            total_bookings: value.total_bookings,
            total_revenue: revenue_string(value.total_revenue),
        }
    }
}

/// Stat cards on the developer dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStatsPayload {
    pub total_users: i64,
    pub tourists: i64,
    pub organizers: i64,
    pub developers: i64,
    pub total_tours: i64,
    pub total_bookings: i64,
    pub total_departments: i64,
    pub total_revenue: String,
}

impl From<PlatformStats> for PlatformStatsPayload {
    fn from(value: PlatformStats) -> Self {
        Self {
            total_users: value.total_users,
            tourists: value.tourists,
            organizers: value.organizers,
            developers: value.developers,
            total_tours: value.total_tours,
            total_bookings: value.total_bookings,
            total_departments: value.total_departments,
            total_revenue: revenue_string(value.total_revenue),
        }
    }
}

/// Request for the tourist dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouristDashboardRequest {
    pub tourist_id: UserId,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// The tourist dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouristDashboardResponse {
    pub stats: TouristStatsPayload,
    pub recent_bookings: Page<BookingSummaryPayload>,
}

/// Request for the organizer dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerDashboardRequest {
    pub organizer_id: UserId,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// The organizer dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerDashboardResponse {
    pub stats: OrganizerStatsPayload,
    pub tours: Page<TourCardPayload>,
}

/// Request for the developer dashboard.
///
/// The two lists paginate independently so an admin can page through users
/// without resetting the tour list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperDashboardRequest {
    pub developer_id: UserId,
    #[serde(default)]
    pub users_page: Option<u32>,
    #[serde(default)]
    pub tours_page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// The developer dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperDashboardResponse {
    pub stats: PlatformStatsPayload,
    pub recent_users: Page<User>,
    pub recent_tours: Page<TourCardPayload>,
}

/// Driving port for dashboard reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Assemble the tourist dashboard.
    async fn tourist_dashboard(
        &self,
        request: TouristDashboardRequest,
    ) -> Result<TouristDashboardResponse, Error>;

    /// Assemble the organizer dashboard.
    async fn organizer_dashboard(
        &self,
        request: OrganizerDashboardRequest,
    ) -> Result<OrganizerDashboardResponse, Error>;

    /// Assemble the developer dashboard. Developer accounts only.
    async fn developer_dashboard(
        &self,
        request: DeveloperDashboardRequest,
    ) -> Result<DeveloperDashboardResponse, Error>;
}

/// Fixture dashboards over the canned data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDashboardQuery;

#[async_trait]
impl DashboardQuery for FixtureDashboardQuery {
    async fn tourist_dashboard(
        &self,
        request: TouristDashboardRequest,
    ) -> Result<TouristDashboardResponse, Error> {
        let page = PageRequest::new(request.page, request.per_page);
        Ok(TouristDashboardResponse {
            stats: TouristStatsPayload::from(TouristStats::default()),
            recent_bookings: Page::new(Vec::new(), page, 0),
        })
    }

    async fn organizer_dashboard(
        &self,
        request: OrganizerDashboardRequest,
    ) -> Result<OrganizerDashboardResponse, Error> {
        if *request.organizer_id.as_uuid() != fixtures::ORGANIZER_ID {
            return Err(Error::forbidden("not an organizer account"));
        }
        let now = chrono::Utc::now();
        let cards: Vec<TourCardPayload> = fixtures::tours(now)?
            .iter()
            .map(|tour| fixtures::summary_of(tour).map(TourCardPayload::from))
            .collect::<Result<_, _>>()?;
        let total = cards.len() as u64;
        let page = PageRequest::new(request.page, request.per_page);
        let revenue = BigDecimal::from(500) * BigDecimal::from(fixtures::HERITAGE_TOUR_TAKEN);
        Ok(OrganizerDashboardResponse {
            stats: OrganizerStatsPayload::from(OrganizerStats {
                total_tours: total as i64,
                published_tours: total as i64,
                total_bookings: fixtures::HERITAGE_TOUR_TAKEN,
                total_revenue: revenue,
            }),
            tours: Page::new(cards, page, total),
        })
    }

    async fn developer_dashboard(
        &self,
        request: DeveloperDashboardRequest,
    ) -> Result<DeveloperDashboardResponse, Error> {
        if *request.developer_id.as_uuid() != fixtures::DEVELOPER_ID {
            return Err(Error::forbidden("not a developer account"));
        }
        let now = chrono::Utc::now();
        let users = vec![
            fixtures::developer(now)?,
            fixtures::organizer(now)?,
            fixtures::tourist(now)?,
        ];
        let cards: Vec<TourCardPayload> = fixtures::tours(now)?
            .iter()
            .map(|tour| fixtures::summary_of(tour).map(TourCardPayload::from))
            .collect::<Result<_, _>>()?;
        let users_page = PageRequest::new(request.users_page, request.per_page);
        let tours_page = PageRequest::new(request.tours_page, request.per_page);
        let user_total = users.len() as u64;
        let tour_total = cards.len() as u64;
        let revenue = BigDecimal::from(500) * BigDecimal::from(fixtures::HERITAGE_TOUR_TAKEN);
        Ok(DeveloperDashboardResponse {
            stats: PlatformStatsPayload::from(PlatformStats {
                total_users: user_total as i64,
                tourists: 1,
                organizers: 1,
                developers: 1,
                total_tours: tour_total as i64,
                total_bookings: fixtures::HERITAGE_TOUR_TAKEN,
                total_departments: 2,
                total_revenue: revenue,
            }),
            recent_users: Page::new(users, users_page, user_total),
            recent_tours: Page::new(cards, tours_page, tour_total),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixture_tourist_dashboard_starts_at_zero() {
        let response = FixtureDashboardQuery
            .tourist_dashboard(TouristDashboardRequest {
                tourist_id: UserId::from_uuid(fixtures::TOURIST_ID),
                page: None,
                per_page: None,
            })
            .await
            .expect("dashboard loads");
        assert_eq!(response.stats.total_bookings, 0);
        assert!(response.recent_bookings.items.is_empty());
    }

    #[tokio::test]
    async fn fixture_organizer_dashboard_sums_revenue() {
        let response = FixtureDashboardQuery
            .organizer_dashboard(OrganizerDashboardRequest {
                organizer_id: UserId::from_uuid(fixtures::ORGANIZER_ID),
                page: None,
                per_page: None,
            })
            .await
            .expect("dashboard loads");
        assert_eq!(response.stats.total_tours, 2);
        assert_eq!(response.stats.total_revenue, "1000.00");
    }

    #[tokio::test]
    async fn fixture_developer_dashboard_counts_each_role_once() {
        let response = FixtureDashboardQuery
            .developer_dashboard(DeveloperDashboardRequest {
                developer_id: UserId::from_uuid(fixtures::DEVELOPER_ID),
                users_page: None,
                tours_page: None,
                per_page: None,
            })
            .await
            .expect("dashboard loads");
        assert_eq!(response.stats.total_users, 3);
        assert_eq!(response.stats.tourists, 1);
        assert_eq!(response.recent_users.items.len(), 3);
    }

    #[tokio::test]
    async fn fixture_developer_dashboard_rejects_other_roles() {
        let error = FixtureDashboardQuery
            .developer_dashboard(DeveloperDashboardRequest {
                developer_id: UserId::from_uuid(fixtures::TOURIST_ID),
                users_page: None,
                tours_page: None,
                per_page: None,
            })
            .await
            .expect_err("tourist rejected");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[test]
    fn revenue_lands_on_two_fraction_digits() {
        assert_eq!(revenue_string(BigDecimal::from(1000)), "1000.00");
    }
}
