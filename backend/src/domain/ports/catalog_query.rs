//! Driving port for browsing the tour catalogue.
//!
//! Serves the public listing with its search filters, the tour detail page,
//! the department directory, and an organizer's own tour list. Everything
//! here is read-only; mutations live on [`super::tour_command`].

use async_trait::async_trait;
use bigdecimal::ToPrimitive;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Department, Error, Price, PriceBand, Review, TourCategory, TourStatus, UserId,
};

use super::fixtures;
use super::tour_repository::TourSummary;

/// Catalogue card for one tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourCardPayload {
    pub id: Uuid,
    pub title: String,
    pub category: TourCategory,
    pub department_name: Option<String>,
    pub location: String,
    pub tour_date: DateTime<Utc>,
    pub duration_hours: i32,
    pub max_participants: i32,
    /// Capacity minus confirmed participants, floored at zero upstream.
    pub available_spots: i64,
    pub price: Price,
    pub image_url: Option<String>,
    pub status: TourStatus,
}

impl From<TourSummary> for TourCardPayload {
    fn from(value: TourSummary) -> Self {
        Self {
            id: value.id,
            title: value.title,
            category: value.category,
            department_name: value.department_name,
            location: value.location,
            tour_date: value.tour_date,
            duration_hours: value.duration_hours,
            max_participants: value.max_participants,
            available_spots: value.available_spots,
            price: value.price,
            image_url: value.image_url,
            status: value.status,
        }
    }
}

/// Department directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentPayload {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: String,
}

impl From<Department> for DepartmentPayload {
    fn from(value: Department) -> Self {
        Self {
            id: value.id,
            name: value.details.name,
            code: value.details.code,
            description: value.details.description,
        }
    }
}

/// One review as shown on the tour detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    pub id: Uuid,
    pub author_username: String,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewPayload {
    /// Pair a stored review with its author's username.
    #[must_use]
    pub fn from_review(review: Review, author_username: String) -> Self {
        Self {
            id: review.id,
            author_username,
            rating: review.rating.value(),
            comment: review.comment,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

/// Filterable catalogue listing request.
///
/// All filters combine with logical AND. `department` accepts either a
/// department id or a name fragment upstream; by the time the request
/// reaches this port it is a resolved identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListToursRequest {
    pub search: Option<String>,
    pub category: Option<TourCategory>,
    pub department: Option<Uuid>,
    pub price_band: Option<PriceBand>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Response carrying one catalogue page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListToursResponse {
    pub tours: Page<TourCardPayload>,
}

/// Request for one tour's detail page.
///
/// `viewer` personalises the response: wishlist state is only meaningful
/// for a signed-in tourist and stays `false` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTourRequest {
    pub tour_id: Uuid,
    #[serde(default)]
    pub viewer: Option<UserId>,
}

/// The tour detail page head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourDetailPayload {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: TourCategory,
    pub location: String,
    pub tour_date: DateTime<Utc>,
    pub duration_hours: i32,
    pub max_participants: i32,
    pub available_spots: i64,
    pub price: Price,
    pub image_url: Option<String>,
    pub status: TourStatus,
    pub qr_code_url: Option<String>,
    pub organizer_username: String,
    pub department: Option<DepartmentPayload>,
    pub average_rating: Option<f64>,
    pub review_count: i64,
    pub is_bookable: bool,
}

/// Full detail page: the tour plus its reviews and related suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTourResponse {
    pub tour: TourDetailPayload,
    pub reviews: Vec<ReviewPayload>,
    pub related: Vec<TourCardPayload>,
    pub in_wishlist: bool,
}

/// Response listing every department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDepartmentsResponse {
    pub departments: Vec<DepartmentPayload>,
}

/// Request for one department's published tours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentToursRequest {
    pub department_id: Uuid,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Response pairing a department with its upcoming tours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentToursResponse {
    pub department: DepartmentPayload,
    pub tours: Page<TourCardPayload>,
}

/// Request for an organizer's own tours, drafts included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyToursRequest {
    pub organizer_id: UserId,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Response carrying an organizer's tours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyToursResponse {
    pub tours: Page<TourCardPayload>,
}

/// Driving port for catalogue read operations.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() -> Result<(), backend::domain::Error> {
/// use backend::domain::ports::{CatalogQuery, FixtureCatalogQuery, ListToursRequest};
///
/// let query = FixtureCatalogQuery;
/// let response = query.list_tours(ListToursRequest::default()).await?;
/// assert!(response.tours.total_items >= 2);
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// List published upcoming tours matching the filters.
    async fn list_tours(&self, request: ListToursRequest) -> Result<ListToursResponse, Error>;

    /// Fetch one tour's detail page.
    ///
    /// Unpublished tours are only visible to their organizer; everyone else
    /// receives not-found rather than a hint the draft exists.
    async fn get_tour(&self, request: GetTourRequest) -> Result<GetTourResponse, Error>;

    /// List every department, ordered by name.
    async fn list_departments(&self) -> Result<ListDepartmentsResponse, Error>;

    /// List one department's published upcoming tours.
    async fn department_tours(
        &self,
        request: DepartmentToursRequest,
    ) -> Result<DepartmentToursResponse, Error>;

    /// List the caller's own tours regardless of status, newest first.
    async fn my_tours(&self, request: MyToursRequest) -> Result<MyToursResponse, Error>;
}

/// Fixture catalogue backed by the canned tours.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogQuery;

impl FixtureCatalogQuery {
    fn cards(now: DateTime<Utc>) -> Result<Vec<TourCardPayload>, Error> {
        fixtures::tours(now)?
            .iter()
            .map(|tour| fixtures::summary_of(tour).map(TourCardPayload::from))
            .collect()
    }

    fn page_of(cards: Vec<TourCardPayload>, request: PageRequest) -> Page<TourCardPayload> {
        let total = cards.len() as u64;
        let items = cards
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(request.per_page() as usize)
            .collect();
        Page::new(items, request, total)
    }
}

#[async_trait]
impl CatalogQuery for FixtureCatalogQuery {
    async fn list_tours(&self, request: ListToursRequest) -> Result<ListToursResponse, Error> {
        let now = Utc::now();
        let mut cards = Self::cards(now)?;
        if let Some(needle) = request.search.as_deref() {
            let needle = needle.to_lowercase();
            cards.retain(|card| {
                card.title.to_lowercase().contains(&needle)
                    || card.location.to_lowercase().contains(&needle)
            });
        }
        if let Some(category) = request.category {
            cards.retain(|card| card.category == category);
        }
        if let Some(department) = request.department {
            let name = fixtures::departments()?
                .into_iter()
                .find(|dept| dept.id == department)
                .map(|dept| dept.details.name);
            cards.retain(|card| card.department_name == name && name.is_some());
        }
        if let Some(band) = request.price_band {
            cards.retain(|card| band.matches(&card.price));
        }
        let page = PageRequest::new(request.page, request.per_page);
        Ok(ListToursResponse {
            tours: Self::page_of(cards, page),
        })
    }

    async fn get_tour(&self, request: GetTourRequest) -> Result<GetTourResponse, Error> {
        let now = Utc::now();
        let tour = fixtures::tour_by_id(request.tour_id, now)?
            .ok_or_else(|| Error::not_found(format!("tour {} not found", request.tour_id)))?;
        let summary = fixtures::summary_of(&tour)?;
        let department = fixtures::departments()?
            .into_iter()
            .find(|dept| Some(dept.id) == tour.department_id)
            .map(DepartmentPayload::from);
        let organizer = fixtures::organizer(now)?;
        let related = Self::cards(now)?
            .into_iter()
            .filter(|card| card.id != tour.id)
            .take(3)
            .collect();
        Ok(GetTourResponse {
            tour: TourDetailPayload {
                id: tour.id,
                title: tour.details.title.clone(),
                description: tour.details.description.clone(),
                category: tour.details.category,
                location: tour.details.location.clone(),
                tour_date: tour.details.tour_date,
                duration_hours: tour.details.duration_hours,
                max_participants: tour.details.max_participants,
                available_spots: summary.available_spots,
                price: tour.details.price.clone(),
                image_url: tour.details.image_url.clone(),
                status: tour.status,
                qr_code_url: tour.qr_code_url.clone(),
                organizer_username: organizer.username().as_ref().to_owned(),
                department,
                average_rating: None,
                review_count: 0,
                is_bookable: tour.is_bookable(now),
            },
            reviews: Vec::new(),
            related,
            in_wishlist: false,
        })
    }

    async fn list_departments(&self) -> Result<ListDepartmentsResponse, Error> {
        Ok(ListDepartmentsResponse {
            departments: fixtures::departments()?
                .into_iter()
                .map(DepartmentPayload::from)
                .collect(),
        })
    }

    async fn department_tours(
        &self,
        request: DepartmentToursRequest,
    ) -> Result<DepartmentToursResponse, Error> {
        let now = Utc::now();
        let department = fixtures::departments()?
            .into_iter()
            .find(|dept| dept.id == request.department_id)
            .ok_or_else(|| {
                Error::not_found(format!("department {} not found", request.department_id))
            })?;
        let cards = Self::cards(now)?
            .into_iter()
            .filter(|card| card.department_name.as_deref() == Some(department.details.name.as_str()))
            .collect();
        let page = PageRequest::new(request.page, request.per_page);
        Ok(DepartmentToursResponse {
            department: department.into(),
            tours: Self::page_of(cards, page),
        })
    }

    async fn my_tours(&self, request: MyToursRequest) -> Result<MyToursResponse, Error> {
        let now = Utc::now();
        let cards = if *request.organizer_id.as_uuid() == fixtures::ORGANIZER_ID {
            Self::cards(now)?
        } else {
            Vec::new()
        };
        let page = PageRequest::new(request.page, request.per_page);
        Ok(MyToursResponse {
            tours: Self::page_of(cards, page),
        })
    }
}

/// Convert a stored decimal rating average into the wire's floating form.
#[must_use]
pub fn average_to_f64(average: Option<bigdecimal::BigDecimal>) -> Option<f64> {
    average.and_then(|value| value.to_f64())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_catalogue_lists_both_tours() {
        let response = FixtureCatalogQuery
            .list_tours(ListToursRequest::default())
            .await
            .expect("listing succeeds");
        assert_eq!(response.tours.total_items, 2);
        assert_eq!(response.tours.page, 1);
    }

    #[rstest]
    #[case(Some("robotics"), None, 1)]
    #[case(Some("nowhere"), None, 0)]
    #[case(None, Some(PriceBand::Free), 1)]
    #[case(None, Some(PriceBand::Between500And1000), 1)]
    #[case(None, Some(PriceBand::Over1000), 0)]
    #[tokio::test]
    async fn fixture_catalogue_applies_filters(
        #[case] search: Option<&str>,
        #[case] price_band: Option<PriceBand>,
        #[case] expected: u64,
    ) {
        let request = ListToursRequest {
            search: search.map(str::to_owned),
            price_band,
            ..ListToursRequest::default()
        };
        let response = FixtureCatalogQuery
            .list_tours(request)
            .await
            .expect("listing succeeds");
        assert_eq!(response.tours.total_items, expected);
    }

    #[tokio::test]
    async fn fixture_detail_links_department_and_related() {
        let response = FixtureCatalogQuery
            .get_tour(GetTourRequest {
                tour_id: fixtures::HERITAGE_TOUR_ID,
                viewer: None,
            })
            .await
            .expect("detail succeeds");
        assert_eq!(
            response.tour.department.as_ref().map(|d| d.code.as_str()),
            Some("ARCH")
        );
        assert_eq!(response.related.len(), 1);
        assert!(response.tour.is_bookable);
        assert_eq!(
            response.tour.available_spots,
            i64::from(fixtures::FIXTURE_TOUR_CAPACITY) - fixtures::HERITAGE_TOUR_TAKEN
        );
    }

    #[tokio::test]
    async fn fixture_detail_rejects_unknown_tours() {
        let error = FixtureCatalogQuery
            .get_tour(GetTourRequest {
                tour_id: Uuid::new_v4(),
                viewer: None,
            })
            .await
            .expect_err("unknown tour");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn fixture_department_tours_filters_by_department() {
        let response = FixtureCatalogQuery
            .department_tours(DepartmentToursRequest {
                department_id: fixtures::CSE_DEPARTMENT_ID,
                page: None,
                per_page: None,
            })
            .await
            .expect("department tours succeed");
        assert_eq!(response.department.code, "CSE");
        assert_eq!(response.tours.total_items, 1);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(bigdecimal::BigDecimal::from(4)), Some(4.0))]
    fn average_converts_to_float(
        #[case] input: Option<bigdecimal::BigDecimal>,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(average_to_f64(input), expected);
    }

    #[rstest]
    fn list_request_deserialises_camel_case_filters() {
        let parsed: ListToursRequest = serde_json::from_value(serde_json::json!({
            "search": "lab",
            "category": "academic",
            "priceBand": "under500",
            "perPage": 5,
        }))
        .expect("filters deserialise");
        assert_eq!(parsed.category, Some(TourCategory::Academic));
        assert_eq!(parsed.price_band, Some(PriceBand::Under500));
        assert_eq!(parsed.per_page, Some(5));
    }
}
