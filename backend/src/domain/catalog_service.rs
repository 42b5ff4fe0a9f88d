//! Catalogue domain services.
//!
//! Read side of the tour catalogue: the filtered listing, the detail page
//! with its reviews and related suggestions, the department directory, and
//! an organizer's own tour list.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use pagination::PageRequest;

use crate::domain::access::{map_user_error, require_organizer};
use crate::domain::ports::{
    average_to_f64, CatalogQuery, DepartmentPayload, DepartmentRepository, DepartmentToursRequest,
    DepartmentToursResponse, EngagementRepository, GetTourRequest, GetTourResponse,
    ListDepartmentsResponse, ListToursRequest, ListToursResponse, MyToursRequest, MyToursResponse,
    ReviewPayload, TourCardPayload, TourDetailPayload, TourFilters, TourRepository, TourSearch,
    UserRepository,
};
use crate::domain::service_support::{map_department_error, map_engagement_error, map_tour_error};
use crate::domain::{Error, TourStatus};

/// Suggestions shown under the detail page.
const RELATED_TOUR_LIMIT: i64 = 3;

/// Catalogue reads over the tour, department, and engagement repositories.
#[derive(Clone)]
pub struct CatalogQueryService<T, D, E, U> {
    tours: Arc<T>,
    departments: Arc<D>,
    engagement: Arc<E>,
    users: Arc<U>,
}

impl<T, D, E, U> CatalogQueryService<T, D, E, U> {
    /// Create a new catalogue query service.
    pub fn new(tours: Arc<T>, departments: Arc<D>, engagement: Arc<E>, users: Arc<U>) -> Self {
        Self {
            tours,
            departments,
            engagement,
            users,
        }
    }
}

#[async_trait]
impl<T, D, E, U> CatalogQuery for CatalogQueryService<T, D, E, U>
where
    T: TourRepository,
    D: DepartmentRepository,
    E: EngagementRepository,
    U: UserRepository,
{
    async fn list_tours(&self, request: ListToursRequest) -> Result<ListToursResponse, Error> {
        let search = TourSearch {
            filters: TourFilters {
                search: request.search,
                category: request.category,
                department: request.department,
                price_band: request.price_band,
            },
            page: PageRequest::new(request.page, request.per_page),
            now: Utc::now(),
        };
        let page = self.tours.search(&search).await.map_err(map_tour_error)?;
        Ok(ListToursResponse {
            tours: page.map(TourCardPayload::from),
        })
    }

    async fn get_tour(&self, request: GetTourRequest) -> Result<GetTourResponse, Error> {
        let now = Utc::now();
        let tour = self
            .tours
            .find(request.tour_id)
            .await
            .map_err(map_tour_error)?
            .ok_or_else(|| Error::not_found(format!("tour {} not found", request.tour_id)))?;
        // Drafts look exactly like missing tours to everyone but their owner.
        let is_owner = request.viewer.as_ref() == Some(&tour.organizer);
        if tour.status != TourStatus::Published && !is_owner {
            return Err(Error::not_found(format!(
                "tour {} not found",
                request.tour_id
            )));
        }

        let confirmed = self
            .tours
            .confirmed_participants(tour.id)
            .await
            .map_err(map_tour_error)?;
        let available_spots = (i64::from(tour.details.max_participants) - confirmed).max(0);

        let organizer = self
            .users
            .find_by_id(&tour.organizer)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| {
                Error::internal(format!(
                    "organizer {} missing for tour {}",
                    tour.organizer, tour.id
                ))
            })?;

        let department = match tour.department_id {
            Some(id) => self
                .departments
                .find(id)
                .await
                .map_err(map_department_error)?
                .map(DepartmentPayload::from),
            None => None,
        };

        let summary = self
            .engagement
            .review_summary(tour.id)
            .await
            .map_err(map_engagement_error)?;
        let reviews = self
            .engagement
            .reviews_for_tour(tour.id)
            .await
            .map_err(map_engagement_error)?
            .into_iter()
            .map(|entry| ReviewPayload::from_review(entry.review, entry.author_username))
            .collect();

        let related = match tour.department_id {
            Some(department_id) => self
                .tours
                .related(department_id, tour.id, now, RELATED_TOUR_LIMIT)
                .await
                .map_err(map_tour_error)?
                .into_iter()
                .map(TourCardPayload::from)
                .collect(),
            None => Vec::new(),
        };

        let in_wishlist = match request.viewer.as_ref() {
            Some(viewer) => self
                .engagement
                .contains_wishlist(viewer, tour.id)
                .await
                .map_err(map_engagement_error)?,
            None => false,
        };

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
                available_spots,
                price: tour.details.price.clone(),
                image_url: tour.details.image_url.clone(),
                status: tour.status,
                qr_code_url: tour.qr_code_url.clone(),
                organizer_username: organizer.username().as_ref().to_owned(),
                department,
                average_rating: average_to_f64(summary.average),
                review_count: summary.count,
                is_bookable: tour.is_bookable(now),
            },
            reviews,
            related,
            in_wishlist,
        })
    }

    async fn list_departments(&self) -> Result<ListDepartmentsResponse, Error> {
        let departments = self
            .departments
            .list()
            .await
            .map_err(map_department_error)?;
        Ok(ListDepartmentsResponse {
            departments: departments.into_iter().map(DepartmentPayload::from).collect(),
        })
    }

    async fn department_tours(
        &self,
        request: DepartmentToursRequest,
    ) -> Result<DepartmentToursResponse, Error> {
        let department = self
            .departments
            .find(request.department_id)
            .await
            .map_err(map_department_error)?
            .ok_or_else(|| {
                Error::not_found(format!("department {} not found", request.department_id))
            })?;
        let page = self
            .tours
            .list_for_department(
                department.id,
                Utc::now(),
                PageRequest::new(request.page, request.per_page),
            )
            .await
            .map_err(map_tour_error)?;
        Ok(DepartmentToursResponse {
            department: department.into(),
            tours: page.map(TourCardPayload::from),
        })
    }

    async fn my_tours(&self, request: MyToursRequest) -> Result<MyToursResponse, Error> {
        require_organizer(self.users.as_ref(), &request.organizer_id).await?;
        let page = self
            .tours
            .list_for_organizer(
                &request.organizer_id,
                PageRequest::new(request.page, request.per_page),
            )
            .await
            .map_err(map_tour_error)?;
        Ok(MyToursResponse {
            tours: page.map(TourCardPayload::from),
        })
    }
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;
