//! Tour management domain services.
//!
//! Organizer-side writes: drafting, editing, lifecycle changes, deletion,
//! and QR link minting. Every operation checks the caller owns the tour
//! before touching it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use url::Url;
use uuid::Uuid;

use crate::domain::access::require_organizer;
use crate::domain::ports::{
    ChangeTourStatusRequest, ChangeTourStatusResponse, CreateTourRequest, CreateTourResponse,
    DeleteTourRequest, DepartmentRepository, RegenerateQrRequest, RegenerateQrResponse,
    TourCommand, TourRepository, UpdateTourRequest, UserRepository,
};
use crate::domain::service_support::{map_department_error, map_tour_error};
use crate::domain::{qr_code_url, Error, Tour, TourStatus, UserId};

/// Organizer tour writes over the tour and department repositories.
#[derive(Clone)]
pub struct TourCommandService<T, D, U> {
    tours: Arc<T>,
    departments: Arc<D>,
    users: Arc<U>,
    public_base_url: Url,
}

impl<T, D, U> TourCommandService<T, D, U> {
    /// Create a new tour command service.
    ///
    /// `public_base_url` is the externally reachable origin QR links point
    /// at.
    pub fn new(tours: Arc<T>, departments: Arc<D>, users: Arc<U>, public_base_url: Url) -> Self {
        Self {
            tours,
            departments,
            users,
            public_base_url,
        }
    }
}

impl<T, D, U> TourCommandService<T, D, U>
where
    T: TourRepository,
    D: DepartmentRepository,
    U: UserRepository,
{
    async fn owned_tour(&self, organizer: &UserId, tour_id: Uuid) -> Result<Tour, Error> {
        let tour = self
            .tours
            .find(tour_id)
            .await
            .map_err(map_tour_error)?
            .ok_or_else(|| Error::not_found(format!("tour {tour_id} not found")))?;
        if tour.organizer != *organizer {
            return Err(Error::forbidden("tour does not belong to this organizer"));
        }
        Ok(tour)
    }

    async fn require_department(&self, department_id: Option<Uuid>) -> Result<(), Error> {
        let Some(id) = department_id else {
            return Ok(());
        };
        self.departments
            .find(id)
            .await
            .map_err(map_department_error)?
            .ok_or_else(|| Error::invalid_request(format!("department {id} does not exist")))?;
        Ok(())
    }
}

#[async_trait]
impl<T, D, U> TourCommand for TourCommandService<T, D, U>
where
    T: TourRepository,
    D: DepartmentRepository,
    U: UserRepository,
{
    async fn create_tour(&self, request: CreateTourRequest) -> Result<CreateTourResponse, Error> {
        require_organizer(self.users.as_ref(), &request.organizer_id).await?;
        let department_id = request.tour.department_id;
        self.require_department(department_id).await?;
        let details = request.tour.into_details()?;
        let tour = Tour::new_draft(
            Uuid::new_v4(),
            request.organizer_id,
            department_id,
            details,
            Utc::now(),
        );
        self.tours.insert(&tour).await.map_err(map_tour_error)?;
        Ok(CreateTourResponse {
            tour_id: tour.id,
            status: tour.status,
        })
    }

    async fn update_tour(&self, request: UpdateTourRequest) -> Result<(), Error> {
        require_organizer(self.users.as_ref(), &request.organizer_id).await?;
        self.owned_tour(&request.organizer_id, request.tour_id)
            .await?;
        let department_id = request.tour.department_id;
        self.require_department(department_id).await?;
        let details = request.tour.into_details()?;
        let updated = self
            .tours
            .update_details(request.tour_id, department_id, &details, Utc::now())
            .await
            .map_err(map_tour_error)?;
        if !updated {
            return Err(Error::not_found(format!(
                "tour {} not found",
                request.tour_id
            )));
        }
        Ok(())
    }

    async fn change_status(
        &self,
        request: ChangeTourStatusRequest,
    ) -> Result<ChangeTourStatusResponse, Error> {
        require_organizer(self.users.as_ref(), &request.organizer_id).await?;
        let tour = self
            .owned_tour(&request.organizer_id, request.tour_id)
            .await?;
        if !tour.status.can_transition_to(request.status) {
            return Err(Error::conflict(format!(
                "cannot move a {} tour to {}",
                tour.status, request.status
            )));
        }
        // Publishing mints the QR link; leaving the published state drops it.
        let qr = (request.status == TourStatus::Published)
            .then(|| qr_code_url(&self.public_base_url, tour.id));
        let updated = self
            .tours
            .set_status(tour.id, request.status, qr.clone(), Utc::now())
            .await
            .map_err(map_tour_error)?;
        if !updated {
            return Err(Error::not_found(format!(
                "tour {} not found",
                request.tour_id
            )));
        }
        Ok(ChangeTourStatusResponse {
            status: request.status,
            qr_code_url: qr,
        })
    }

    async fn delete_tour(&self, request: DeleteTourRequest) -> Result<(), Error> {
        require_organizer(self.users.as_ref(), &request.organizer_id).await?;
        self.owned_tour(&request.organizer_id, request.tour_id)
            .await?;
        let deleted = self
            .tours
            .delete(request.tour_id)
            .await
            .map_err(map_tour_error)?;
        if !deleted {
            return Err(Error::not_found(format!(
                "tour {} not found",
                request.tour_id
            )));
        }
        Ok(())
    }

    async fn regenerate_qr(
        &self,
        request: RegenerateQrRequest,
    ) -> Result<RegenerateQrResponse, Error> {
        require_organizer(self.users.as_ref(), &request.organizer_id).await?;
        let tour = self
            .owned_tour(&request.organizer_id, request.tour_id)
            .await?;
        if tour.status != TourStatus::Published {
            return Err(Error::conflict("only published tours carry a QR code"));
        }
        let url = qr_code_url(&self.public_base_url, tour.id);
        let updated = self
            .tours
            .set_qr_code_url(tour.id, &url, Utc::now())
            .await
            .map_err(map_tour_error)?;
        if !updated {
            return Err(Error::not_found(format!(
                "tour {} not found",
                request.tour_id
            )));
        }
        Ok(RegenerateQrResponse { qr_code_url: url })
    }
}

#[cfg(test)]
#[path = "tour_service_tests.rs"]
mod tests;
