//! Driving port for organizer tour management.
//!
//! Create, edit, and walk a tour through its lifecycle. Ownership is part of
//! every request: an organizer may only touch their own tours, while the
//! admin surface goes through [`super::admin_command`] instead.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, Price, TourCategory, TourDetails, TourStatus, UserId};

use super::fixtures;

/// Tour form fields shared by create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourForm {
    pub title: String,
    pub description: String,
    #[schema(value_type = String, example = "nature")]
    pub category: TourCategory,
    pub location: String,
    #[schema(value_type = String, format = DateTime)]
    pub tour_date: DateTime<Utc>,
    pub duration_hours: i32,
    pub max_participants: i32,
    #[schema(value_type = String, example = "500.00")]
    pub price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub department_id: Option<Uuid>,
}

impl TourForm {
    /// Validate the form into domain tour details.
    pub fn into_details(self) -> Result<TourDetails, Error> {
        TourDetails::try_from_parts(
            &self.title,
            &self.description,
            self.category,
            &self.location,
            self.tour_date,
            self.duration_hours,
            self.max_participants,
            self.price,
            self.image_url.as_deref(),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

/// Request to create a draft tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTourRequest {
    pub organizer_id: UserId,
    pub tour: TourForm,
}

/// Response from creating a tour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTourResponse {
    pub tour_id: Uuid,
    pub status: TourStatus,
}

/// Request to edit an existing tour's details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTourRequest {
    pub organizer_id: UserId,
    pub tour_id: Uuid,
    pub tour: TourForm,
}

/// Request to move a tour to a new lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeTourStatusRequest {
    pub organizer_id: UserId,
    pub tour_id: Uuid,
    pub status: TourStatus,
}

/// Response after a lifecycle change.
///
/// Publishing mints the QR code link, so the fresh value rides along.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeTourStatusResponse {
    pub status: TourStatus,
    pub qr_code_url: Option<String>,
}

/// Request to delete a tour outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTourRequest {
    pub organizer_id: UserId,
    pub tour_id: Uuid,
}

/// Request to mint a fresh QR code link for a published tour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateQrRequest {
    pub organizer_id: UserId,
    pub tour_id: Uuid,
}

/// Response carrying the minted QR code link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateQrResponse {
    pub qr_code_url: String,
}

/// Driving port for tour write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TourCommand: Send + Sync {
    /// Create a draft tour owned by the caller.
    async fn create_tour(&self, request: CreateTourRequest) -> Result<CreateTourResponse, Error>;

    /// Replace an owned tour's details.
    async fn update_tour(&self, request: UpdateTourRequest) -> Result<(), Error>;

    /// Move an owned tour along the status graph.
    ///
    /// Illegal transitions are conflicts: a completed tour stays completed
    /// no matter what the caller asks for.
    async fn change_status(
        &self,
        request: ChangeTourStatusRequest,
    ) -> Result<ChangeTourStatusResponse, Error>;

    /// Delete an owned tour along with its bookings and reviews.
    async fn delete_tour(&self, request: DeleteTourRequest) -> Result<(), Error>;

    /// Mint a fresh QR code link for an owned published tour.
    async fn regenerate_qr(&self, request: RegenerateQrRequest)
    -> Result<RegenerateQrResponse, Error>;
}

/// Fixture command over the canned tours.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTourCommand;

impl FixtureTourCommand {
    fn require_fixture_organizer(organizer_id: &UserId) -> Result<(), Error> {
        if *organizer_id.as_uuid() == fixtures::ORGANIZER_ID {
            Ok(())
        } else {
            Err(Error::forbidden("tour does not belong to this organizer"))
        }
    }

    fn require_fixture_tour(tour_id: Uuid) -> Result<crate::domain::Tour, Error> {
        fixtures::tour_by_id(tour_id, Utc::now())?
            .ok_or_else(|| Error::not_found(format!("tour {tour_id} not found")))
    }
}

#[async_trait]
impl TourCommand for FixtureTourCommand {
    async fn create_tour(&self, request: CreateTourRequest) -> Result<CreateTourResponse, Error> {
        Self::require_fixture_organizer(&request.organizer_id)?;
        request.tour.into_details()?;
        Ok(CreateTourResponse {
            tour_id: Uuid::new_v4(),
            status: TourStatus::Draft,
        })
    }

    async fn update_tour(&self, request: UpdateTourRequest) -> Result<(), Error> {
        Self::require_fixture_organizer(&request.organizer_id)?;
        Self::require_fixture_tour(request.tour_id)?;
        request.tour.into_details()?;
        Ok(())
    }

    async fn change_status(
        &self,
        request: ChangeTourStatusRequest,
    ) -> Result<ChangeTourStatusResponse, Error> {
        Self::require_fixture_organizer(&request.organizer_id)?;
        let tour = Self::require_fixture_tour(request.tour_id)?;
        if !tour.status.can_transition_to(request.status) {
            return Err(Error::conflict(format!(
                "cannot move a {} tour to {}",
                tour.status, request.status
            )));
        }
        Ok(ChangeTourStatusResponse {
            status: request.status,
            qr_code_url: (request.status == TourStatus::Published)
                .then(|| format!("http://localhost:8080/tours/{}/", request.tour_id)),
        })
    }

    async fn delete_tour(&self, request: DeleteTourRequest) -> Result<(), Error> {
        Self::require_fixture_organizer(&request.organizer_id)?;
        Self::require_fixture_tour(request.tour_id)?;
        Ok(())
    }

    async fn regenerate_qr(
        &self,
        request: RegenerateQrRequest,
    ) -> Result<RegenerateQrResponse, Error> {
        Self::require_fixture_organizer(&request.organizer_id)?;
        let tour = Self::require_fixture_tour(request.tour_id)?;
        if tour.status != TourStatus::Published {
            return Err(Error::conflict("only published tours carry a QR code"));
        }
        Ok(RegenerateQrResponse {
            qr_code_url: format!("http://localhost:8080/tours/{}/", request.tour_id),
        })
    }
}
