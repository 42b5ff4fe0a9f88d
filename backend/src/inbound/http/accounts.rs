//! Account and emergency-contact handlers.
//!
//! ```text
//! GET    /api/v1/account
//! PUT    /api/v1/account
//! GET    /api/v1/account/contacts
//! POST   /api/v1/account/contacts
//! PUT    /api/v1/account/contacts/{contact_id}
//! DELETE /api/v1/account/contacts/{contact_id}
//! POST   /api/v1/account/contacts/{contact_id}/primary
//! ```
//!
//! Every route acts on the signed-in session user; there is no way to read
//! or edit another account from here.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::ports::{
    AddContactRequest, ContactForm, ContactResponse, DeleteContactRequest, GetAccountRequest,
    GetAccountResponse, ListContactsRequest, ListContactsResponse, ProfileFieldsPayload,
    SetPrimaryContactRequest, UpdateAccountRequest, UpdateContactRequest,
};
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Body for `PUT /api/v1/account`; the acting user comes from the session.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountForm {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub profile: ProfileFieldsPayload,
}

/// The signed-in account with its role profile.
#[utoipa::path(
    get,
    path = "/api/v1/account",
    responses(
        (status = 200, description = "Account view"),
        (status = 401, description = "Not signed in", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["account"],
    operation_id = "get_account"
)]
#[get("/account")]
pub async fn get_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let account = state
        .account_query
        .current_account(GetAccountRequest { user_id })
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(account))
}

/// Update phone and role-profile fields, returning the fresh view.
#[utoipa::path(
    put,
    path = "/api/v1/account",
    request_body = UpdateAccountForm,
    responses(
        (status = 200, description = "Updated account view"),
        (status = 400, description = "Invalid fields", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Not signed in", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["account"],
    operation_id = "update_account"
)]
#[put("/account")]
pub async fn update_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateAccountForm>,
) -> ApiResult<web::Json<GetAccountResponse>> {
    let user_id = session.require_user_id()?;
    let form = payload.into_inner();
    let response = state
        .account_command
        .update_account(UpdateAccountRequest {
            user_id,
            phone: form.phone,
            profile: form.profile,
        })
        .await?;
    Ok(web::Json(response))
}

/// The caller's emergency contacts, primary first.
#[utoipa::path(
    get,
    path = "/api/v1/account/contacts",
    responses(
        (status = 200, description = "Contacts, primary first"),
        (status = 401, description = "Not signed in", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["account"],
    operation_id = "list_contacts"
)]
#[get("/account/contacts")]
pub async fn list_contacts(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ListContactsResponse>> {
    let user_id = session.require_user_id()?;
    let response = state
        .account_query
        .list_contacts(ListContactsRequest { user_id })
        .await?;
    Ok(web::Json(response))
}

/// Add an emergency contact.
#[utoipa::path(
    post,
    path = "/api/v1/account/contacts",
    responses(
        (status = 201, description = "Contact stored"),
        (status = 400, description = "Invalid form", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Duplicate phone number", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["account"],
    operation_id = "add_contact"
)]
#[post("/account/contacts")]
pub async fn add_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ContactForm>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let response = state
        .account_command
        .add_contact(AddContactRequest {
            user_id,
            contact: payload.into_inner(),
        })
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// Edit an emergency contact.
#[utoipa::path(
    put,
    path = "/api/v1/account/contacts/{contact_id}",
    params(("contact_id" = Uuid, Path, description = "Contact identifier")),
    responses(
        (status = 200, description = "Contact updated"),
        (status = 404, description = "Unknown contact", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["account"],
    operation_id = "update_contact"
)]
#[put("/account/contacts/{contact_id}")]
pub async fn update_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<ContactForm>,
) -> ApiResult<web::Json<ContactResponse>> {
    let user_id = session.require_user_id()?;
    let response = state
        .account_command
        .update_contact(UpdateContactRequest {
            user_id,
            contact_id: path.into_inner(),
            contact: payload.into_inner(),
        })
        .await?;
    Ok(web::Json(response))
}

/// Remove an emergency contact.
#[utoipa::path(
    delete,
    path = "/api/v1/account/contacts/{contact_id}",
    params(("contact_id" = Uuid, Path, description = "Contact identifier")),
    responses(
        (status = 204, description = "Contact removed"),
        (status = 404, description = "Unknown contact", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["account"],
    operation_id = "delete_contact"
)]
#[delete("/account/contacts/{contact_id}")]
pub async fn delete_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state
        .account_command
        .delete_contact(DeleteContactRequest {
            user_id,
            contact_id: path.into_inner(),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Promote one contact to primary, demoting the rest.
#[utoipa::path(
    post,
    path = "/api/v1/account/contacts/{contact_id}/primary",
    params(("contact_id" = Uuid, Path, description = "Contact identifier")),
    responses(
        (status = 204, description = "Primary contact switched"),
        (status = 404, description = "Unknown contact", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["account"],
    operation_id = "set_primary_contact"
)]
#[post("/account/contacts/{contact_id}/primary")]
pub async fn set_primary_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state
        .account_command
        .set_primary_contact(SetPrimaryContactRequest {
            user_id,
            contact_id: path.into_inner(),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
