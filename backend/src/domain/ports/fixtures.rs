//! Canned data shared by the fixture port implementations.
//!
//! The server runs on fixture ports whenever no database is configured, so
//! these identities and tours are what a developer sees when poking the API
//! before wiring PostgreSQL. Integration tests lean on the same constants.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::{
    Department, DepartmentDetails, EmailAddress, Error, PhoneNumber, Price, Role, Tour,
    TourCategory, TourDetails, TourStatus, User, UserId, Username,
};

use super::tour_repository::TourSummary;

/// Fixture tourist `mira` / `password`.
pub const TOURIST_ID: Uuid = Uuid::from_u128(0x11111111_1111_4111_8111_111111111111);
/// Fixture organizer `rahim` / `password`.
pub const ORGANIZER_ID: Uuid = Uuid::from_u128(0x22222222_2222_4222_8222_222222222222);
/// Fixture developer `admin` / `password`.
pub const DEVELOPER_ID: Uuid = Uuid::from_u128(0x123e4567_e89b_12d3_a456_426614174000);
/// Free robotics lab tour, published two weeks out.
pub const FREE_TOUR_ID: Uuid = Uuid::from_u128(0x33333333_3333_4333_8333_333333333333);
/// Priced heritage walk, published three weeks out.
pub const HERITAGE_TOUR_ID: Uuid = Uuid::from_u128(0x44444444_4444_4444_8444_444444444444);
/// Computer Science and Engineering department.
pub const CSE_DEPARTMENT_ID: Uuid = Uuid::from_u128(0x55555555_5555_4555_8555_555555555555);
/// Architecture department.
pub const ARCH_DEPARTMENT_ID: Uuid = Uuid::from_u128(0x66666666_6666_4666_8666_666666666666);

/// Capacity of both fixture tours.
pub const FIXTURE_TOUR_CAPACITY: i32 = 20;
/// Confirmed seats already taken on the heritage walk.
pub const HERITAGE_TOUR_TAKEN: i64 = 2;

fn internal(err: impl std::fmt::Display) -> Error {
    Error::internal(format!("fixture data failed validation: {err}"))
}

/// The fixture tourist account.
pub fn tourist(now: DateTime<Utc>) -> Result<User, Error> {
    Ok(User::new(
        UserId::from_uuid(TOURIST_ID),
        Username::new("mira").map_err(internal)?,
        EmailAddress::new("mira@campus.edu").map_err(internal)?,
        Role::Tourist,
        Some(PhoneNumber::new("+8801712345678").map_err(internal)?),
        now - Duration::days(200),
    ))
}

/// The fixture organizer account.
pub fn organizer(now: DateTime<Utc>) -> Result<User, Error> {
    Ok(User::new(
        UserId::from_uuid(ORGANIZER_ID),
        Username::new("rahim").map_err(internal)?,
        EmailAddress::new("rahim@campus.edu").map_err(internal)?,
        Role::Organizer,
        None,
        now - Duration::days(400),
    ))
}

/// The fixture developer account.
pub fn developer(now: DateTime<Utc>) -> Result<User, Error> {
    Ok(User::new(
        UserId::from_uuid(DEVELOPER_ID),
        Username::new("admin").map_err(internal)?,
        EmailAddress::new("admin@campus.edu").map_err(internal)?,
        Role::Developer,
        None,
        now - Duration::days(600),
    ))
}

/// Look up a fixture account by identifier.
pub fn user_by_id(id: &UserId, now: DateTime<Utc>) -> Result<Option<User>, Error> {
    let uuid = *id.as_uuid();
    if uuid == TOURIST_ID {
        return tourist(now).map(Some);
    }
    if uuid == ORGANIZER_ID {
        return organizer(now).map(Some);
    }
    if uuid == DEVELOPER_ID {
        return developer(now).map(Some);
    }
    Ok(None)
}

/// The two fixture departments.
pub fn departments() -> Result<Vec<Department>, Error> {
    Ok(vec![
        Department {
            id: CSE_DEPARTMENT_ID,
            details: DepartmentDetails::try_from_parts(
                "Computer Science and Engineering",
                "CSE",
                "Labs, maker spaces, and the server room nobody is allowed into.",
            )
            .map_err(internal)?,
        },
        Department {
            id: ARCH_DEPARTMENT_ID,
            details: DepartmentDetails::try_from_parts(
                "Architecture",
                "ARCH",
                "Studios and the model archive.",
            )
            .map_err(internal)?,
        },
    ])
}

/// The two fixture tours, both published and dated after `now`.
pub fn tours(now: DateTime<Utc>) -> Result<Vec<Tour>, Error> {
    let organizer = UserId::from_uuid(ORGANIZER_ID);
    let mut robotics = Tour::new_draft(
        FREE_TOUR_ID,
        organizer.clone(),
        Some(CSE_DEPARTMENT_ID),
        TourDetails::try_from_parts(
            "Robotics Lab Open Afternoon",
            "Meet the walking robots and the people who keep them upright.",
            TourCategory::Academic,
            "CSE Building Lobby",
            now + Duration::days(14),
            2,
            FIXTURE_TOUR_CAPACITY,
            Price::free(),
            None,
        )
        .map_err(internal)?,
        now - Duration::days(7),
    );
    robotics.status = TourStatus::Published;
    robotics.qr_code_url = Some(format!("http://localhost:8080/tours/{FREE_TOUR_ID}/"));

    let mut heritage = Tour::new_draft(
        HERITAGE_TOUR_ID,
        organizer,
        Some(ARCH_DEPARTMENT_ID),
        TourDetails::try_from_parts(
            "Old Campus Heritage Walk",
            "Two hours through the colonial-era quad with the archive team.",
            TourCategory::Cultural,
            "Clock Tower Gate",
            now + Duration::days(21),
            3,
            FIXTURE_TOUR_CAPACITY,
            Price::parse("500").map_err(internal)?,
            None,
        )
        .map_err(internal)?,
        now - Duration::days(5),
    );
    heritage.status = TourStatus::Published;
    heritage.qr_code_url = Some(format!("http://localhost:8080/tours/{HERITAGE_TOUR_ID}/"));

    Ok(vec![robotics, heritage])
}

/// Find one fixture tour by identifier.
pub fn tour_by_id(id: Uuid, now: DateTime<Utc>) -> Result<Option<Tour>, Error> {
    Ok(tours(now)?.into_iter().find(|tour| tour.id == id))
}

/// Seats already confirmed on a fixture tour.
#[must_use]
pub fn confirmed_seats(tour_id: Uuid) -> i64 {
    if tour_id == HERITAGE_TOUR_ID {
        HERITAGE_TOUR_TAKEN
    } else {
        0
    }
}

/// Catalogue card for a fixture tour.
pub fn summary_of(tour: &Tour) -> Result<TourSummary, Error> {
    let department_name = departments()?
        .into_iter()
        .find(|department| Some(department.id) == tour.department_id)
        .map(|department| department.details.name);
    Ok(TourSummary {
        id: tour.id,
        title: tour.details.title.clone(),
        category: tour.details.category,
        department_name,
        location: tour.details.location.clone(),
        tour_date: tour.details.tour_date,
        duration_hours: tour.details.duration_hours,
        max_participants: tour.details.max_participants,
        available_spots: i64::from(tour.details.max_participants) - confirmed_seats(tour.id),
        price: tour.details.price.clone(),
        image_url: tour.details.image_url.clone(),
        status: tour.status,
    })
}
