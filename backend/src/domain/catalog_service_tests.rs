//! Tests for catalogue services.

use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use pagination::{Page, PageRequest};
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    fixtures, MockDepartmentRepository, MockEngagementRepository, MockTourRepository,
    MockUserRepository, ReviewSummary, ReviewWithAuthor,
};
use crate::domain::{
    ErrorCode, Price, Rating, Review, Tour, TourCategory, TourDetails, UserId,
};

fn service(
    tours: MockTourRepository,
    departments: MockDepartmentRepository,
    engagement: MockEngagementRepository,
    users: MockUserRepository,
) -> CatalogQueryService<
    MockTourRepository,
    MockDepartmentRepository,
    MockEngagementRepository,
    MockUserRepository,
> {
    CatalogQueryService::new(
        Arc::new(tours),
        Arc::new(departments),
        Arc::new(engagement),
        Arc::new(users),
    )
}

fn heritage_tour() -> Tour {
    fixtures::tour_by_id(fixtures::HERITAGE_TOUR_ID, Utc::now())
        .expect("fixture tours build")
        .expect("heritage tour exists")
}

fn detached_draft(organizer: UserId) -> Tour {
    let now = Utc::now();
    let details = TourDetails::try_from_parts(
        "Night Sky Observation",
        "Telescopes on the rooftop, weather permitting.",
        TourCategory::General,
        "Physics Building Roof",
        now + Duration::days(7),
        2,
        15,
        Price::free(),
        None,
    )
    .expect("tour details");
    Tour::new_draft(Uuid::new_v4(), organizer, None, details, now)
}

fn sample_review(tour_id: Uuid) -> Review {
    let now = Utc::now();
    Review {
        id: Uuid::new_v4(),
        tourist: UserId::from_uuid(fixtures::TOURIST_ID),
        tour_id,
        rating: Rating::new(4).expect("rating in range"),
        comment: "Guide knew every corner of the old campus.".to_owned(),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn listing_forwards_filters_to_the_search() {
    let summary = fixtures::summary_of(&heritage_tour()).expect("fixture summary");
    let expected_title = summary.title.clone();
    let mut tours = MockTourRepository::new();
    tours
        .expect_search()
        .withf(|search| {
            search.filters.category == Some(TourCategory::Cultural)
                && search.filters.department == Some(fixtures::ARCH_DEPARTMENT_ID)
                && search.page.per_page() == 5
        })
        .times(1)
        .return_once(move |search| {
            Ok(Page::new(vec![summary], search.page, 1))
        });

    let service = service(
        tours,
        MockDepartmentRepository::new(),
        MockEngagementRepository::new(),
        MockUserRepository::new(),
    );
    let response = service
        .list_tours(ListToursRequest {
            category: Some(TourCategory::Cultural),
            department: Some(fixtures::ARCH_DEPARTMENT_ID),
            per_page: Some(5),
            ..ListToursRequest::default()
        })
        .await
        .expect("listing succeeds");

    assert_eq!(response.tours.total_items, 1);
    assert_eq!(response.tours.items[0].title, expected_title);
}

#[tokio::test]
async fn detail_page_assembles_reviews_related_and_wishlist() {
    let tour = heritage_tour();
    let tour_id = tour.id;
    let related_summary =
        fixtures::summary_of(&fixtures::tours(Utc::now()).expect("fixture tours")[0])
            .expect("fixture summary");
    let department = fixtures::departments()
        .expect("fixture departments")
        .into_iter()
        .find(|dept| dept.id == fixtures::ARCH_DEPARTMENT_ID)
        .expect("arch department");

    let mut tours = MockTourRepository::new();
    tours
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(tour)));
    tours
        .expect_confirmed_participants()
        .times(1)
        .return_once(|_| Ok(fixtures::HERITAGE_TOUR_TAKEN));
    tours
        .expect_related()
        .withf(move |dept, exclude, _, limit| {
            *dept == fixtures::ARCH_DEPARTMENT_ID && *exclude == tour_id && *limit == 3
        })
        .times(1)
        .return_once(move |_, _, _, _| Ok(vec![related_summary]));

    let mut departments = MockDepartmentRepository::new();
    departments
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(department)));

    let mut engagement = MockEngagementRepository::new();
    engagement.expect_review_summary().times(1).return_once(|_| {
        Ok(ReviewSummary {
            average: Some(BigDecimal::from(4)),
            count: 2,
        })
    });
    engagement
        .expect_reviews_for_tour()
        .times(1)
        .return_once(move |_| {
            Ok(vec![ReviewWithAuthor {
                review: sample_review(tour_id),
                author_username: "mira".to_owned(),
            }])
        });
    engagement
        .expect_contains_wishlist()
        .times(1)
        .return_once(|_, _| Ok(true));

    let organizer = fixtures::organizer(Utc::now()).expect("fixture organizer");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(organizer)));

    let service = service(tours, departments, engagement, users);
    let response = service
        .get_tour(GetTourRequest {
            tour_id,
            viewer: Some(UserId::from_uuid(fixtures::TOURIST_ID)),
        })
        .await
        .expect("detail succeeds");

    assert_eq!(
        response.tour.available_spots,
        i64::from(fixtures::FIXTURE_TOUR_CAPACITY) - fixtures::HERITAGE_TOUR_TAKEN
    );
    assert_eq!(response.tour.average_rating, Some(4.0));
    assert_eq!(response.tour.review_count, 2);
    assert_eq!(response.tour.organizer_username, "rahim");
    assert_eq!(
        response.tour.department.as_ref().map(|d| d.code.as_str()),
        Some("ARCH")
    );
    assert_eq!(response.reviews.len(), 1);
    assert_eq!(response.reviews[0].author_username, "mira");
    assert_eq!(response.related.len(), 1);
    assert!(response.in_wishlist);
}

#[tokio::test]
async fn draft_tours_stay_hidden_from_other_viewers() {
    let draft = detached_draft(UserId::from_uuid(fixtures::ORGANIZER_ID));
    let tour_id = draft.id;
    let mut tours = MockTourRepository::new();
    tours
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(draft)));

    let service = service(
        tours,
        MockDepartmentRepository::new(),
        MockEngagementRepository::new(),
        MockUserRepository::new(),
    );
    let error = service
        .get_tour(GetTourRequest {
            tour_id,
            viewer: Some(UserId::from_uuid(fixtures::TOURIST_ID)),
        })
        .await
        .expect_err("draft hidden");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn draft_tours_remain_visible_to_their_organizer() {
    let owner = UserId::from_uuid(fixtures::ORGANIZER_ID);
    let draft = detached_draft(owner.clone());
    let tour_id = draft.id;
    let mut tours = MockTourRepository::new();
    tours
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(draft)));
    tours
        .expect_confirmed_participants()
        .times(1)
        .return_once(|_| Ok(0));

    let mut engagement = MockEngagementRepository::new();
    engagement.expect_review_summary().times(1).return_once(|_| {
        Ok(ReviewSummary {
            average: None,
            count: 0,
        })
    });
    engagement
        .expect_reviews_for_tour()
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    engagement
        .expect_contains_wishlist()
        .times(1)
        .return_once(|_, _| Ok(false));

    let organizer = fixtures::organizer(Utc::now()).expect("fixture organizer");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(organizer)));

    let service = service(tours, MockDepartmentRepository::new(), engagement, users);
    let response = service
        .get_tour(GetTourRequest {
            tour_id,
            viewer: Some(owner),
        })
        .await
        .expect("owner sees the draft");

    assert_eq!(response.tour.status, TourStatus::Draft);
    assert!(!response.tour.is_bookable);
    assert!(response.related.is_empty());
}

#[tokio::test]
async fn detail_page_floors_available_spots_at_zero() {
    let tour = heritage_tour();
    let tour_id = tour.id;
    let mut tours = MockTourRepository::new();
    tours
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(tour)));
    tours
        .expect_confirmed_participants()
        .times(1)
        .return_once(|_| Ok(i64::from(fixtures::FIXTURE_TOUR_CAPACITY) + 5));
    tours
        .expect_related()
        .times(1)
        .return_once(|_, _, _, _| Ok(Vec::new()));

    let mut departments = MockDepartmentRepository::new();
    departments.expect_find().times(1).return_once(|_| Ok(None));

    let mut engagement = MockEngagementRepository::new();
    engagement.expect_review_summary().times(1).return_once(|_| {
        Ok(ReviewSummary {
            average: None,
            count: 0,
        })
    });
    engagement
        .expect_reviews_for_tour()
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let organizer = fixtures::organizer(Utc::now()).expect("fixture organizer");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(organizer)));

    let service = service(tours, departments, engagement, users);
    let response = service
        .get_tour(GetTourRequest {
            tour_id,
            viewer: None,
        })
        .await
        .expect("detail succeeds");

    assert_eq!(response.tour.available_spots, 0);
}

#[tokio::test]
async fn department_tours_requires_a_known_department() {
    let mut departments = MockDepartmentRepository::new();
    departments.expect_find().times(1).return_once(|_| Ok(None));

    let service = service(
        MockTourRepository::new(),
        departments,
        MockEngagementRepository::new(),
        MockUserRepository::new(),
    );
    let error = service
        .department_tours(DepartmentToursRequest {
            department_id: Uuid::new_v4(),
            page: None,
            per_page: None,
        })
        .await
        .expect_err("unknown department");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn my_tours_refuses_non_organizers() {
    let tourist = fixtures::tourist(Utc::now()).expect("fixture tourist");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(tourist)));

    let service = service(
        MockTourRepository::new(),
        MockDepartmentRepository::new(),
        MockEngagementRepository::new(),
        users,
    );
    let error = service
        .my_tours(MyToursRequest {
            organizer_id: UserId::from_uuid(fixtures::TOURIST_ID),
            page: None,
            per_page: None,
        })
        .await
        .expect_err("tourist refused");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}
