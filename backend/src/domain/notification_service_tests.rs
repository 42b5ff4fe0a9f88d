//! Tests for notification services.

use std::sync::Arc;

use chrono::{Duration, Utc};
use pagination::Page;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    fixtures, InboxEntry, MockNotificationRepository, MockTourRepository, MockUserRepository,
    SentNotification,
};
use crate::domain::{ErrorCode, Tour, UserId};

fn organizer_id() -> UserId {
    UserId::from_uuid(fixtures::ORGANIZER_ID)
}

fn command_service(
    notifications: MockNotificationRepository,
    tours: MockTourRepository,
    users: MockUserRepository,
) -> NotificationCommandService<MockNotificationRepository, MockTourRepository, MockUserRepository>
{
    NotificationCommandService::new(Arc::new(notifications), Arc::new(tours), Arc::new(users))
}

fn query_service(
    notifications: MockNotificationRepository,
    users: MockUserRepository,
) -> NotificationQueryService<MockNotificationRepository, MockUserRepository> {
    NotificationQueryService::new(Arc::new(notifications), Arc::new(users))
}

fn mock_organizer_lookup() -> MockUserRepository {
    let organizer = fixtures::organizer(Utc::now()).expect("fixture organizer");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(organizer)));
    users
}

fn fixture_tour(id: Uuid) -> Tour {
    fixtures::tour_by_id(id, Utc::now())
        .expect("fixture tours build")
        .expect("fixture tour exists")
}

fn send_request() -> SendNotificationRequest {
    SendNotificationRequest {
        organizer_id: organizer_id(),
        title: "Gate change".to_owned(),
        message: "Meet at the north gate instead.".to_owned(),
        kind: NotificationKind::Update,
        send_to_all: false,
        tour_id: Some(fixtures::HERITAGE_TOUR_ID),
        scheduled_for: None,
    }
}

#[tokio::test]
async fn sending_to_a_tours_bookers_fans_out_once() {
    let users = mock_organizer_lookup();
    let mut tours = MockTourRepository::new();
    let heritage = fixture_tour(fixtures::HERITAGE_TOUR_ID);
    tours
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(heritage)));
    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_create()
        .withf(|notification| {
            notification.content.title == "Gate change"
                && notification.content.kind == NotificationKind::Update
                && notification.audience == Audience::TourBookers(fixtures::HERITAGE_TOUR_ID)
                && notification.is_sent
        })
        .times(1)
        .return_once(|_| Ok(()));
    notifications
        .expect_fan_out()
        .withf(|_, audience, _| *audience == Audience::TourBookers(fixtures::HERITAGE_TOUR_ID))
        .times(1)
        .return_once(|_, _, _| Ok(12));

    let service = command_service(notifications, tours, users);
    let response = service
        .send_notification(send_request())
        .await
        .expect("send succeeds");

    assert_eq!(response.recipients, 12);
}

#[tokio::test]
async fn sending_to_every_tourist_skips_the_tour_scope() {
    let users = mock_organizer_lookup();
    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_create()
        .withf(|notification| notification.audience == Audience::AllTourists)
        .times(1)
        .return_once(|_| Ok(()));
    notifications
        .expect_fan_out()
        .withf(|_, audience, _| *audience == Audience::AllTourists)
        .times(1)
        .return_once(|_, _, _| Ok(40));

    // No tour lookup is expected even though a tour id rides along.
    let service = command_service(notifications, MockTourRepository::new(), users);
    let mut request = send_request();
    request.send_to_all = true;
    let response = service
        .send_notification(request)
        .await
        .expect("send succeeds");

    assert_eq!(response.recipients, 40);
}

#[tokio::test]
async fn sending_requires_owning_the_scoped_tour() {
    let users = mock_organizer_lookup();
    let mut tours = MockTourRepository::new();
    let mut foreign = fixture_tour(fixtures::HERITAGE_TOUR_ID);
    foreign.organizer = UserId::random();
    tours
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(foreign)));

    let service = command_service(MockNotificationRepository::new(), tours, users);
    let error = service
        .send_notification(send_request())
        .await
        .expect_err("foreign tour rejected");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn sending_rejects_blank_titles() {
    let users = mock_organizer_lookup();
    let service = command_service(
        MockNotificationRepository::new(),
        MockTourRepository::new(),
        users,
    );
    let mut request = send_request();
    request.title = "   ".to_owned();

    let error = service
        .send_notification(request)
        .await
        .expect_err("blank title rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn quick_reminder_composes_title_and_scope() {
    let users = mock_organizer_lookup();
    let heritage = fixture_tour(fixtures::HERITAGE_TOUR_ID);
    let title = format!("Reminder: {}", heritage.details.title);
    let location = heritage.details.location.clone();
    let mut tours = MockTourRepository::new();
    // Looked up once to compose the reminder, once more inside the send.
    let tour = heritage.clone();
    tours
        .expect_find()
        .times(2)
        .returning(move |_| Ok(Some(tour.clone())));
    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_create()
        .withf(move |notification| {
            notification.content.title == title
                && notification.content.kind == NotificationKind::Reminder
                && notification.content.message.contains(&location)
                && notification.audience == Audience::TourBookers(fixtures::HERITAGE_TOUR_ID)
        })
        .times(1)
        .return_once(|_| Ok(()));
    notifications
        .expect_fan_out()
        .times(1)
        .return_once(|_, _, _| Ok(2));

    let service = command_service(notifications, tours, users);
    let response = service
        .quick_reminder(QuickReminderRequest {
            organizer_id: organizer_id(),
            tour_id: fixtures::HERITAGE_TOUR_ID,
        })
        .await
        .expect("reminder sends");

    assert_eq!(response.recipients, 2);
}

#[tokio::test]
async fn mark_read_flips_an_owned_entry() {
    let entry_id = Uuid::new_v4();
    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_mark_read()
        .withf(move |user, entry, _| {
            *user.as_uuid() == fixtures::TOURIST_ID && *entry == entry_id
        })
        .times(1)
        .return_once(|_, _, _| Ok(true));

    let service = command_service(
        notifications,
        MockTourRepository::new(),
        MockUserRepository::new(),
    );
    service
        .mark_read(MarkReadRequest {
            user_id: UserId::from_uuid(fixtures::TOURIST_ID),
            entry_id,
        })
        .await
        .expect("entry marked");
}

#[tokio::test]
async fn mark_read_rejects_foreign_entries() {
    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_mark_read()
        .times(1)
        .return_once(|_, _, _| Ok(false));

    let service = command_service(
        notifications,
        MockTourRepository::new(),
        MockUserRepository::new(),
    );
    let error = service
        .mark_read(MarkReadRequest {
            user_id: UserId::random(),
            entry_id: Uuid::new_v4(),
        })
        .await
        .expect_err("foreign entry hidden");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn mark_all_read_reports_the_flipped_count() {
    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_mark_all_read()
        .times(1)
        .return_once(|_, _| Ok(7));

    let service = command_service(
        notifications,
        MockTourRepository::new(),
        MockUserRepository::new(),
    );
    let response = service
        .mark_all_read(MarkAllReadRequest {
            user_id: UserId::from_uuid(fixtures::TOURIST_ID),
        })
        .await
        .expect("inbox cleared");

    assert_eq!(response.marked, 7);
}

#[tokio::test]
async fn sent_history_pages_with_delivery_tallies() {
    let users = mock_organizer_lookup();
    let mut notifications = MockNotificationRepository::new();
    let sent = SentNotification {
        notification: Notification {
            id: Uuid::new_v4(),
            organizer: organizer_id(),
            audience: Audience::TourBookers(fixtures::HERITAGE_TOUR_ID),
            content: NotificationContent::try_from_parts(
                "Gate change",
                "Meet at the north gate instead.",
                NotificationKind::Update,
            )
            .expect("valid content"),
            is_sent: true,
            scheduled_for: None,
            created_at: Utc::now(),
        },
        recipients: 12,
        read_count: 4,
    };
    notifications
        .expect_sent_by_organizer()
        .withf(|organizer, _| *organizer.as_uuid() == fixtures::ORGANIZER_ID)
        .times(1)
        .return_once(move |_, page| Ok(Page::new(vec![sent], page, 1)));

    let service = query_service(notifications, users);
    let response = service
        .sent_notifications(SentNotificationsRequest {
            organizer_id: organizer_id(),
            page: None,
            per_page: None,
        })
        .await
        .expect("history lists");

    let row = &response.notifications.items[0];
    assert_eq!(row.recipients, 12);
    assert_eq!(row.read_count, 4);
    assert_eq!(row.tour_id, Some(fixtures::HERITAGE_TOUR_ID));
}

#[tokio::test]
async fn recent_notifications_stamps_relative_times_and_badge() {
    let mut notifications = MockNotificationRepository::new();
    let entry = InboxEntry {
        id: Uuid::new_v4(),
        title: "Gate change".to_owned(),
        message: "Meet at the north gate instead.".to_owned(),
        kind: NotificationKind::Update,
        is_read: false,
        created_at: Utc::now() - Duration::hours(2),
    };
    notifications
        .expect_recent_for_user()
        .withf(|_, limit| *limit == 10)
        .times(1)
        .return_once(move |_, _| Ok(vec![entry]));
    notifications
        .expect_unread_count()
        .times(1)
        .return_once(|_| Ok(3));

    let service = query_service(notifications, MockUserRepository::new());
    let response = service
        .recent_notifications(RecentNotificationsRequest {
            user_id: UserId::from_uuid(fixtures::TOURIST_ID),
            limit: None,
        })
        .await
        .expect("inbox loads");

    assert_eq!(response.notifications[0].time_ago, "2h ago");
    assert!(!response.notifications[0].is_read);
    assert_eq!(response.unread_count, 3);
}

#[tokio::test]
async fn recent_notifications_clamps_oversized_limits() {
    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_recent_for_user()
        .withf(|_, limit| *limit == 50)
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));
    notifications
        .expect_unread_count()
        .times(1)
        .return_once(|_| Ok(0));

    let service = query_service(notifications, MockUserRepository::new());
    let response = service
        .recent_notifications(RecentNotificationsRequest {
            user_id: UserId::random(),
            limit: Some(500),
        })
        .await
        .expect("inbox loads");

    assert!(response.notifications.is_empty());
}

#[tokio::test]
async fn unread_badge_reports_the_stored_count() {
    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_unread_count()
        .withf(|user| *user.as_uuid() == fixtures::TOURIST_ID)
        .times(1)
        .return_once(|_| Ok(5));

    let service = query_service(notifications, MockUserRepository::new());
    let response = service
        .unread_count(UnreadCountRequest {
            user_id: UserId::from_uuid(fixtures::TOURIST_ID),
        })
        .await
        .expect("count loads");

    assert_eq!(response.unread_count, 5);
}
