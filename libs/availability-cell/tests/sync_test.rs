use chrono::{NaiveTime, Weekday};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use availability_cell::models::Slot;
use availability_cell::services::schedule::WeeklyAvailability;
use availability_cell::services::sync::{ScheduleOwner, ScheduleSyncService};
use shared_config::AppConfig;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn test_config(mock_server: &MockServer) -> AppConfig {
    AppConfig {
        scheduling_api_url: mock_server.uri(),
        scheduling_api_key: "test-api-key".to_string(),
    }
}

async fn mount_day_enumeration(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/week_days"))
        .and(query_param("order", "id.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Sunday" },
            { "id": 2, "name": "Monday" },
            { "id": 3, "name": "Tuesday" },
            { "id": 4, "name": "Wednesday" },
            { "id": 5, "name": "Thursday" },
            { "id": 6, "name": "Friday" },
            { "id": 7, "name": "Saturday" }
        ])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_fetch_day_map() {
    let mock_server = MockServer::start().await;
    mount_day_enumeration(&mock_server).await;

    let service = ScheduleSyncService::new(&test_config(&mock_server));
    let day_map = service.fetch_day_map("test-token").await.unwrap();

    assert!(day_map.is_complete());
    assert_eq!(day_map.day_id(Weekday::Mon), Some(2));
    assert_eq!(day_map.weekday(6), Some(Weekday::Fri));
}

#[tokio::test]
async fn test_fetch_doctor_schedule() {
    let mock_server = MockServer::start().await;
    mount_day_enumeration(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", "eq.doctor-123"))
        .and(header("apikey", "test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "doctor-123",
            "full_name": "Dr. Jane Doe",
            "doctor_slots": [
                {
                    "day_id": 2,
                    "day_name": "Monday",
                    "start_time": "09:00:00",
                    "end_time": "10:00:00",
                    "capacity": 2,
                    "id": "7f1b6c2e-8a10-4c95-9a67-3d1f0a2b4c5d"
                },
                {
                    "day_id": 6,
                    "start_time": "14:00:00",
                    "end_time": "15:00:00",
                    "capacity": 1
                }
            ]
        }])))
        .mount(&mock_server)
        .await;

    let service = ScheduleSyncService::new(&test_config(&mock_server));
    let day_map = service.fetch_day_map("test-token").await.unwrap();

    let (availability, unresolved) = service
        .fetch_schedule(ScheduleOwner::Doctor, "doctor-123", &day_map, "test-token")
        .await
        .unwrap();

    assert!(unresolved.is_empty());
    let monday = availability.slots_for(Weekday::Mon);
    assert_eq!(monday.len(), 1);
    assert_eq!(monday[0].start_time, t(9, 0));
    assert_eq!(monday[0].capacity, Some(2));
    assert!(monday[0].id.is_some());

    let friday = availability.slots_for(Weekday::Fri);
    assert_eq!(friday.len(), 1);
    assert_eq!(friday[0].id, None);
}

#[tokio::test]
async fn test_fetch_hospital_schedule_reads_operating_hours() {
    let mock_server = MockServer::start().await;
    mount_day_enumeration(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/hospitals"))
        .and(query_param("id", "eq.hospital-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "hospital-9",
            "operating_hours": [
                { "day_id": 2, "start_time": "08:00:00", "end_time": "18:00:00" }
            ]
        }])))
        .mount(&mock_server)
        .await;

    let service = ScheduleSyncService::new(&test_config(&mock_server));
    let day_map = service.fetch_day_map("test-token").await.unwrap();

    let (availability, _) = service
        .fetch_schedule(ScheduleOwner::Hospital, "hospital-9", &day_map, "test-token")
        .await
        .unwrap();

    let monday = availability.slots_for(Weekday::Mon);
    assert_eq!(monday.len(), 1);
    // Operating hours carry no per-slot capacity.
    assert_eq!(monday[0].capacity, None);
}

#[tokio::test]
async fn test_fetch_schedule_with_no_slot_field() {
    let mock_server = MockServer::start().await;
    mount_day_enumeration(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", "eq.doctor-new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "doctor-new",
            "full_name": "Dr. New"
        }])))
        .mount(&mock_server)
        .await;

    let service = ScheduleSyncService::new(&test_config(&mock_server));
    let day_map = service.fetch_day_map("test-token").await.unwrap();

    let (availability, unresolved) = service
        .fetch_schedule(ScheduleOwner::Doctor, "doctor-new", &day_map, "test-token")
        .await
        .unwrap();

    assert!(availability.is_empty());
    assert!(unresolved.is_empty());
}

#[tokio::test]
async fn test_fetch_schedule_entity_not_found() {
    let mock_server = MockServer::start().await;
    mount_day_enumeration(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", "eq.missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = ScheduleSyncService::new(&test_config(&mock_server));
    let day_map = service.fetch_day_map("test-token").await.unwrap();

    let result = service
        .fetch_schedule(ScheduleOwner::Doctor, "missing", &day_map, "test-token")
        .await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));
}

#[tokio::test]
async fn test_save_doctor_schedule_submits_doctor_slots() {
    let mock_server = MockServer::start().await;
    mount_day_enumeration(&mock_server).await;

    let expected_body = json!({
        "doctor_slots": [
            {
                "day_id": 2,
                "day_name": "Monday",
                "start_time": "09:00:00",
                "end_time": "10:00:00",
                "capacity": 2
            }
        ]
    });

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", "eq.doctor-123"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "doctor-123" }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = ScheduleSyncService::new(&test_config(&mock_server));
    let day_map = service.fetch_day_map("test-token").await.unwrap();

    let mut availability = WeeklyAvailability::new();
    availability
        .add(Weekday::Mon, Slot::new(t(9, 0), t(10, 0), Some(2)))
        .unwrap();

    let unresolved = service
        .save_schedule(ScheduleOwner::Doctor, "doctor-123", &availability, &day_map, "test-token")
        .await
        .unwrap();

    assert!(unresolved.is_empty());
}

#[tokio::test]
async fn test_save_hospital_schedule_submits_operating_hrs() {
    let mock_server = MockServer::start().await;
    mount_day_enumeration(&mock_server).await;

    let expected_body = json!({
        "operating_hrs": [
            {
                "day_id": 4,
                "day_name": "Wednesday",
                "start_time": "08:00:00",
                "end_time": "18:00:00"
            }
        ]
    });

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/hospitals"))
        .and(query_param("id", "eq.hospital-9"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "hospital-9" }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = ScheduleSyncService::new(&test_config(&mock_server));
    let day_map = service.fetch_day_map("test-token").await.unwrap();

    let mut availability = WeeklyAvailability::new();
    availability
        .add(Weekday::Wed, Slot::new(t(8, 0), t(18, 0), None))
        .unwrap();

    service
        .save_schedule(ScheduleOwner::Hospital, "hospital-9", &availability, &day_map, "test-token")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_save_reports_unresolved_days_but_still_saves() {
    let mock_server = MockServer::start().await;

    // Day enumeration with no Sunday row.
    Mock::given(method("GET"))
        .and(path("/rest/v1/week_days"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 2, "name": "Monday" }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "doctor-123" }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = ScheduleSyncService::new(&test_config(&mock_server));
    let day_map = service.fetch_day_map("test-token").await.unwrap();

    let mut availability = WeeklyAvailability::new();
    availability.add(Weekday::Sun, Slot::new(t(9, 0), t(10, 0), Some(1))).unwrap();
    availability.add(Weekday::Mon, Slot::new(t(9, 0), t(10, 0), Some(1))).unwrap();

    let unresolved = service
        .save_schedule(ScheduleOwner::Doctor, "doctor-123", &availability, &day_map, "test-token")
        .await
        .unwrap();

    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].day, Some(Weekday::Sun));
}

#[tokio::test]
async fn test_backend_auth_error_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/week_days"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&mock_server)
        .await;

    let service = ScheduleSyncService::new(&test_config(&mock_server));
    let result = service.fetch_day_map("bad-token").await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Authentication error"));
}
