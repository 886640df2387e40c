//! Handler tests for the parking endpoints.

use actix_web::http::StatusCode;
use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{
    Coordinate, GeocodedPlace, NearbyParking, ParkingHistoryEntry, ParkingSpot, SavedParkingSpot,
    SearchRadius, UserSession,
};
use crate::inbound::http::test_utils::{
    MockPorts, sign_in_route, signed_in_cookie, test_session_middleware, test_user_session,
};

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(ports.into_state())
        .wrap(test_session_middleware())
        .configure(sign_in_route)
        .service(
            web::scope("/api/v1")
                .service(nearby)
                .service(search)
                .service(save_spot)
                .service(record_visit),
        )
}

fn origin() -> Coordinate {
    Coordinate::new(14.5995, 120.9842).expect("coordinate")
}

fn ranked(radius: SearchRadius) -> NearbyParking {
    let spot = |id: i64, name: &str, distance: f64| {
        ParkingSpot::with_distance(ParkingSpotId::from_osm("node", id), name, origin(), distance)
            .expect("spot")
    };
    NearbyParking {
        origin: origin(),
        radius,
        spots: vec![spot(1, "Lot A", 50.0), spot(2, "Lot B", 800.0)],
        place: None,
    }
}

#[actix_web::test]
async fn nearby_returns_ranked_spots() {
    let mut ports = MockPorts::default();
    ports
        .nearby
        .expect_nearby()
        .withf(|request| {
            request.origin == origin()
                && request.radius.meters() == 1000.0
                && request.name_filter.as_deref() == Some("lot")
        })
        .times(1)
        .returning(|request| Ok(ranked(request.radius)));
    let app = test::init_service(test_app(ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/parking/nearby?lat=14.5995&lng=120.9842&name=%20lot%20")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["radiusMeters"], json!(1000.0));
    let names: Vec<&str> = body["spots"]
        .as_array()
        .expect("spots array")
        .iter()
        .filter_map(|spot| spot["name"].as_str())
        .collect();
    assert_eq!(names, ["Lot A", "Lot B"]);
    assert_eq!(body["spots"][0]["distanceMeters"], json!(50));
    assert_eq!(body["spots"][0]["etaMinutes"], json!(1));
    assert!(body.get("place").is_none());
}

#[rstest]
#[case("/api/v1/parking/nearby?lat=100&lng=120", "latitude")]
#[case("/api/v1/parking/nearby?lat=14&lng=120&radius=0", "radiusMeters")]
#[case("/api/v1/parking/search?q=mall&radius=9000", "radiusMeters")]
#[actix_web::test]
async fn invalid_parameters_are_rejected(#[case] uri: &str, #[case] field: &str) {
    let app = test::init_service(test_app(MockPorts::default())).await;

    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Error = test::read_body_json(res).await;
    let details = body.details().expect("details");
    assert_eq!(details["field"], json!(field));
}

#[actix_web::test]
async fn search_includes_the_matched_place() {
    let mut ports = MockPorts::default();
    ports
        .nearby
        .expect_search()
        .withf(|request| request.query == "SM Megamall" && request.radius.meters() == 800.0)
        .times(1)
        .returning(|request| {
            let mut result = ranked(request.radius);
            result.place = Some(GeocodedPlace {
                display_name: "SM Megamall, Mandaluyong".to_owned(),
                coordinate: origin(),
            });
            Ok(result)
        });
    let app = test::init_service(test_app(ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/parking/search?q=SM%20Megamall&radius=800")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["place"]["displayName"], json!("SM Megamall, Mandaluyong"));
}

#[actix_web::test]
async fn search_without_match_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .nearby
        .expect_search()
        .returning(|_| Err(Error::not_found("no place matched the search")));
    let app = test::init_service(test_app(ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/parking/search?q=Atlantis")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

fn spot_payload() -> Value {
    json!({
        "parkingId": "way/42",
        "name": "SM Megamall Parking",
        "latitude": 14.5849,
        "longitude": 121.0563,
    })
}

#[actix_web::test]
async fn saving_requires_login() {
    let app = test::init_service(test_app(MockPorts::default())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/parking/saved")
            .set_json(spot_payload())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn signed_in_user_can_save_and_record() {
    let mut ports = MockPorts::default();
    ports
        .records
        .expect_save_spot()
        .withf(|session: &UserSession, record: &ParkingSpotRecord| {
            *session == test_user_session() && record.parking_id().as_ref() == "way/42"
        })
        .times(1)
        .returning(|session, spot| {
            Ok(SavedParkingSpot {
                user_id: session.user_id,
                spot,
                saved_at: chrono::Utc::now(),
            })
        });
    ports
        .records
        .expect_record_visit()
        .times(1)
        .returning(|session, spot| {
            Ok(ParkingHistoryEntry {
                user_id: session.user_id,
                spot,
                parked_at: chrono::Utc::now(),
            })
        });
    let app = test::init_service(test_app(ports)).await;
    let cookie = signed_in_cookie(&app).await;

    for uri in ["/api/v1/parking/saved", "/api/v1/parking/history"] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(uri)
                .cookie(cookie.clone())
                .set_json(spot_payload())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT, "{uri}");
    }
}

#[actix_web::test]
async fn blank_spot_name_is_rejected() {
    let app = test::init_service(test_app(MockPorts::default())).await;
    let cookie = signed_in_cookie(&app).await;
    let mut payload = spot_payload();
    payload["name"] = json!("  ");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/parking/saved")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Error = test::read_body_json(res).await;
    assert_eq!(
        body.details(),
        Some(&json!({"field": "name", "code": "empty_value"}))
    );
}
