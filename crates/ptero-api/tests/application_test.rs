// Integration tests for the application-API managers using wiremock.
#![allow(clippy::unwrap_used)]

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{API_KEY, list, location, setup, user};
use ptero_api::application::{LocationUpdate, NewAllocations, NewLocation};
use ptero_api::{ClientOptions, Credentials, ErrorKind, PteroClient};

#[tokio::test]
async fn list_users() {
    let (mock, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/application/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list(vec![user(1, "ada"), user(2, "grace")])),
        )
        .mount(&mock)
        .await;

    let users = client.users().list().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users.items[1].email, "grace@example.com");
    assert!(!users.items[0].two_factor);
}

#[tokio::test]
async fn location_crud() {
    let (mock, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/application/locations"))
        .and(body_json(json!({ "short": "fra1", "long": "Frankfurt" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(location(7, "fra1")))
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/application/locations/7"))
        .and(body_json(json!({ "long": "Frankfurt am Main" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(location(7, "fra1")))
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/application/locations/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock)
        .await;

    let created = client
        .locations()
        .create(&NewLocation {
            short: "fra1".into(),
            long: "Frankfurt".into(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 7);

    client
        .locations()
        .update(
            7,
            &LocationUpdate {
                long: Some("Frankfurt am Main".into()),
                ..LocationUpdate::default()
            },
        )
        .await
        .unwrap();
    client.locations().delete(7).await.unwrap();
}

#[tokio::test]
async fn wrong_discriminator_on_application_resource() {
    let (mock, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/application/locations/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user(3, "not-a-location")))
        .mount(&mock)
        .await;

    let err = client.locations().get(3).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn create_allocations_expects_no_body() {
    let (mock, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/application/nodes/4/allocations"))
        .and(body_json(json!({ "ip": "10.0.0.5", "ports": ["25565", "25570-25575"] })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock)
        .await;

    client
        .allocations()
        .create(
            4,
            &NewAllocations {
                ip: "10.0.0.5".into(),
                ports: vec!["25565".into(), "25570-25575".into()],
                alias: None,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn database_includes_relationships() {
    let (mock, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/application/servers/12/databases/3"))
        .and(query_param("include", "password,host"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "database",
            "attributes": {
                "id": 3, "server": 12, "host": 1,
                "database": "s12_world", "username": "u12_abc", "remote": "%",
                "max_connections": null,
                "created_at": "2024-01-01T00:00:00+00:00",
                "updated_at": "2024-01-01T00:00:00+00:00",
                "relationships": {
                    "password": {
                        "object": "DatabasePassword",
                        "attributes": { "password": "hunter2" }
                    },
                    "host": {
                        "object": "database_host",
                        "attributes": {
                            "id": 1, "name": "primary", "host": "db.example.com",
                            "port": 3306, "username": "admin", "node": null,
                            "created_at": "2024-01-01T00:00:00+00:00",
                            "updated_at": "2024-01-01T00:00:00+00:00"
                        }
                    }
                }
            }
        })))
        .mount(&mock)
        .await;

    let database = client.databases().get(12, 3).await.unwrap();
    let relationships = database.relationships.unwrap();
    assert_eq!(relationships.password.unwrap().password, "hunter2");
    assert_eq!(relationships.host.unwrap().port, 3306);
}

#[tokio::test]
async fn separate_application_key_is_used_for_application_calls() {
    let mock = MockServer::start().await;
    let credentials = Credentials::new(&mock.uri(), API_KEY)
        .unwrap()
        .with_application_key("ptla_admin_key")
        .unwrap();
    let client = PteroClient::from_credentials(credentials, &ClientOptions::default()).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/application/users"))
        .and(header("authorization", "Bearer ptla_admin_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(vec![])))
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/client/account"))
        .and(header("authorization", "Bearer ptlc_test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "user",
            "attributes": {
                "id": 1, "admin": false, "username": "player",
                "email": "player@example.com", "first_name": "P",
                "last_name": "L", "language": "en"
            }
        })))
        .expect(1)
        .mount(&mock)
        .await;

    assert!(client.users().list().await.unwrap().is_empty());
    assert_eq!(client.account().get_details().await.unwrap().username, "player");
}
