use std::sync::Arc;

use reqwest::multipart::Form;

use crate::common::{
    MAX_UPLOAD_SIZE, TestApp, UnavailableRepository, image_part, routes, tea_form,
};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n-not-really-a-png-";

mod health {
    use super::*;

    #[tokio::test]
    async fn root_reports_liveness() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::HEALTH).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"].as_str().unwrap(), "ok");
    }

    #[tokio::test]
    async fn root_does_not_touch_the_database() {
        let app = TestApp::spawn_with(Arc::new(UnavailableRepository)).await;

        let res = app.get(routes::HEALTH).await;

        assert_eq!(res.status, 200);
    }
}

mod create_and_list {
    use super::*;

    #[tokio::test]
    async fn json_item_without_image_lists_with_defaults() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::MENU,
                &serde_json::json!({ "name": "Tea", "price": 10, "category": "Drinks" }),
            )
            .await;
        assert_eq!(res.status, 201, "create failed: {}", res.text);
        assert_eq!(
            res.body["message"].as_str().unwrap(),
            "Item added successfully"
        );

        let items = app.list_menu().await;
        assert_eq!(items.len(), 1);
        let tea = &items[0];
        assert_eq!(tea["name"].as_str().unwrap(), "Tea");
        assert_eq!(tea["price"].as_f64().unwrap(), 10.0);
        assert_eq!(tea["category"].as_str().unwrap(), "Drinks");
        assert_eq!(tea["orders"].as_i64().unwrap(), 0);
        assert_eq!(tea["image"].as_str().unwrap(), "");
        assert!(tea["_id"].as_str().is_some());
        assert!(tea["createdAt"].as_str().is_some());
    }

    #[tokio::test]
    async fn multipart_item_without_image() {
        let app = TestApp::spawn().await;

        let res = app.post_form(routes::MENU, tea_form()).await;
        assert_eq!(res.status, 201, "create failed: {}", res.text);
        assert_eq!(res.body["item"]["image"].as_str().unwrap(), "");
        assert_eq!(res.body["item"]["orders"].as_i64().unwrap(), 0);

        let items = app.list_menu().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["_id"], res.body["item"]["_id"]);
        assert_eq!(app.stored_files(), 0);
    }

    #[tokio::test]
    async fn optional_fields_are_kept() {
        let app = TestApp::spawn().await;

        let form = tea_form()
            .text("subCategory", "Hot")
            .text("rating", "4.5")
            .text("orders", "7");
        let res = app.post_form(routes::MENU, form).await;
        assert_eq!(res.status, 201, "create failed: {}", res.text);

        let items = app.list_menu().await;
        assert_eq!(items[0]["subCategory"].as_str().unwrap(), "Hot");
        assert_eq!(items[0]["rating"].as_str().unwrap(), "4.5");
        assert_eq!(items[0]["orders"].as_i64().unwrap(), 7);
    }

    #[tokio::test]
    async fn non_numeric_orders_defaults_to_zero() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(routes::MENU, tea_form().text("orders", "lots"))
            .await;
        assert_eq!(res.status, 201, "create failed: {}", res.text);

        let items = app.list_menu().await;
        assert_eq!(items[0]["orders"].as_i64().unwrap(), 0);
    }

    #[tokio::test]
    async fn image_upload_resolves_to_served_url() {
        let app = TestApp::spawn().await;

        let form = tea_form().part("image", image_part("masala.PNG", PNG_BYTES.to_vec(), "image/png"));
        let res = app.post_form(routes::MENU, form).await;
        assert_eq!(res.status, 201, "create failed: {}", res.text);

        let items = app.list_menu().await;
        let image_url = items[0]["image"].as_str().unwrap().to_string();
        let prefix = format!("http://{}/uploads/", app.addr);
        assert!(
            image_url.starts_with(&prefix),
            "unexpected image url {image_url}"
        );
        assert!(image_url.ends_with(".png"));
        assert!(!image_url.contains("masala"));

        let (status, bytes) = app.fetch_bytes(&image_url).await;
        assert_eq!(status, 200);
        assert_eq!(bytes, PNG_BYTES);
        assert_eq!(app.stored_files(), 1);
    }

    #[tokio::test]
    async fn image_part_may_come_before_text_fields() {
        let app = TestApp::spawn().await;

        let form = Form::new()
            .part("image", image_part("a.jpg", PNG_BYTES.to_vec(), "image/jpeg"))
            .text("name", "Coffee")
            .text("price", "25.5")
            .text("category", "Drinks");
        let res = app.post_form(routes::MENU, form).await;
        assert_eq!(res.status, 201, "create failed: {}", res.text);
        assert_eq!(res.body["item"]["price"].as_f64().unwrap(), 25.5);
        assert!(res.body["item"]["image"].as_str().unwrap().ends_with(".jpg"));
    }

    #[tokio::test]
    async fn empty_file_input_means_no_image() {
        let app = TestApp::spawn().await;

        let form = tea_form().part(
            "image",
            image_part("", Vec::new(), "application/octet-stream"),
        );
        let res = app.post_form(routes::MENU, form).await;
        assert_eq!(res.status, 201, "create failed: {}", res.text);
        assert_eq!(res.body["item"]["image"].as_str().unwrap(), "");
        assert_eq!(app.stored_files(), 0);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let app = TestApp::spawn().await;

        for name in ["Idli", "Dosa", "Vada"] {
            let body = serde_json::json!({ "name": name, "price": "30", "category": "Breakfast" });
            let res = app.post_json(routes::MENU, &body).await;
            assert_eq!(res.status, 201, "create failed: {}", res.text);
        }

        let names: Vec<_> = app
            .list_menu()
            .await
            .iter()
            .map(|item| item["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["Idli", "Dosa", "Vada"]);
    }

    #[tokio::test]
    async fn repeated_list_is_identical() {
        let app = TestApp::spawn().await;
        app.post_form(routes::MENU, tea_form()).await;
        app.post_form(
            routes::MENU,
            tea_form().part("image", image_part("x.gif", b"GIF89a".to_vec(), "image/gif")),
        )
        .await;

        let first = app.get(routes::MENU).await;
        let second = app.get(routes::MENU).await;

        assert_eq!(first.status, 200);
        assert_eq!(first.text, second.text);
    }

    #[tokio::test]
    async fn empty_menu_is_an_empty_array() {
        let app = TestApp::spawn().await;
        assert!(app.list_menu().await.is_empty());
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn each_missing_required_field_is_rejected() {
        let app = TestApp::spawn().await;

        let cases = [
            ("name", Form::new().text("price", "10").text("category", "Drinks")),
            ("price", Form::new().text("name", "Tea").text("category", "Drinks")),
            ("category", Form::new().text("name", "Tea").text("price", "10")),
        ];

        for (field, form) in cases {
            let res = app.post_form(routes::MENU, form).await;
            assert_eq!(res.status, 400, "missing {field}: {}", res.text);
            assert_eq!(res.error_code(), "VALIDATION_ERROR");
            assert!(
                res.body["error"].as_str().unwrap().contains(field),
                "error should name '{field}': {}",
                res.text
            );
        }

        assert!(app.list_menu().await.is_empty());
    }

    #[tokio::test]
    async fn non_numeric_price_is_rejected() {
        let app = TestApp::spawn().await;

        let body = serde_json::json!({ "name": "Tea", "price": "ten", "category": "Drinks" });
        let res = app.post_json(routes::MENU, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
        assert!(app.list_menu().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_form_with_image_stores_nothing() {
        let app = TestApp::spawn().await;

        let form = Form::new()
            .text("price", "10")
            .part("image", image_part("a.png", PNG_BYTES.to_vec(), "image/png"));
        let res = app.post_form(routes::MENU, form).await;

        assert_eq!(res.status, 400);
        assert_eq!(app.stored_files(), 0);
        assert!(app.list_menu().await.is_empty());
    }

    #[tokio::test]
    async fn unsupported_body_type_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .post(app.url(routes::MENU))
            .header("Content-Type", "text/plain")
            .body("name=Tea")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .post(app.url(routes::MENU))
            .header("Content-Type", "application/json")
            .body("{\"name\": ")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 400);
    }
}

mod uploads {
    use super::*;

    #[tokio::test]
    async fn non_image_upload_creates_nothing() {
        let app = TestApp::spawn().await;

        let form = tea_form().part(
            "image",
            image_part("notes.txt", b"plain text".to_vec(), "text/plain"),
        );
        let res = app.post_form(routes::MENU, form).await;

        assert_eq!(res.status, 415, "{}", res.text);
        assert_eq!(res.error_code(), "INVALID_MEDIA_TYPE");
        assert_eq!(app.stored_files(), 0);
        assert!(app.list_menu().await.is_empty());
    }

    #[tokio::test]
    async fn oversized_upload_creates_nothing() {
        let app = TestApp::spawn().await;

        let too_big = vec![0u8; MAX_UPLOAD_SIZE as usize + 1];
        let form = tea_form().part("image", image_part("big.png", too_big, "image/png"));
        let res = app.post_form(routes::MENU, form).await;

        assert_eq!(res.status, 413, "{}", res.text);
        assert_eq!(res.error_code(), "PAYLOAD_TOO_LARGE");
        assert_eq!(app.stored_files(), 0);
        assert!(app.list_menu().await.is_empty());
    }

    #[tokio::test]
    async fn upload_at_the_size_limit_is_accepted() {
        let app = TestApp::spawn().await;

        let exact = vec![0u8; MAX_UPLOAD_SIZE as usize];
        let form = tea_form().part("image", image_part("max.png", exact, "image/png"));
        let res = app.post_form(routes::MENU, form).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(app.stored_files(), 1);
    }

    #[tokio::test]
    async fn second_image_part_is_rejected() {
        let app = TestApp::spawn().await;

        let form = tea_form()
            .part("image", image_part("a.png", PNG_BYTES.to_vec(), "image/png"))
            .part("image", image_part("b.png", PNG_BYTES.to_vec(), "image/png"));
        let res = app.post_form(routes::MENU, form).await;

        assert_eq!(res.status, 400);
        assert_eq!(app.stored_files(), 0);
        assert!(app.list_menu().await.is_empty());
    }

    #[tokio::test]
    async fn missing_upload_is_not_found() {
        let app = TestApp::spawn().await;

        let (status, _) = app.fetch_bytes(&app.url("/uploads/missing.png")).await;

        assert_eq!(status, 404);
    }
}

mod repository_failures {
    use super::*;

    #[tokio::test]
    async fn list_fails_with_server_error_payload() {
        let app = TestApp::spawn_with(Arc::new(UnavailableRepository)).await;

        let res = app.get(routes::MENU).await;

        assert_eq!(res.status, 503);
        assert_eq!(res.error_code(), "REPOSITORY_UNAVAILABLE");
        assert!(res.body["error"].as_str().is_some());
        assert!(!res.text.contains("connection refused"));
    }

    #[tokio::test]
    async fn failed_create_removes_the_uploaded_image() {
        let app = TestApp::spawn_with(Arc::new(UnavailableRepository)).await;

        let form = tea_form().part("image", image_part("a.png", PNG_BYTES.to_vec(), "image/png"));
        let res = app.post_form(routes::MENU, form).await;

        assert_eq!(res.status, 503);
        assert_eq!(res.error_code(), "REPOSITORY_UNAVAILABLE");
        assert_eq!(app.stored_files(), 0);
    }
}

mod docs {
    use super::*;

    #[tokio::test]
    async fn openapi_document_lists_menu_endpoints() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::OPENAPI).await;

        assert_eq!(res.status, 200);
        assert!(res.body["paths"]["/menu"]["get"].is_object());
        assert!(res.body["paths"]["/menu"]["post"].is_object());
        assert!(res.body["paths"]["/"]["get"].is_object());
    }
}
