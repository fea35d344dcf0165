//! Status-code classification tests for the management and metadata
//! operations, against the scripted mock transport.

mod common;

use common::{file_json, link_json, mock_client, MockTransport};
use serde_json::json;
use yadisk_core::client::{
    ApiVersionOutcome, CopyOutcome, DeleteOutcome, MakeFolderOutcome, MetainfoOutcome,
    MoveOutcome, OperationOutcome, PropertiesOutcome, PublishOutcome, RestoreOutcome,
    SavePublicOutcome,
};
use yadisk_core::errors::DiskError;
use yadisk_core::path::DiskPath;

// --- Copy and move ------------------------------------------------------

#[tokio::test]
async fn copy_201_is_done_with_link() {
    let mock = MockTransport::new();
    mock.respond("resources/copy", 201, link_json("https://disk.example/op/1", "GET"));
    let client = mock_client(&mock);

    match client
        .copy_path(&DiskPath::disk("b.png"), &DiskPath::disk("a.png"), None, None)
        .value()
        .await
    {
        CopyOutcome::Done(link) => {
            assert_eq!(link.href, "https://disk.example/op/1");
            assert_eq!(link.method, "GET");
        }
        other => panic!("expected done, got {other:?}"),
    }
    let url = &mock.request_urls()[0];
    assert!(url.contains("path=disk%3A%2Fb.png"));
    assert!(url.contains("from=disk%3A%2Fa.png"));
    assert!(!url.contains("overwrite"));
}

#[tokio::test]
async fn copy_202_is_in_process() {
    let mock = MockTransport::new();
    mock.respond("resources/copy", 202, link_json("https://disk.example/op/2", "GET"));
    let client = mock_client(&mock);

    assert!(matches!(
        client
            .copy_path(&DiskPath::disk("b"), &DiskPath::disk("a"), Some(true), None)
            .value()
            .await,
        CopyOutcome::InProcess(_)
    ));
    assert!(mock.request_urls()[0].contains("overwrite=true"));
}

#[tokio::test]
async fn copy_404_fails_with_api_error_carrying_the_body() {
    let mock = MockTransport::new();
    mock.respond("resources/copy", 404, json!({"error": "DiskNotFoundError"}));
    let client = mock_client(&mock);

    match client
        .copy_path(&DiskPath::disk("b"), &DiskPath::disk("a"), None, None)
        .value()
        .await
    {
        CopyOutcome::Failed(DiskError::Api { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, Some(json!({"error": "DiskNotFoundError"})));
        }
        other => panic!("expected api failure, got {other:?}"),
    }
}

#[tokio::test]
async fn move_shares_the_copy_status_mapping() {
    let mock = MockTransport::new();
    mock.respond("resources/move", 201, link_json("https://disk.example/op/3", "GET"));
    let client = mock_client(&mock);

    assert!(matches!(
        client
            .move_path(&DiskPath::disk("b"), &DiskPath::disk("a"), None, None)
            .value()
            .await,
        MoveOutcome::Done(_)
    ));
}

// --- Deletion -----------------------------------------------------------

#[tokio::test]
async fn delete_204_is_done() {
    let mock = MockTransport::new();
    mock.respond_raw("resources?path=", 204, b"");
    let client = mock_client(&mock);

    assert!(matches!(
        client
            .delete_path(&DiskPath::disk("old.txt"), None, None)
            .value()
            .await,
        DeleteOutcome::Done
    ));
}

#[tokio::test]
async fn delete_202_is_in_process() {
    let mock = MockTransport::new();
    mock.respond("resources?path=", 202, link_json("https://disk.example/op/4", "GET"));
    let client = mock_client(&mock);

    assert!(matches!(
        client
            .delete_path(&DiskPath::disk("big-folder"), Some(true), None)
            .value()
            .await,
        DeleteOutcome::InProcess(_)
    ));
    assert!(mock.request_urls()[0].contains("permanently=true"));
}

#[tokio::test]
async fn delete_trash_path_uses_trash_endpoint() {
    let mock = MockTransport::new();
    mock.respond_raw("trash/resources", 204, b"");
    let client = mock_client(&mock);

    assert!(matches!(
        client
            .delete_path(&DiskPath::trash("old.txt"), None, None)
            .value()
            .await,
        DeleteOutcome::Done
    ));
    assert!(mock.request_urls()[0].contains("/v1/disk/trash/resources/"));
}

#[test]
#[should_panic(expected = "trash resources do not support")]
fn delete_trash_with_permanently_is_a_usage_error() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let _guard = runtime.enter();
    let mock = MockTransport::new();
    let client = mock_client(&mock);
    client.delete_path(&DiskPath::trash("x"), Some(true), None);
}

#[tokio::test]
async fn empty_trash_deletes_the_trash_root() {
    let mock = MockTransport::new();
    mock.respond_raw("trash/resources", 204, b"");
    let client = mock_client(&mock);

    assert!(matches!(
        client.empty_trash(None).value().await,
        DeleteOutcome::Done
    ));
    assert!(mock.request_urls()[0].contains("path=trash%3A%2F"));
}

// --- Folders, restore, publishing ---------------------------------------

#[tokio::test]
async fn make_folder_201_is_created() {
    let mock = MockTransport::new();
    mock.respond("resources?path=", 201, link_json("https://disk.example/music", "GET"));
    let client = mock_client(&mock);

    assert!(matches!(
        client.make_folder(&DiskPath::disk("Music"), None).value().await,
        MakeFolderOutcome::Created(_)
    ));
}

#[tokio::test]
async fn make_folder_other_status_fails() {
    let mock = MockTransport::new();
    mock.respond("resources?path=", 409, json!({"error": "DiskPathPointsToExistentDirectoryError"}));
    let client = mock_client(&mock);

    match client.make_folder(&DiskPath::disk("Music"), None).value().await {
        MakeFolderOutcome::Failed(err) => assert_eq!(err.status(), Some(409)),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn restore_maps_201_and_202() {
    let mock = MockTransport::new();
    mock.respond("restore", 202, link_json("https://disk.example/op/5", "GET"));
    let client = mock_client(&mock);

    assert!(matches!(
        client
            .restore_path(&DiskPath::trash("photo.png"), Some("selfie.png"), None, None)
            .value()
            .await,
        RestoreOutcome::InProcess(_)
    ));
    let url = &mock.request_urls()[0];
    assert!(url.contains("/v1/disk/trash/resources/restore"));
    assert!(url.contains("name=selfie.png"));
}

#[tokio::test]
async fn publish_and_unpublish_hit_their_endpoints() {
    let mock = MockTransport::new();
    mock.respond("resources/publish", 200, link_json("https://disk.example/pub", "GET"));
    mock.respond("resources/unpublish", 200, link_json("https://disk.example/meta", "GET"));
    let client = mock_client(&mock);

    assert!(matches!(
        client.publish_path(&DiskPath::disk("share.txt"), None).value().await,
        PublishOutcome::Done(_)
    ));
    assert!(matches!(
        client.unpublish_path(&DiskPath::disk("share.txt"), None).value().await,
        PublishOutcome::Done(_)
    ));
    let urls = mock.request_urls();
    assert!(urls[0].contains("/v1/disk/resources/publish?path="));
    assert!(urls[1].contains("/v1/disk/resources/unpublish?path="));
}

#[tokio::test]
async fn save_public_to_disk_maps_201_and_202() {
    let mock = MockTransport::new();
    mock.respond("save-to-disk", 201, link_json("https://disk.example/saved", "GET"));
    let client = mock_client(&mock);

    assert!(matches!(
        client
            .save_public_to_disk("KeY==", Some("copy.txt"), None, None)
            .value()
            .await,
        SavePublicOutcome::Done(_)
    ));
    let url = &mock.request_urls()[0];
    assert!(url.contains("public_key=KeY%3D%3D"));
    assert!(url.contains("name=copy.txt"));
}

// --- Metadata and polling -----------------------------------------------

#[tokio::test]
async fn metainfo_decodes_capacity_and_folders() {
    let mock = MockTransport::new();
    mock.respond(
        "/v1/disk/",
        200,
        json!({
            "total_space": 1000,
            "used_space": 250,
            "trash_size": 10,
            "system_folders": {"downloads": "disk:/Downloads"}
        }),
    );
    let client = mock_client(&mock);

    match client.metainfo(None).value().await {
        MetainfoOutcome::Done {
            total_space,
            used_space,
            trash_size,
            system_folders,
        } => {
            assert_eq!((total_space, used_space, trash_size), (1000, 250, 10));
            assert_eq!(
                system_folders.get("downloads"),
                Some(&DiskPath::disk("Downloads"))
            );
        }
        MetainfoOutcome::Failed(err) => panic!("unexpected failure: {err}"),
    }
}

#[tokio::test]
async fn api_version_requires_both_fields() {
    let mock = MockTransport::new();
    mock.respond("disk.example/", 200, json!({"build": "2.6.37", "api_version": "v1"}));
    let client = mock_client(&mock);

    match client.api_version(None).value().await {
        ApiVersionOutcome::Done { build, version } => {
            assert_eq!(build, "2.6.37");
            assert_eq!(version, "v1");
        }
        ApiVersionOutcome::Failed(err) => panic!("unexpected failure: {err}"),
    }
}

#[tokio::test]
async fn operation_status_returns_the_bare_string() {
    let mock = MockTransport::new();
    mock.respond("operations/42", 200, json!({"status": "in-progress"}));
    let client = mock_client(&mock);

    match client.operation_status_by_id("42", None).value().await {
        OperationOutcome::Status(status) => assert_eq!(status, "in-progress"),
        OperationOutcome::Failed(err) => panic!("unexpected failure: {err}"),
    }
}

#[tokio::test]
async fn operation_status_without_status_key_fails() {
    let mock = MockTransport::new();
    mock.respond("op/7", 200, json!({"progress": 50}));
    let client = mock_client(&mock);

    assert!(matches!(
        client
            .operation_status("https://disk.example/op/7", None)
            .value()
            .await,
        OperationOutcome::Failed(DiskError::Decode { .. })
    ));
}

// --- Custom properties --------------------------------------------------

#[tokio::test]
async fn patch_custom_properties_wraps_the_body_and_decodes_the_resource() {
    let mock = MockTransport::new();
    let mut updated = file_json("photo.png", "disk:/photos");
    updated
        .as_object_mut()
        .unwrap()
        .insert("custom_properties".into(), json!({"copyright": "CC-4"}));
    mock.respond("resources?path=", 200, updated);
    let client = mock_client(&mock);

    match client
        .set_custom_property(
            &DiskPath::disk("photos/photo.png"),
            "copyright",
            json!("CC-4"),
            None,
        )
        .value()
        .await
    {
        PropertiesOutcome::Done(resource) => {
            assert_eq!(
                resource
                    .custom_properties
                    .unwrap()
                    .get("copyright")
                    .and_then(serde_json::Value::as_str),
                Some("CC-4")
            );
        }
        PropertiesOutcome::Failed(err) => panic!("unexpected failure: {err}"),
    }

    let requests = mock.requests();
    assert_eq!(requests[0].method, yadisk_core::transport::Method::Patch);
    let body: serde_json::Value =
        serde_json::from_slice(requests[0].body.as_ref().unwrap()).unwrap();
    assert_eq!(body, json!({"custom_properties": {"copyright": "CC-4"}}));
}

#[tokio::test]
async fn remove_custom_property_sends_null() {
    let mock = MockTransport::new();
    mock.respond("resources?path=", 200, file_json("photo.png", "disk:/photos"));
    let client = mock_client(&mock);

    let _ = client
        .remove_custom_property(&DiskPath::disk("photos/photo.png"), "copyright", None)
        .value()
        .await;
    let requests = mock.requests();
    let body: serde_json::Value =
        serde_json::from_slice(requests[0].body.as_ref().unwrap()).unwrap();
    assert_eq!(body, json!({"custom_properties": {"copyright": null}}));
}
