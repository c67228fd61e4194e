//! Integration tests for product media reconciliation.
//!
//! Simulates the edit flow the admin product form drives: the client sends
//! back the subset of gallery URLs it kept, the service diffs that against
//! what is persisted, and only the dropped assets are deleted from the
//! media host.

use echo_ember_admin::models::Product;
use echo_ember_admin::models::product::FALLBACK_IMAGE;
use echo_ember_admin::services::media::{assets_to_delete, extract_public_id};

fn cdn(name: &str) -> String {
    format!("https://res.cloudinary.com/demo/image/upload/v1723456789/echo-ember-products/{name}")
}

// =============================================================================
// Edit-Flow Diffing
// =============================================================================

#[test]
fn test_dropped_assets_are_deleted_kept_assets_survive() {
    let persisted = vec![cdn("bow-red.jpg"), cdn("bow-red-detail.jpg"), cdn("bow-red-box.jpg")];
    let kept = vec![cdn("bow-red.jpg"), cdn("bow-red-box.jpg")];

    let doomed = assets_to_delete(&persisted, &kept);
    assert_eq!(doomed, vec![cdn("bow-red-detail.jpg")]);
}

#[test]
fn test_keeping_everything_deletes_nothing() {
    let persisted = vec![cdn("a.jpg"), cdn("b.jpg")];
    assert!(assets_to_delete(&persisted, &persisted).is_empty());
}

#[test]
fn test_clearing_the_gallery_deletes_everything_in_order() {
    let persisted = vec![cdn("a.jpg"), cdn("b.jpg"), cdn("c.jpg")];
    assert_eq!(assets_to_delete(&persisted, &[]), persisted);
}

#[test]
fn test_urls_the_client_invented_are_ignored() {
    // A kept URL that was never persisted must not suppress real deletions
    // or be deleted itself.
    let persisted = vec![cdn("real.jpg")];
    let kept = vec![cdn("made-up.jpg")];
    assert_eq!(assets_to_delete(&persisted, &kept), vec![cdn("real.jpg")]);
}

// =============================================================================
// Public ID Extraction
// =============================================================================

#[test]
fn test_public_id_is_folder_qualified_without_extension() {
    let id = extract_public_id(&cdn("bow-red.jpg"));
    assert_eq!(id.as_deref(), Some("echo-ember-products/bow-red"));
}

#[test]
fn test_public_id_survives_dots_in_the_name() {
    let id = extract_public_id(&cdn("bow.v2.final.jpg"));
    assert_eq!(id.as_deref(), Some("echo-ember-products/bow.v2.final"));
}

#[test]
fn test_malformed_urls_yield_no_public_id() {
    assert!(extract_public_id("https://example.com/not-a-media-url.jpg").is_none());
    assert!(extract_public_id("").is_none());
}

#[test]
fn test_every_persisted_gallery_url_resolves_to_an_id() {
    // The delete path depends on every URL we ever persisted being
    // resolvable back to its public ID.
    let gallery = vec![cdn("one.jpg"), cdn("two.png"), cdn("three.mp4")];
    for url in &gallery {
        assert!(extract_public_id(url).is_some(), "no public id for {url}");
    }
}

// =============================================================================
// Primary Image Resync
// =============================================================================

#[test]
fn test_primary_image_follows_the_reconciled_gallery() {
    // After an edit the primary image is recomputed from the final gallery
    let final_gallery = vec![cdn("new-cover.jpg"), cdn("old-cover.jpg")];
    assert_eq!(Product::primary_image(&final_gallery), cdn("new-cover.jpg"));
}

#[test]
fn test_primary_image_falls_back_when_gallery_emptied() {
    assert_eq!(Product::primary_image(&[]), FALLBACK_IMAGE);
}
