//! Product management handlers.
//!
//! Create and update are multipart: scalar fields plus `images`/`videos`
//! file parts. Update additionally reconciles the media gallery against
//! the client's authoritative kept sets (`existingImages`/`existingVideos`).

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde_json::json;

use echo_ember_core::{Category, OptionGroup, ProductId};

use crate::db::products::{ProductRepository, ProductWrite};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Product;
use crate::services::media::{MediaClient, MediaKind, assets_to_delete};
use crate::state::AppState;

/// Fields collected from a multipart product form.
#[derive(Debug, Default)]
struct ProductForm {
    title: Option<String>,
    description: String,
    price: Option<Decimal>,
    stock: Option<i32>,
    category: Option<Category>,
    /// `None` means the field was omitted or unparsable; an update must
    /// leave the persisted groups alone in that case.
    options: Option<serde_json::Value>,
    existing_images: Vec<String>,
    existing_videos: Vec<String>,
    new_images: Vec<(String, Vec<u8>)>,
    new_videos: Vec<(String, Vec<u8>)>,
}

/// Parse a JSON string-array field leniently: anything that is not an
/// array of strings becomes empty.
fn parse_string_array(raw: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(raw).unwrap_or_default()
}

/// Options column value for an update: a submitted, parsable payload wins,
/// anything else keeps the persisted groups.
fn options_for_update(
    submitted: Option<serde_json::Value>,
    persisted: &[OptionGroup],
) -> serde_json::Value {
    submitted.unwrap_or_else(|| serde_json::to_value(persisted).unwrap_or_else(|_| json!([])))
}

/// Drain a multipart stream into a form. Unknown fields are ignored.
async fn collect_form(mut multipart: Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };

        match name.as_str() {
            "images" | "videos" => {
                let filename = field
                    .file_name()
                    .map_or_else(|| "upload".to_owned(), ToOwned::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("unreadable file part: {e}")))?;
                if bytes.is_empty() {
                    continue;
                }
                let entry = (filename, bytes.to_vec());
                if name == "images" {
                    form.new_images.push(entry);
                } else {
                    form.new_videos.push(entry);
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("unreadable field: {e}")))?;
                match name.as_str() {
                    "title" => form.title = Some(value),
                    "description" => form.description = value,
                    "price" => {
                        form.price = Some(value.parse().map_err(|_| {
                            AppError::BadRequest(format!("invalid price: {value}"))
                        })?);
                    }
                    "stock" => {
                        form.stock = Some(value.parse().map_err(|_| {
                            AppError::BadRequest(format!("invalid stock: {value}"))
                        })?);
                    }
                    "category" => {
                        form.category = Some(value.parse().map_err(|_| {
                            AppError::BadRequest(format!("unknown category: {value}"))
                        })?);
                    }
                    // Lenient: garbage options are treated as absent
                    "options" => form.options = serde_json::from_str(&value).ok(),
                    "existingImages" => form.existing_images = parse_string_array(&value),
                    "existingVideos" => form.existing_videos = parse_string_array(&value),
                    _ => {}
                }
            }
        }
    }

    Ok(form)
}

/// Upload a batch sequentially; failures are logged and skipped.
async fn upload_batch(
    media: &MediaClient,
    files: Vec<(String, Vec<u8>)>,
    kind: MediaKind,
) -> Vec<String> {
    let mut urls = Vec::new();
    for (filename, bytes) in files {
        match media.upload(bytes, &filename, kind).await {
            Ok(url) => urls.push(url),
            Err(e) => {
                tracing::warn!(%filename, error = %e, "asset upload failed; skipping");
            }
        }
    }
    urls
}

/// Best-effort deletes for a batch of delivery URLs.
async fn delete_batch(media: &MediaClient, urls: &[String], kind: MediaKind) {
    for url in urls {
        if let Err(e) = media.delete(url, kind).await {
            tracing::warn!(%url, error = %e, "asset delete failed");
        }
    }
}

/// List all products.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// Product detail.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;
    Ok(Json(product))
}

/// Create a product from a multipart form.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = collect_form(multipart).await?;

    let title = form
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("title is required".to_owned()))?;
    let price = form
        .price
        .ok_or_else(|| AppError::BadRequest("price is required".to_owned()))?;
    let category = form
        .category
        .ok_or_else(|| AppError::BadRequest("category is required".to_owned()))?;

    let images = upload_batch(state.media(), form.new_images, MediaKind::Image).await;
    let videos = upload_batch(state.media(), form.new_videos, MediaKind::Video).await;

    let write = ProductWrite {
        title,
        description: form.description,
        price,
        stock: form.stock.unwrap_or(0),
        category,
        image: Product::primary_image(&images),
        images: images.clone(),
        videos: videos.clone(),
        options: form.options.unwrap_or_else(|| json!([])),
    };

    let created = match ProductRepository::new(state.pool()).create(&write).await {
        Ok(product) => product,
        Err(e) => {
            // The row never landed; don't strand the uploads
            delete_batch(state.media(), &images, MediaKind::Image).await;
            delete_batch(state.media(), &videos, MediaKind::Video).await;
            return Err(e.into());
        }
    };

    tracing::info!(product_id = %created.id, admin = %admin.email, "product created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a product, reconciling its media gallery.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = collect_form(multipart).await?;

    let repo = ProductRepository::new(state.pool());
    let persisted = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    // The kept sets are authoritative: anything persisted but not kept goes
    let dropped_images = assets_to_delete(&persisted.images, &form.existing_images);
    let dropped_videos = assets_to_delete(&persisted.videos, &form.existing_videos);
    delete_batch(state.media(), &dropped_images, MediaKind::Image).await;
    delete_batch(state.media(), &dropped_videos, MediaKind::Video).await;

    let uploaded_images = upload_batch(state.media(), form.new_images, MediaKind::Image).await;
    let uploaded_videos = upload_batch(state.media(), form.new_videos, MediaKind::Video).await;

    let mut images = form.existing_images;
    images.extend(uploaded_images.iter().cloned());
    let mut videos = form.existing_videos;
    videos.extend(uploaded_videos.iter().cloned());

    let write = ProductWrite {
        title: form.title.unwrap_or(persisted.title),
        description: if form.description.is_empty() {
            persisted.description
        } else {
            form.description
        },
        price: form.price.unwrap_or(persisted.price),
        stock: form.stock.unwrap_or(persisted.stock),
        category: form.category.unwrap_or(persisted.category),
        image: Product::primary_image(&images),
        images,
        videos,
        options: options_for_update(form.options, &persisted.options),
    };

    let updated = match repo.update(id, &write).await {
        Ok(product) => product,
        Err(e) => {
            // Compensating cleanup: the kept set stays, this request's
            // uploads must not leak
            delete_batch(state.media(), &uploaded_images, MediaKind::Image).await;
            delete_batch(state.media(), &uploaded_videos, MediaKind::Video).await;
            return Err(e.into());
        }
    };

    tracing::info!(product_id = %id, admin = %admin.email, "product updated");
    Ok(Json(updated))
}

/// Delete a product and, best effort, its media.
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let repo = ProductRepository::new(state.pool());
    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    repo.delete(id).await?;

    delete_batch(state.media(), &product.images, MediaKind::Image).await;
    delete_batch(state.media(), &product.videos, MediaKind::Video).await;

    tracing::info!(product_id = %id, admin = %admin.email, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_array_parses_valid_json() {
        assert_eq!(
            parse_string_array(r#"["a","b"]"#),
            vec!["a".to_owned(), "b".to_owned()]
        );
    }

    #[test]
    fn string_array_degrades_on_garbage() {
        assert!(parse_string_array("not json").is_empty());
        assert!(parse_string_array(r#"{"a":1}"#).is_empty());
        assert!(parse_string_array("[1,2]").is_empty());
    }

    fn size_group() -> Vec<OptionGroup> {
        vec![OptionGroup {
            name: "Size".to_owned(),
            values: vec!["S".to_owned(), "M".to_owned()],
        }]
    }

    #[test]
    fn omitted_options_keep_persisted_groups() {
        let value = options_for_update(None, &size_group());
        let groups: Vec<OptionGroup> = serde_json::from_value(value).expect("round-trips");
        assert_eq!(groups, size_group());
    }

    #[test]
    fn submitted_options_replace_persisted_groups() {
        let submitted = json!([{ "name": "Color", "values": ["Pink"] }]);
        let value = options_for_update(Some(submitted.clone()), &size_group());
        assert_eq!(value, submitted);
    }

    #[test]
    fn unparsable_options_field_reads_as_absent() {
        // Mirrors the collect_form arm: garbage text never becomes Some
        let parsed: Option<serde_json::Value> = serde_json::from_str("not json").ok();
        assert!(parsed.is_none());
        let value = options_for_update(parsed, &size_group());
        assert_eq!(value, serde_json::to_value(size_group()).expect("serializes"));
    }
}
