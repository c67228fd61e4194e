//! Demo catalog seeding.
//!
//! Inserts a handful of products with fixed IDs so the command is
//! idempotent: re-running it changes nothing.

use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use super::{CliError, connect};

struct SeedProduct {
    id: Uuid,
    title: &'static str,
    description: &'static str,
    price: Decimal,
    stock: i32,
    category: &'static str,
    options: serde_json::Value,
}

fn demo_catalog() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            id: Uuid::from_u128(0x45ED_0001),
            title: "Scarlet Satin Bow",
            description: "Hand-tied satin bow with a brass clip.",
            price: Decimal::new(1250, 2),
            stock: 40,
            category: "Bows",
            options: json!([{ "name": "Size", "values": ["Small", "Large"] }]),
        },
        SeedProduct {
            id: Uuid::from_u128(0x45ED_0002),
            title: "Moonlight Tulle Tutu",
            description: "Four-layer tulle tutu in dusty lavender.",
            price: Decimal::new(4900, 2),
            stock: 15,
            category: "Tutus",
            options: json!([{ "name": "Waist", "values": ["XS", "S", "M"] }]),
        },
        SeedProduct {
            id: Uuid::from_u128(0x45ED_0003),
            title: "Wildflower Crown",
            description: "Dried wildflowers on a wire frame.",
            price: Decimal::new(3200, 2),
            stock: 8,
            category: "Crowns",
            options: json!([]),
        },
        SeedProduct {
            id: Uuid::from_u128(0x45ED_0004),
            title: "Keepsake Gift Box",
            description: "A bow, a mini crown and a thank-you card.",
            price: Decimal::new(5500, 2),
            stock: 20,
            category: "Gifts",
            options: json!([]),
        },
    ]
}

/// Insert the demo catalog.
///
/// # Errors
///
/// Returns `CliError::Database` when an insert fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    let mut inserted = 0_u64;
    for product in demo_catalog() {
        let result = sqlx::query(
            r"
            INSERT INTO shop.products
                (id, title, description, price, stock, category, options)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(product.id)
        .bind(product.title)
        .bind(product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.category)
        .bind(&product.options)
        .execute(&pool)
        .await?;

        inserted += result.rows_affected();
    }

    tracing::info!(inserted, "seed complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_ids_are_stable_and_distinct() {
        let catalog = demo_catalog();
        let mut ids: Vec<Uuid> = catalog.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn demo_categories_are_canonical() {
        for product in demo_catalog() {
            assert!(product.category.parse::<echo_ember_core::Category>().is_ok());
        }
    }
}
