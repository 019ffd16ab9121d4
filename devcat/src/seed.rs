//! Deterministic demo fixtures.
//!
//! The in-memory store is always seeded at startup, Postgres only when `seed_demo_data` is
//! set. Seeding is idempotent: clients are skipped when the demo account exists and products
//! when the catalog is non-empty.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::auth::password::{self, Argon2Params};
use crate::db::models::{
    clients::{ClientCreateDBRequest, ClientStatus},
    products::ProductCreateDBRequest,
    users::UserCreateDBRequest,
};
use crate::db::store::Store;

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password";
const DEMO_ROLE: &str = "ROLE_CLIENT";
const EXTRA_CLIENTS: usize = 10;

const FIRST_NAMES: [&str; 8] = ["Alice", "Bruno", "Chloé", "Dmitri", "Elena", "Farid", "Grace", "Hugo"];
const LAST_NAMES: [&str; 8] = ["Martin", "Bernard", "Dubois", "Thomas", "Robert", "Petit", "Durand", "Leroy"];

const BRANDS: [(&str, &str); 6] = [
    ("Nova", "NovaOS"),
    ("Pixelite", "Android"),
    ("Orchard", "iOS"),
    ("Kestrel", "Android"),
    ("Lumen", "HarmonyOS"),
    ("Tessel", "Android"),
];
const LINES: [&str; 3] = ["Lite", "Pro", "Max"];
const COLORS: [&str; 4] = ["Black", "Silver", "Midnight Blue", "Sage"];
const STOCK: [&str; 3] = ["in_stock", "low_stock", "out_of_stock"];

fn product(name: String, brand: &str, os: &str, price_cents: i64, release: Option<NaiveDate>) -> ProductCreateDBRequest {
    let now = Utc::now();
    ProductCreateDBRequest {
        model: Some(name.to_lowercase().replace(' ', "-")),
        description: Some(format!("{name} by {brand}")),
        name,
        brand: brand.to_string(),
        price: Some(Decimal::new(price_cents, 2)),
        currency: Some("EUR".to_string()),
        release_date: release,
        stock_status: Some(STOCK[0].to_string()),
        os: Some(os.to_string()),
        color: Some(COLORS[0].to_string()),
        screen_size: None,
        resolution: None,
        battery: None,
        camera: None,
        weight: None,
        dimensions: None,
        image_url: None,
        created_at: now,
        updated_at: now,
    }
}

/// The seeded catalog: two hand-written flagships followed by 18 generated devices.
pub fn demo_products() -> Vec<ProductCreateDBRequest> {
    let mut products = vec![
        ProductCreateDBRequest {
            screen_size: Some("6.7\"".to_string()),
            resolution: Some("2796x1290".to_string()),
            battery: Some("4500 mAh".to_string()),
            camera: Some("48 MP".to_string()),
            weight: Some("221 g".to_string()),
            dimensions: Some("160.7 x 77.6 x 7.9 mm".to_string()),
            image_url: Some("https://images.example.com/nova-phone-x.png".to_string()),
            ..product("Nova Phone X".to_string(), "Nova", "NovaOS", 119_900, NaiveDate::from_ymd_opt(2024, 9, 20))
        },
        ProductCreateDBRequest {
            screen_size: Some("11\"".to_string()),
            resolution: Some("2560x1600".to_string()),
            battery: Some("8600 mAh".to_string()),
            camera: Some("13 MP".to_string()),
            weight: Some("480 g".to_string()),
            dimensions: Some("254.3 x 166.1 x 6.1 mm".to_string()),
            image_url: Some("https://images.example.com/pixelite-tab-11.png".to_string()),
            ..product("Pixelite Tab 11".to_string(), "Pixelite", "Android", 64_900, NaiveDate::from_ymd_opt(2024, 3, 12))
        },
    ];

    for i in 0..18 {
        let (brand, os) = BRANDS[i % BRANDS.len()];
        let line = LINES[i % LINES.len()];
        let generation = 10 + i / BRANDS.len();
        let price_cents = 19_900 + (i as i64) * 5_000;
        let release = NaiveDate::from_ymd_opt(2022 + (i / 6) as i32, 1 + (i % 12) as u32, 15);

        products.push(ProductCreateDBRequest {
            color: Some(COLORS[i % COLORS.len()].to_string()),
            stock_status: Some(STOCK[i % STOCK.len()].to_string()),
            screen_size: Some(format!("{:.1}\"", 6.1 + (i % 4) as f64 * 0.2)),
            battery: Some(format!("{} mAh", 4000 + (i % 5) * 250)),
            ..product(format!("{brand} {generation} {line}"), brand, os, price_cents, release)
        });
    }

    products
}

fn demo_user(client_id: i64, seed: usize) -> UserCreateDBRequest {
    let now = Utc::now();
    UserCreateDBRequest {
        client_id,
        first_name: FIRST_NAMES[seed % FIRST_NAMES.len()].to_string(),
        last_name: LAST_NAMES[(seed * 3) % LAST_NAMES.len()].to_string(),
        phone_number: (seed % 2 == 0).then(|| format!("+33 6 00 00 {:02} {:02}", seed % 100, (seed * 7) % 100)),
        created_at: now,
        updated_at: now,
    }
}

async fn seed_client(
    store: &dyn Store,
    email: String,
    name: String,
    status: ClientStatus,
    password_hash: &str,
    users: usize,
    user_seed: &mut usize,
) -> anyhow::Result<()> {
    let now = Utc::now();
    let client = store
        .create_client(&ClientCreateDBRequest {
            email,
            password_hash: password_hash.to_string(),
            name,
            roles: vec![DEMO_ROLE.to_string()],
            status,
            created_at: now,
            updated_at: now,
        })
        .await?;

    for _ in 0..users {
        store.create_user(&demo_user(client.id, *user_seed)).await?;
        *user_seed += 1;
    }
    Ok(())
}

/// Insert the demo clients, their users, and the catalog.
pub async fn seed_demo_data(store: &dyn Store, params: Argon2Params) -> anyhow::Result<()> {
    if store.find_client_by_email(DEMO_EMAIL).await?.is_none() {
        let password_hash = tokio::task::spawn_blocking(move || password::hash_string(DEMO_PASSWORD, params)).await??;

        let mut user_seed = 0;
        seed_client(
            store,
            DEMO_EMAIL.to_string(),
            "Demo Client".to_string(),
            ClientStatus::Active,
            &password_hash,
            4,
            &mut user_seed,
        )
        .await?;

        for i in 1..=EXTRA_CLIENTS {
            seed_client(
                store,
                format!("client{i}@example.com"),
                format!("Client {i}"),
                ClientStatus::ALL[i % ClientStatus::ALL.len()],
                &password_hash,
                2 + i % 5,
                &mut user_seed,
            )
            .await?;
        }
        info!(clients = EXTRA_CLIENTS + 1, "Seeded demo clients");
    }

    if store.count_products().await? == 0 {
        let products = demo_products();
        for product in &products {
            store.create_product(product).await?;
        }
        info!(products = products.len(), "Seeded demo catalog");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MemoryStore;

    const FAST: Argon2Params = Argon2Params {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn demo_catalog_is_stable() {
        let products = demo_products();
        assert_eq!(products.len(), 20);
        assert_eq!(products[0].name, "Nova Phone X");
        assert_eq!(products[1].name, "Pixelite Tab 11");
        assert!(products.iter().all(|p| p.name.len() <= 255 && p.brand.len() <= 100));
        assert!(products.iter().all(|p| p.release_date.is_some()));
    }

    #[test]
    fn demo_users_fit_field_limits() {
        for seed in 0..64 {
            let user = demo_user(1, seed);
            assert!(!user.first_name.is_empty() && user.first_name.chars().count() <= 100);
            assert!(user.phone_number.as_ref().is_none_or(|p| p.chars().count() <= 20));
        }
    }

    #[test_log::test(tokio::test)]
    async fn seeding_is_idempotent() {
        let store = MemoryStore::new();
        seed_demo_data(&store, FAST).await.unwrap();
        seed_demo_data(&store, FAST).await.unwrap();

        assert_eq!(store.count_products().await.unwrap(), 20);

        let demo = store.find_client_by_email(DEMO_EMAIL).await.unwrap().unwrap();
        assert_eq!(demo.status, ClientStatus::Active);
        assert_eq!(store.list_users(demo.id).await.unwrap().len(), 4);
        assert!(password::verify_string(DEMO_PASSWORD, &demo.password_hash).unwrap());

        for i in 1..=EXTRA_CLIENTS {
            let client = store
                .find_client_by_email(&format!("client{i}@example.com"))
                .await
                .unwrap()
                .unwrap();
            let users = store.list_users(client.id).await.unwrap().len();
            assert!((2..=6).contains(&users), "client{i} has {users} users");
        }
    }
}
