//! Development seeder for AMANAT.
//!
//! Creates one active user per organizational role so every workflow step
//! can be exercised locally. Existing emails are skipped, so the seeder can
//! be re-run safely.
//!
//! Usage: cargo run --bin seeder
//!
//! `SEED_PASSWORD` overrides the shared development password.

use amanat_core::auth::{Role, hash_password};
use amanat_db::{
    UserRepository,
    repositories::CreateUserInput,
};

const DEFAULT_PASSWORD: &str = "Amanat#2026";

/// Seed accounts: (email, full name, role).
const SEED_USERS: [(&str, &str, Role); 7] = [
    ("admin@amanat.local", "Admin Sekretariat", Role::Admin),
    ("ketua@amanat.local", "Ketua Pengurus", Role::KetuaPengurus),
    ("sekretaris@amanat.local", "Sekretaris Pengurus", Role::SekretarisPengurus),
    ("bendahara@amanat.local", "Bendahara Pengurus", Role::BendaharaPengurus),
    ("psdm@amanat.local", "Kabag PSDM", Role::KabagPsdm),
    ("keuangan@amanat.local", "Kabag Keuangan", Role::KabagKeuangan),
    ("umum@amanat.local", "Kabag Umum", Role::KabagUmum),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set in environment"))?;
    let password = std::env::var("SEED_PASSWORD").unwrap_or_else(|_| DEFAULT_PASSWORD.to_string());

    println!("Connecting to database...");
    let db = amanat_db::connect(&database_url).await?;
    let users = UserRepository::new(db);

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;

    println!("Seeding users...");
    let mut inserted = 0;
    for (email, full_name, role) in SEED_USERS {
        if users.find_by_email(email).await?.is_some() {
            println!("  {email} already exists, skipping...");
            continue;
        }

        users
            .create(CreateUserInput {
                email: email.to_string(),
                password_hash: password_hash.clone(),
                full_name: full_name.to_string(),
                role,
            })
            .await?;
        println!("  Created {email} ({role})");
        inserted += 1;
    }

    println!("Seeding complete! Inserted {inserted} users.");
    Ok(())
}
