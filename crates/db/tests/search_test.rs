//! Integration tests for letter search.

mod common;

use chrono::NaiveDate;
use uuid::Uuid;

use amanat_core::auth::Role;
use amanat_db::repositories::{CreateIncomingInput, IncomingFilter, IncomingLetterRepository};
use amanat_shared::types::PageRequest;

use common::{connect, create_user};

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let db = connect().await;
    let admin = create_user(&db, Role::Admin).await;
    let repo = IncomingLetterRepository::new(db.clone());
    let tag = Uuid::new_v4().simple().to_string();
    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

    let mut ids = Vec::new();
    for subject in [format!("Capaian {tag} 100%"), format!("Capaian {tag} 1000 peserta")] {
        let letter = repo
            .create(
                admin,
                CreateIncomingInput {
                    letter_number: format!("SR-{}", Uuid::new_v4()),
                    sender: "Dinas Sosial".to_string(),
                    subject,
                    letter_date: date,
                    received_date: date,
                    notes: None,
                    file: None,
                },
            )
            .await
            .unwrap();
        ids.push(letter.id);
    }

    let page = PageRequest::new(None, None);
    let found = repo
        .list(
            &IncomingFilter {
                status: None,
                search: Some(format!("{tag} 100%")),
            },
            &page,
        )
        .await
        .unwrap();
    let found: Vec<Uuid> = found.data.into_iter().map(|l| l.id).collect();
    assert_eq!(found, [ids[0]]);

    let found = repo
        .list(
            &IncomingFilter {
                status: None,
                search: Some(tag.to_uppercase()),
            },
            &page,
        )
        .await
        .unwrap();
    assert_eq!(found.meta.total, 2);
}
