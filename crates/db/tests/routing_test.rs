//! Integration tests for routing (disposisi) fan-out and completion.

mod common;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use amanat_core::auth::Role;
use amanat_core::workflow::{LetterRef, WorkflowError};
use amanat_db::entities::{
    activity_logs, disposisi, notifications,
    sea_orm_active_enums::{DisposisiStatus, IncomingLetterStatus, OutgoingLetterStatus},
    surat_keluar, surat_masuk,
};
use amanat_db::repositories::{DispositionRepository, RouteInput, ValidateInput, WorkflowRepository};

use common::{connect, create_incoming, create_outgoing, create_user};

fn route_input(letter: LetterRef, to_user_id: uuid::Uuid) -> RouteInput {
    RouteInput {
        letter,
        to_user_id,
        instruction: "Mohon ditindaklanjuti".to_string(),
        due_date: None,
    }
}

#[tokio::test]
async fn test_route_incoming_letter_marks_it_disposed_and_notifies() {
    let db = connect().await;
    let admin = create_user(&db, Role::Admin).await;
    let kabag = create_user(&db, Role::KabagUmum).await;
    let letter = create_incoming(&db, admin).await;
    let repo = DispositionRepository::new(db.clone());

    let record = repo
        .route(admin, route_input(LetterRef::Incoming(letter.id), kabag.id))
        .await
        .expect("route failed");

    assert_eq!(record.status, DisposisiStatus::Pending);
    assert_eq!(record.surat_masuk_id, Some(letter.id));
    assert_eq!(record.surat_keluar_id, None);

    let letter = surat_masuk::Entity::find_by_id(letter.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(letter.status, IncomingLetterStatus::Didisposisi);

    let inbox = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(kabag.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].surat_masuk_id, Some(letter.id));

    let logs = activity_logs::Entity::find()
        .filter(activity_logs::Column::SuratMasukId.eq(letter.id))
        .filter(activity_logs::Column::Action.eq("ROUTE"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
}

#[tokio::test]
async fn test_route_to_top_approver_awaits_signature() {
    let db = connect().await;
    let admin = create_user(&db, Role::Admin).await;
    let ketua = create_user(&db, Role::KetuaPengurus).await;
    let letter = create_outgoing(&db, admin).await;

    DispositionRepository::new(db.clone())
        .route(admin, route_input(LetterRef::Outgoing(letter.id), ketua.id))
        .await
        .expect("route failed");

    let letter = surat_keluar::Entity::find_by_id(letter.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(letter.status, OutgoingLetterStatus::MenungguTtd);
}

#[tokio::test]
async fn test_route_returned_letter_without_admin_number_to_reviewer() {
    let db = connect().await;
    let admin = create_user(&db, Role::Admin).await;
    let reviewer = create_user(&db, Role::KabagKeuangan).await;
    let letter = create_outgoing(&db, admin).await;

    WorkflowRepository::new(db.clone())
        .validate(
            admin,
            letter.id,
            ValidateInput {
                is_valid: false,
                note: Some("Lengkapi rincian anggaran".to_string()),
                admin_number: None,
            },
        )
        .await
        .expect("return failed");

    DispositionRepository::new(db.clone())
        .route(admin, route_input(LetterRef::Outgoing(letter.id), reviewer.id))
        .await
        .expect("route failed");

    let letter = surat_keluar::Entity::find_by_id(letter.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(letter.admin_number, None);
    assert_eq!(letter.status, OutgoingLetterStatus::MenungguPersetujuan);
}

#[tokio::test]
async fn test_forwarding_supersedes_pending_record() {
    let db = connect().await;
    let admin = create_user(&db, Role::Admin).await;
    let sekretaris = create_user(&db, Role::SekretarisPengurus).await;
    let kabag = create_user(&db, Role::KabagPsdm).await;
    let letter = create_incoming(&db, admin).await;
    let letter_ref = LetterRef::Incoming(letter.id);
    let repo = DispositionRepository::new(db.clone());

    let r1 = repo
        .route(admin, route_input(letter_ref, sekretaris.id))
        .await
        .expect("first route failed");
    let r2 = repo
        .route(sekretaris, route_input(letter_ref, kabag.id))
        .await
        .expect("forward failed");

    let r1 = repo.find_by_id(r1.id).await.unwrap().unwrap();
    assert_eq!(r1.status, DisposisiStatus::Diteruskan);
    assert_eq!(r2.status, DisposisiStatus::Pending);

    let pending = disposisi::Entity::find()
        .filter(disposisi::Column::SuratMasukId.eq(letter.id))
        .filter(disposisi::Column::Status.eq(DisposisiStatus::Pending))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].to_user_id, kabag.id);

    let history = repo.history(letter_ref).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn test_rerouting_to_same_recipient_keeps_one_pending() {
    let db = connect().await;
    let admin = create_user(&db, Role::Admin).await;
    let kabag = create_user(&db, Role::KabagUmum).await;
    let letter = create_incoming(&db, admin).await;
    let letter_ref = LetterRef::Incoming(letter.id);
    let repo = DispositionRepository::new(db.clone());

    repo.route(admin, route_input(letter_ref, kabag.id)).await.unwrap();
    repo.route(admin, route_input(letter_ref, kabag.id)).await.unwrap();

    let pending = disposisi::Entity::find()
        .filter(disposisi::Column::SuratMasukId.eq(letter.id))
        .filter(disposisi::Column::ToUserId.eq(kabag.id))
        .filter(disposisi::Column::Status.eq(DisposisiStatus::Pending))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn test_route_validation_errors() {
    let db = connect().await;
    let admin = create_user(&db, Role::Admin).await;
    let kabag = create_user(&db, Role::KabagUmum).await;
    let letter = create_incoming(&db, admin).await;
    let letter_ref = LetterRef::Incoming(letter.id);
    let repo = DispositionRepository::new(db.clone());

    let blank = RouteInput {
        instruction: "   ".to_string(),
        ..route_input(letter_ref, kabag.id)
    };
    assert!(matches!(
        repo.route(admin, blank).await,
        Err(WorkflowError::InstructionRequired)
    ));

    assert!(matches!(
        repo.route(admin, route_input(letter_ref, admin.id)).await,
        Err(WorkflowError::SelfRouting)
    ));

    let missing = uuid::Uuid::new_v4();
    assert!(matches!(
        repo.route(admin, route_input(letter_ref, missing)).await,
        Err(WorkflowError::UserNotFound(id)) if id == missing
    ));

    let ghost = uuid::Uuid::new_v4();
    assert!(matches!(
        repo.route(admin, route_input(LetterRef::Incoming(ghost), kabag.id)).await,
        Err(WorkflowError::LetterNotFound(id)) if id == ghost
    ));
}

#[tokio::test]
async fn test_complete_closes_whole_letter() {
    let db = connect().await;
    let admin = create_user(&db, Role::Admin).await;
    let first = create_user(&db, Role::KabagUmum).await;
    let second = create_user(&db, Role::KabagKeuangan).await;
    let letter = create_incoming(&db, admin).await;
    let letter_ref = LetterRef::Incoming(letter.id);
    let repo = DispositionRepository::new(db.clone());

    let r1 = repo.route(admin, route_input(letter_ref, first.id)).await.unwrap();
    let r2 = repo.route(admin, route_input(letter_ref, second.id)).await.unwrap();

    let done = repo
        .complete(first, r1.id, Some("Sudah dihadiri".to_string()))
        .await
        .expect("complete failed");
    assert_eq!(done.status, DisposisiStatus::Selesai);
    assert!(done.completed_at.is_some());
    assert_eq!(done.completion_note.as_deref(), Some("Sudah dihadiri"));

    let letter = surat_masuk::Entity::find_by_id(letter.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(letter.status, IncomingLetterStatus::Selesai);

    let r2 = repo.find_by_id(r2.id).await.unwrap().unwrap();
    assert_eq!(r2.status, DisposisiStatus::Pending);
}

#[tokio::test]
async fn test_complete_rejects_stranger_and_double_completion() {
    let db = connect().await;
    let admin = create_user(&db, Role::Admin).await;
    let kabag = create_user(&db, Role::KabagUmum).await;
    let stranger = create_user(&db, Role::BendaharaPengurus).await;
    let letter = create_outgoing(&db, kabag).await;
    let repo = DispositionRepository::new(db.clone());

    let record = repo
        .route(admin, route_input(LetterRef::Outgoing(letter.id), kabag.id))
        .await
        .unwrap();

    assert!(matches!(
        repo.complete(stranger, record.id, None).await,
        Err(WorkflowError::Forbidden { .. })
    ));

    repo.complete(admin, record.id, None).await.expect("admin completes");

    assert!(matches!(
        repo.complete(kabag, record.id, None).await,
        Err(WorkflowError::AlreadyCompleted(id)) if id == record.id
    ));

    let missing = uuid::Uuid::new_v4();
    assert!(matches!(
        repo.complete(admin, missing, None).await,
        Err(WorkflowError::RoutingNotFound(id)) if id == missing
    ));
}
