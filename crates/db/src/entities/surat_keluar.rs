//! `SeaORM` Entity for surat_keluar (outgoing letters) table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::OutgoingLetterStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "surat_keluar")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub subject: String,
    pub destination: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,
    pub file_url: Option<String>,
    pub file_public_id: Option<String>,
    pub status: OutgoingLetterStatus,
    pub created_by: Uuid,
    pub reply_to_incoming_id: Option<Uuid>,
    /// Agenda number assigned by the admin on intake.
    pub admin_number: Option<String>,
    /// Official number minted at signing. Never overwritten once set.
    #[sea_orm(unique)]
    pub letter_number: Option<String>,
    pub signed_by: Option<Uuid>,
    pub signed_at: Option<DateTimeWithTimeZone>,
    pub sent_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(
        belongs_to = "super::surat_masuk::Entity",
        from = "Column::ReplyToIncomingId",
        to = "super::surat_masuk::Column::Id"
    )]
    ReplyTo,
    #[sea_orm(has_many = "super::disposisi::Entity")]
    Disposisi,
    #[sea_orm(has_many = "super::lampiran::Entity")]
    Lampiran,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::surat_masuk::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReplyTo.def()
    }
}

impl Related<super::disposisi::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Disposisi.def()
    }
}

impl Related<super::lampiran::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lampiran.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
