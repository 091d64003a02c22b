//! `SeaORM` Entity for surat_masuk (incoming letters) table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::IncomingLetterStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "surat_masuk")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Number printed on the letter by the sender.
    pub letter_number: String,
    pub sender: String,
    pub subject: String,
    pub letter_date: Date,
    pub received_date: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub file_url: Option<String>,
    pub file_public_id: Option<String>,
    pub status: IncomingLetterStatus,
    pub created_by: Uuid,
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
    #[sea_orm(has_many = "super::disposisi::Entity")]
    Disposisi,
    #[sea_orm(has_many = "super::lampiran::Entity")]
    Lampiran,
    #[sea_orm(has_many = "super::surat_keluar::Entity")]
    Replies,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
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
