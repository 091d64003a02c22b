//! `SeaORM` Entity for disposisi (routing records) table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use amanat_core::workflow::LetterRef;

use super::sea_orm_active_enums::DisposisiStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "disposisi")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub surat_masuk_id: Option<Uuid>,
    pub surat_keluar_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    pub instruction: String,
    pub due_date: Option<Date>,
    pub status: DisposisiStatus,
    pub completed_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub completion_note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Returns the letter this record routes. `None` only for rows that
    /// violate the table's CHECK constraint.
    #[must_use]
    pub const fn letter(&self) -> Option<LetterRef> {
        LetterRef::from_columns(self.surat_masuk_id, self.surat_keluar_id)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FromUserId",
        to = "super::users::Column::Id"
    )]
    FromUser,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ToUserId",
        to = "super::users::Column::Id"
    )]
    ToUser,
    #[sea_orm(
        belongs_to = "super::surat_masuk::Entity",
        from = "Column::SuratMasukId",
        to = "super::surat_masuk::Column::Id"
    )]
    SuratMasuk,
    #[sea_orm(
        belongs_to = "super::surat_keluar::Entity",
        from = "Column::SuratKeluarId",
        to = "super::surat_keluar::Column::Id"
    )]
    SuratKeluar,
}

impl Related<super::surat_masuk::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuratMasuk.def()
    }
}

impl Related<super::surat_keluar::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuratKeluar.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
