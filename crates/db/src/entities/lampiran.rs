//! `SeaORM` Entity for lampiran (attachments) table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lampiran")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub surat_masuk_id: Option<Uuid>,
    pub surat_keluar_id: Option<Uuid>,
    pub file_name: String,
    pub url: String,
    pub public_id: String,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
    pub uploaded_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UploadedBy",
        to = "super::users::Column::Id"
    )]
    Uploader,
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
