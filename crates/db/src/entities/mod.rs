//! `SeaORM` entity definitions.

pub mod prelude;

pub mod activity_logs;
pub mod disposisi;
pub mod lampiran;
pub mod notifications;
pub mod sea_orm_active_enums;
pub mod sequence_counters;
pub mod surat_keluar;
pub mod surat_masuk;
pub mod users;
