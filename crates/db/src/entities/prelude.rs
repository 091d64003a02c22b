//! Entity prelude.

pub use super::activity_logs::Entity as ActivityLogs;
pub use super::disposisi::Entity as Disposisi;
pub use super::lampiran::Entity as Lampiran;
pub use super::notifications::Entity as Notifications;
pub use super::sequence_counters::Entity as SequenceCounters;
pub use super::surat_keluar::Entity as SuratKeluar;
pub use super::surat_masuk::Entity as SuratMasuk;
pub use super::users::Entity as Users;
