//! Postgres enum types and their conversions to core types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use amanat_core::auth::Role;
use amanat_core::workflow::{IncomingStatus, OutgoingStatus, RoutingStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "KETUA_PENGURUS")]
    KetuaPengurus,
    #[sea_orm(string_value = "SEKRETARIS_PENGURUS")]
    SekretarisPengurus,
    #[sea_orm(string_value = "BENDAHARA_PENGURUS")]
    BendaharaPengurus,
    #[sea_orm(string_value = "KABAG_PSDM")]
    KabagPsdm,
    #[sea_orm(string_value = "KABAG_KEUANGAN")]
    KabagKeuangan,
    #[sea_orm(string_value = "KABAG_UMUM")]
    KabagUmum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "incoming_status")]
pub enum IncomingLetterStatus {
    #[sea_orm(string_value = "DITERIMA")]
    Diterima,
    #[sea_orm(string_value = "DIDISPOSISI")]
    Didisposisi,
    #[sea_orm(string_value = "DIPROSES")]
    Diproses,
    #[sea_orm(string_value = "SELESAI")]
    Selesai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "outgoing_status")]
pub enum OutgoingLetterStatus {
    #[sea_orm(string_value = "PENGAJUAN")]
    Pengajuan,
    #[sea_orm(string_value = "DITERIMA")]
    Diterima,
    #[sea_orm(string_value = "DIPROSES")]
    Diproses,
    #[sea_orm(string_value = "MENUNGGU_PERSETUJUAN")]
    MenungguPersetujuan,
    #[sea_orm(string_value = "MENUNGGU_VALIDASI")]
    MenungguValidasi,
    #[sea_orm(string_value = "MENUNGGU_VERIFIKASI")]
    MenungguVerifikasi,
    #[sea_orm(string_value = "DISETUJUI")]
    Disetujui,
    #[sea_orm(string_value = "DIKEMBALIKAN")]
    Dikembalikan,
    #[sea_orm(string_value = "MENUNGGU_TTD")]
    MenungguTtd,
    #[sea_orm(string_value = "DITANDATANGANI")]
    Ditandatangani,
    #[sea_orm(string_value = "SELESAI")]
    Selesai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "routing_status")]
pub enum DisposisiStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "DITERUSKAN")]
    Diteruskan,
    #[sea_orm(string_value = "SELESAI")]
    Selesai,
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::KetuaPengurus => Self::KetuaPengurus,
            UserRole::SekretarisPengurus => Self::SekretarisPengurus,
            UserRole::BendaharaPengurus => Self::BendaharaPengurus,
            UserRole::KabagPsdm => Self::KabagPsdm,
            UserRole::KabagKeuangan => Self::KabagKeuangan,
            UserRole::KabagUmum => Self::KabagUmum,
        }
    }
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::KetuaPengurus => Self::KetuaPengurus,
            Role::SekretarisPengurus => Self::SekretarisPengurus,
            Role::BendaharaPengurus => Self::BendaharaPengurus,
            Role::KabagPsdm => Self::KabagPsdm,
            Role::KabagKeuangan => Self::KabagKeuangan,
            Role::KabagUmum => Self::KabagUmum,
        }
    }
}

impl From<IncomingLetterStatus> for IncomingStatus {
    fn from(status: IncomingLetterStatus) -> Self {
        match status {
            IncomingLetterStatus::Diterima => Self::Diterima,
            IncomingLetterStatus::Didisposisi => Self::Didisposisi,
            IncomingLetterStatus::Diproses => Self::Diproses,
            IncomingLetterStatus::Selesai => Self::Selesai,
        }
    }
}

impl From<IncomingStatus> for IncomingLetterStatus {
    fn from(status: IncomingStatus) -> Self {
        match status {
            IncomingStatus::Diterima => Self::Diterima,
            IncomingStatus::Didisposisi => Self::Didisposisi,
            IncomingStatus::Diproses => Self::Diproses,
            IncomingStatus::Selesai => Self::Selesai,
        }
    }
}

impl From<OutgoingLetterStatus> for OutgoingStatus {
    fn from(status: OutgoingLetterStatus) -> Self {
        match status {
            OutgoingLetterStatus::Pengajuan => Self::Pengajuan,
            OutgoingLetterStatus::Diterima => Self::Diterima,
            OutgoingLetterStatus::Diproses => Self::Diproses,
            OutgoingLetterStatus::MenungguPersetujuan => Self::MenungguPersetujuan,
            OutgoingLetterStatus::MenungguValidasi => Self::MenungguValidasi,
            OutgoingLetterStatus::MenungguVerifikasi => Self::MenungguVerifikasi,
            OutgoingLetterStatus::Disetujui => Self::Disetujui,
            OutgoingLetterStatus::Dikembalikan => Self::Dikembalikan,
            OutgoingLetterStatus::MenungguTtd => Self::MenungguTtd,
            OutgoingLetterStatus::Ditandatangani => Self::Ditandatangani,
            OutgoingLetterStatus::Selesai => Self::Selesai,
        }
    }
}

impl From<OutgoingStatus> for OutgoingLetterStatus {
    fn from(status: OutgoingStatus) -> Self {
        match status {
            OutgoingStatus::Pengajuan => Self::Pengajuan,
            OutgoingStatus::Diterima => Self::Diterima,
            OutgoingStatus::Diproses => Self::Diproses,
            OutgoingStatus::MenungguPersetujuan => Self::MenungguPersetujuan,
            OutgoingStatus::MenungguValidasi => Self::MenungguValidasi,
            OutgoingStatus::MenungguVerifikasi => Self::MenungguVerifikasi,
            OutgoingStatus::Disetujui => Self::Disetujui,
            OutgoingStatus::Dikembalikan => Self::Dikembalikan,
            OutgoingStatus::MenungguTtd => Self::MenungguTtd,
            OutgoingStatus::Ditandatangani => Self::Ditandatangani,
            OutgoingStatus::Selesai => Self::Selesai,
        }
    }
}

impl From<DisposisiStatus> for RoutingStatus {
    fn from(status: DisposisiStatus) -> Self {
        match status {
            DisposisiStatus::Pending => Self::Pending,
            DisposisiStatus::Diteruskan => Self::Diteruskan,
            DisposisiStatus::Selesai => Self::Selesai,
        }
    }
}

impl From<RoutingStatus> for DisposisiStatus {
    fn from(status: RoutingStatus) -> Self {
        match status {
            RoutingStatus::Pending => Self::Pending,
            RoutingStatus::Diteruskan => Self::Diteruskan,
            RoutingStatus::Selesai => Self::Selesai,
        }
    }
}
