//! Initial database migration.
//!
//! Creates the enums, tables, constraints, indexes and triggers of the
//! letter-management schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: LETTERS
        // ============================================================
        db.execute_unprepared(SURAT_MASUK_SQL).await?;
        db.execute_unprepared(SURAT_KELUAR_SQL).await?;

        // ============================================================
        // PART 4: ROUTING, ATTACHMENTS, AUDIT
        // ============================================================
        db.execute_unprepared(DISPOSISI_SQL).await?;
        db.execute_unprepared(LAMPIRAN_SQL).await?;
        db.execute_unprepared(ACTIVITY_LOGS_SQL).await?;
        db.execute_unprepared(NOTIFICATIONS_SQL).await?;

        // ============================================================
        // PART 5: NUMBERING
        // ============================================================
        db.execute_unprepared(SEQUENCE_COUNTERS_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM (
    'ADMIN',
    'KETUA_PENGURUS',
    'SEKRETARIS_PENGURUS',
    'BENDAHARA_PENGURUS',
    'KABAG_PSDM',
    'KABAG_KEUANGAN',
    'KABAG_UMUM'
);

CREATE TYPE incoming_status AS ENUM ('DITERIMA', 'DIDISPOSISI', 'DIPROSES', 'SELESAI');

CREATE TYPE outgoing_status AS ENUM (
    'PENGAJUAN',
    'DITERIMA',
    'DIPROSES',
    'MENUNGGU_PERSETUJUAN',
    'MENUNGGU_VALIDASI',
    'MENUNGGU_VERIFIKASI',
    'DISETUJUI',
    'DIKEMBALIKAN',
    'MENUNGGU_TTD',
    'DITANDATANGANI',
    'SELESAI'
);

CREATE TYPE routing_status AS ENUM ('PENDING', 'DITERUSKAN', 'SELESAI');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    role user_role NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_active_role ON users(role) WHERE is_active = true;
";

const SURAT_MASUK_SQL: &str = r"
CREATE TABLE surat_masuk (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    letter_number VARCHAR(100) NOT NULL,
    sender VARCHAR(255) NOT NULL,
    subject VARCHAR(500) NOT NULL,
    letter_date DATE NOT NULL,
    received_date DATE NOT NULL,
    notes TEXT,
    file_url TEXT,
    file_public_id VARCHAR(255),
    status incoming_status NOT NULL DEFAULT 'DITERIMA',
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_surat_masuk_file CHECK ((file_url IS NULL) = (file_public_id IS NULL))
);

CREATE INDEX idx_surat_masuk_status ON surat_masuk(status, created_at DESC);
";

const SURAT_KELUAR_SQL: &str = r"
CREATE TABLE surat_keluar (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    subject VARCHAR(500) NOT NULL,
    destination VARCHAR(255) NOT NULL,
    summary TEXT,
    file_url TEXT,
    file_public_id VARCHAR(255),
    status outgoing_status NOT NULL DEFAULT 'PENGAJUAN',
    created_by UUID NOT NULL REFERENCES users(id),
    reply_to_incoming_id UUID REFERENCES surat_masuk(id) ON DELETE SET NULL,
    admin_number VARCHAR(100),
    letter_number VARCHAR(100) UNIQUE,
    signed_by UUID REFERENCES users(id),
    signed_at TIMESTAMPTZ,
    sent_at TIMESTAMPTZ,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_surat_keluar_file CHECK ((file_url IS NULL) = (file_public_id IS NULL))
);

CREATE INDEX idx_surat_keluar_status ON surat_keluar(status, created_at DESC);
CREATE INDEX idx_surat_keluar_creator ON surat_keluar(created_by);
";

const DISPOSISI_SQL: &str = r"
CREATE TABLE disposisi (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    from_user_id UUID NOT NULL REFERENCES users(id),
    to_user_id UUID NOT NULL REFERENCES users(id),
    surat_masuk_id UUID REFERENCES surat_masuk(id),
    surat_keluar_id UUID REFERENCES surat_keluar(id),
    instruction TEXT NOT NULL,
    due_date DATE,
    status routing_status NOT NULL DEFAULT 'PENDING',
    completed_at TIMESTAMPTZ,
    completion_note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_disposisi_one_letter CHECK (num_nonnulls(surat_masuk_id, surat_keluar_id) = 1),
    CONSTRAINT chk_disposisi_instruction CHECK (length(btrim(instruction)) > 0)
);

-- At most one actionable record per (letter, recipient)
CREATE UNIQUE INDEX uq_disposisi_pending_masuk
    ON disposisi(surat_masuk_id, to_user_id)
    WHERE status = 'PENDING' AND surat_masuk_id IS NOT NULL;
CREATE UNIQUE INDEX uq_disposisi_pending_keluar
    ON disposisi(surat_keluar_id, to_user_id)
    WHERE status = 'PENDING' AND surat_keluar_id IS NOT NULL;

-- Inbox / outbox
CREATE INDEX idx_disposisi_inbox ON disposisi(to_user_id, status, created_at DESC);
CREATE INDEX idx_disposisi_outbox ON disposisi(from_user_id, created_at DESC);
";

const LAMPIRAN_SQL: &str = r"
CREATE TABLE lampiran (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    surat_masuk_id UUID REFERENCES surat_masuk(id),
    surat_keluar_id UUID REFERENCES surat_keluar(id),
    file_name VARCHAR(255) NOT NULL,
    url TEXT NOT NULL,
    public_id VARCHAR(255) NOT NULL,
    mime_type VARCHAR(100),
    file_size BIGINT,
    uploaded_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_lampiran_one_letter CHECK (num_nonnulls(surat_masuk_id, surat_keluar_id) = 1),
    CONSTRAINT chk_lampiran_size CHECK (file_size IS NULL OR file_size >= 0)
);

CREATE INDEX idx_lampiran_masuk ON lampiran(surat_masuk_id) WHERE surat_masuk_id IS NOT NULL;
CREATE INDEX idx_lampiran_keluar ON lampiran(surat_keluar_id) WHERE surat_keluar_id IS NOT NULL;
";

const ACTIVITY_LOGS_SQL: &str = r"
CREATE TABLE activity_logs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    surat_masuk_id UUID REFERENCES surat_masuk(id),
    surat_keluar_id UUID REFERENCES surat_keluar(id),
    user_id UUID NOT NULL REFERENCES users(id),
    action VARCHAR(50) NOT NULL,
    description TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_activity_one_letter CHECK (num_nonnulls(surat_masuk_id, surat_keluar_id) = 1)
);

CREATE INDEX idx_activity_recent ON activity_logs(created_at DESC);
CREATE INDEX idx_activity_masuk ON activity_logs(surat_masuk_id, created_at) WHERE surat_masuk_id IS NOT NULL;
CREATE INDEX idx_activity_keluar ON activity_logs(surat_keluar_id, created_at) WHERE surat_keluar_id IS NOT NULL;
";

const NOTIFICATIONS_SQL: &str = r"
CREATE TABLE notifications (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title VARCHAR(255) NOT NULL,
    message TEXT NOT NULL,
    surat_masuk_id UUID REFERENCES surat_masuk(id),
    surat_keluar_id UUID REFERENCES surat_keluar(id),
    is_read BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_notification_letter CHECK (num_nonnulls(surat_masuk_id, surat_keluar_id) <= 1)
);

CREATE INDEX idx_notifications_user ON notifications(user_id, is_read, created_at DESC);
";

const SEQUENCE_COUNTERS_SQL: &str = r"
CREATE TABLE sequence_counters (
    year INTEGER NOT NULL,
    code VARCHAR(20) NOT NULL,
    value INTEGER NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (year, code),
    CONSTRAINT chk_sequence_positive CHECK (value >= 0)
);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: prevent_letter_number_change
-- An official letter number is immutable once minted
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_letter_number_change()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.letter_number IS NOT NULL AND NEW.letter_number IS DISTINCT FROM OLD.letter_number THEN
        RAISE EXCEPTION 'Letter number % cannot be changed', OLD.letter_number;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_letter_number_change
BEFORE UPDATE ON surat_keluar
FOR EACH ROW
EXECUTE FUNCTION prevent_letter_number_change();

-- ============================================================
-- FUNCTION: prevent_activity_log_modification
-- The activity log is append-only; rows go away only with their letter
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_activity_log_modification()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Activity log entries cannot be modified';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_activity_log_update
BEFORE UPDATE ON activity_logs
FOR EACH ROW
EXECUTE FUNCTION prevent_activity_log_modification();
";

const DROP_ALL_SQL: &str = r"
-- Drop triggers and functions
DROP TRIGGER IF EXISTS trg_prevent_activity_log_update ON activity_logs;
DROP TRIGGER IF EXISTS trg_prevent_letter_number_change ON surat_keluar;
DROP FUNCTION IF EXISTS prevent_activity_log_modification();
DROP FUNCTION IF EXISTS prevent_letter_number_change();

-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS sequence_counters CASCADE;
DROP TABLE IF EXISTS notifications CASCADE;
DROP TABLE IF EXISTS activity_logs CASCADE;
DROP TABLE IF EXISTS lampiran CASCADE;
DROP TABLE IF EXISTS disposisi CASCADE;
DROP TABLE IF EXISTS surat_keluar CASCADE;
DROP TABLE IF EXISTS surat_masuk CASCADE;
DROP TABLE IF EXISTS users CASCADE;

-- Drop enums
DROP TYPE IF EXISTS routing_status CASCADE;
DROP TYPE IF EXISTS outgoing_status CASCADE;
DROP TYPE IF EXISTS incoming_status CASCADE;
DROP TYPE IF EXISTS user_role CASCADE;
";
