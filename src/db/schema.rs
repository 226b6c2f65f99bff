//! Database schema and migrations for Leclat.
//!
//! Each entry is applied once, in order; `schema_version` records progress.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: accounts
    r#"
CREATE TABLE usuarios (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    national_id         TEXT NOT NULL,
    email               TEXT NOT NULL COLLATE NOCASE,
    display_name        TEXT NOT NULL,
    phone               TEXT,
    role                TEXT NOT NULL DEFAULT 'customer',  -- 'admin', 'staff', 'customer'
    active              INTEGER NOT NULL DEFAULT 1,
    password_hash       TEXT NOT NULL,                     -- Argon2 PHC string
    reset_token         TEXT,                              -- SHA-256 hex of the issued token
    reset_token_expiry  TEXT,
    created_at          TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at          TEXT NOT NULL DEFAULT (datetime('now')),
    CHECK ((reset_token IS NULL) = (reset_token_expiry IS NULL))
);

CREATE UNIQUE INDEX idx_usuarios_national_id ON usuarios(national_id);
CREATE UNIQUE INDEX idx_usuarios_email ON usuarios(email COLLATE NOCASE);
CREATE INDEX idx_usuarios_reset_token ON usuarios(reset_token);
"#,
    // v2: appointments
    r#"
CREATE TABLE appointments (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id   INTEGER REFERENCES usuarios(id),
    client_name  TEXT NOT NULL,
    national_id  TEXT NOT NULL,
    service      TEXT NOT NULL,
    date         TEXT NOT NULL,                 -- YYYY-MM-DD
    time         TEXT NOT NULL,                 -- HH:MM
    limitation   TEXT,
    status       TEXT NOT NULL DEFAULT 'active', -- 'active', 'cancelled'
    created_at   TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE UNIQUE INDEX idx_appointments_active_slot
    ON appointments(date, time) WHERE status = 'active';
CREATE INDEX idx_appointments_date ON appointments(date);
CREATE INDEX idx_appointments_account ON appointments(account_id);
"#,
    // v3: contact messages
    r#"
CREATE TABLE contact_messages (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,
    subject     TEXT NOT NULL,
    message     TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_contact_messages_created_at ON contact_messages(created_at);
"#,
    // v4: service catalog
    r#"
CREATE TABLE services (
    id                     INTEGER PRIMARY KEY AUTOINCREMENT,
    code                   TEXT NOT NULL,                 -- SERV-XXXXXX
    name                   TEXT NOT NULL,
    image                  TEXT NOT NULL,
    price                  REAL NOT NULL CHECK (price >= 0),
    description            TEXT NOT NULL,
    indications            TEXT NOT NULL,
    recommended_frequency  TEXT NOT NULL,
    duration               TEXT NOT NULL,
    contraindications      TEXT NOT NULL,
    category               TEXT NOT NULL DEFAULT 'other',
    active                 INTEGER NOT NULL DEFAULT 1,
    created_at             TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE UNIQUE INDEX idx_services_code ON services(code);
CREATE INDEX idx_services_category ON services(category);
"#,
    // v5: medical histories, one per national ID
    r#"
CREATE TABLE medical_histories (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    national_id       TEXT NOT NULL,
    general           TEXT NOT NULL,   -- JSON sections
    clinical          TEXT NOT NULL,
    lifestyle         TEXT NOT NULL,
    facial_care       TEXT NOT NULL,
    facial_diagnosis  TEXT NOT NULL,
    treatment_plan    TEXT NOT NULL,
    created_at        TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at        TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE UNIQUE INDEX idx_medical_histories_national_id ON medical_histories(national_id);
"#,
];
