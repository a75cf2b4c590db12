//! Table definitions, applied idempotently on every connect.
//!
//! `contact_number` carries no length constraint; the ten digit format is
//! enforced by `MobileNumber` before anything reaches the database.

pub const CREATE_TABLES: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL DEFAULT ''
);
CREATE TABLE IF NOT EXISTS fitness_profiles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE REFERENCES users (id) ON DELETE CASCADE,
    gender TEXT NOT NULL DEFAULT 'M',
    date_of_birth TEXT NOT NULL,
    age INTEGER NOT NULL CHECK (age >= 0),
    contact_number TEXT NOT NULL,
    height INTEGER NOT NULL CHECK (height > 0),
    weight INTEGER NOT NULL CHECK (weight > 0),
    bmi REAL NOT NULL,
    joining_date TEXT,
    goal TEXT NOT NULL DEFAULT 'GF'
);";
