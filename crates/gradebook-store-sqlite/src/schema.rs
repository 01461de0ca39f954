//! SQL schema for the gradebook SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS classes (
    class_id      TEXT PRIMARY KEY,
    instructor_id TEXT NOT NULL,   -- instructor of record
    name          TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS students (
    student_id TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    email      TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS enrollments (
    class_id    TEXT NOT NULL REFERENCES classes(class_id),
    student_id  TEXT NOT NULL REFERENCES students(student_id),
    status      TEXT NOT NULL DEFAULT 'active',   -- 'active' | 'dropped'
    enrolled_at TEXT NOT NULL,
    PRIMARY KEY (class_id, student_id)
);

CREATE TABLE IF NOT EXISTS assessments (
    assessment_id TEXT PRIMARY KEY,
    class_id      TEXT NOT NULL REFERENCES classes(class_id),
    kind          TEXT NOT NULL,   -- 'assignment' | 'quiz'
    title         TEXT NOT NULL,
    max_points    REAL NOT NULL CHECK (max_points > 0),
    due_at        TEXT,
    created_at    TEXT NOT NULL
);

-- score / feedback / graded_at mirror the grade entry for assignments.
CREATE TABLE IF NOT EXISTS submissions (
    submission_id TEXT PRIMARY KEY,
    assessment_id TEXT NOT NULL REFERENCES assessments(assessment_id),
    student_id    TEXT NOT NULL REFERENCES students(student_id),
    submitted_at  TEXT NOT NULL,
    notes         TEXT,
    score         REAL,
    feedback      TEXT,
    graded_at     TEXT
);

-- One row per (student, assessment); written only through an upsert.
CREATE TABLE IF NOT EXISTS grade_entries (
    grade_id      TEXT PRIMARY KEY,
    student_id    TEXT NOT NULL REFERENCES students(student_id),
    assessment_id TEXT NOT NULL REFERENCES assessments(assessment_id),
    score         REAL NOT NULL CHECK (score >= 0),
    percentage    REAL NOT NULL,
    letter        TEXT NOT NULL,
    feedback      TEXT,
    updated_at    TEXT NOT NULL,
    UNIQUE (student_id, assessment_id)
);

CREATE TABLE IF NOT EXISTS questions (
    question_id   TEXT PRIMARY KEY,
    assessment_id TEXT NOT NULL REFERENCES assessments(assessment_id),
    position      INTEGER NOT NULL,
    prompt        TEXT NOT NULL,
    kind          TEXT NOT NULL,             -- 'multiple_choice' | 'true_false' | 'short_answer'
    options_json  TEXT NOT NULL DEFAULT '[]',
    answer        TEXT NOT NULL,
    points        REAL NOT NULL CHECK (points > 0),
    UNIQUE (assessment_id, position)
);

CREATE INDEX IF NOT EXISTS classes_instructor_idx    ON classes(instructor_id);
CREATE INDEX IF NOT EXISTS assessments_class_idx     ON assessments(class_id);
CREATE INDEX IF NOT EXISTS submissions_assessment_idx ON submissions(assessment_id, student_id);
CREATE INDEX IF NOT EXISTS grade_entries_assessment_idx ON grade_entries(assessment_id);

PRAGMA user_version = 1;
";
