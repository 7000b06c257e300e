// Record ids are UUIDv7 generated app-side so that ids sort with creation
// time, matching the `created_at DESC` page scans.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Generate a new record id as its canonical hyphenated string.
pub fn new_record_id() -> String {
    uuidv7().to_string()
}
