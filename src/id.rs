use uuid::Uuid;

/// Time-ordered id for newly created records and notifications.
pub fn new_uuid_v7() -> String {
    Uuid::now_v7().to_string()
}
