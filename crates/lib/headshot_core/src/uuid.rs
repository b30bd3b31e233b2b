// Saved headshots are listed newest-first, so their ids are generated
// app-side as UUIDv7 (timestamp-sortable). Accounts keep PG's
// gen_random_uuid() (v4) since they are owned by the auth provider.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}
