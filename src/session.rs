use uuid::Uuid;

/// Identity attached to every API call made on behalf of a user.
///
/// The backend keys list membership and reviews by username; the session id
/// tags log lines so one user's concurrent sessions stay distinguishable.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub username: String,
    pub session_id: Uuid,
}

impl SessionContext {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            session_id: Uuid::new_v4(),
        }
    }
}
