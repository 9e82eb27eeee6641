use formsync_core::model::User;
use tokio::sync::RwLock;

/// In-memory user store. Stands in for a real database.
#[derive(Default)]
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.push(user);
    }

    /// Returns false when no user with the id existed.
    pub async fn remove(&self, id: &str) -> bool {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        users.len() != before
    }
}
