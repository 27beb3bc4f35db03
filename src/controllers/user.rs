use regex::Regex;

use crate::core::error::{self, Error};
use crate::core::store::UserStore;
use crate::types::AuthorizedUser;
use crate::utils::password;

/// Orchestrates registration and login on top of a [`UserStore`]. Stateless
/// apart from the compiled email pattern; safe to clone per request.
#[derive(Clone)]
pub(crate) struct UserController<S> {
    store: S,
    email_pattern: Regex,
}

impl<S> std::fmt::Debug for UserController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserController")
            .field("email_pattern", &self.email_pattern.as_str())
            .finish()
    }
}

impl<S: UserStore> UserController<S> {
    pub(crate) fn new(store: S) -> Result<Self, error::ConfigError> {
        Ok(Self {
            store,
            email_pattern: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")?,
        })
    }

    pub(crate) async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthorizedUser, Error> {
        if username.trim().is_empty() {
            return Err(Error::InvalidUsername);
        }

        if !self.email_pattern.is_match(email) {
            return Err(Error::InvalidEmail);
        }

        if password.len() < 6 {
            return Err(Error::InvalidPassword(
                "Password must be at least 6 characters".to_owned(),
            ));
        }

        if self.store.find_by_email(email).await?.is_some() {
            return Err(Error::UserAlreadyExists);
        }

        let password_hash = password::hash(password)?;

        // The store's unique constraints close the remaining
        // check-then-insert race.
        self.store.insert(username, email, &password_hash).await
    }

    /// Unknown email and wrong password return the same error so callers
    /// cannot probe for account existence. Token issuance is the handler's
    /// job, not this method's.
    pub(crate) async fn login(&self, email: &str, password: &str) -> Result<AuthorizedUser, Error> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(Error::InvalidCredentials)?;

        if !password::verify(password, &user.password_hash)? {
            return Err(Error::InvalidCredentials);
        }

        Ok(user)
    }

    pub(crate) async fn get_profile(&self, id: i32) -> Result<AuthorizedUser, Error> {
        self.store.find_by_id(id).await?.ok_or(Error::UserNotFound)
    }

    pub(crate) async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AuthorizedUser>, Error> {
        self.store.find_by_username(username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::auth::{decode_jwt, encode_jwt};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Debug, Default)]
    struct MemoryStore {
        users: Arc<Mutex<Vec<AuthorizedUser>>>,
    }

    #[async_trait]
    impl UserStore for MemoryStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<AuthorizedUser>, Error> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|user| user.email == email)
                .cloned())
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<AuthorizedUser>, Error> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|user| user.username == username)
                .cloned())
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<AuthorizedUser>, Error> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|user| user.id == id)
                .cloned())
        }

        async fn insert(
            &self,
            username: &str,
            email: &str,
            password_hash: &str,
        ) -> Result<AuthorizedUser, Error> {
            let mut users = self.users.lock().unwrap();

            // Mirrors the unique constraints on the users table.
            if users
                .iter()
                .any(|user| user.email == email || user.username == username)
            {
                return Err(Error::UserAlreadyExists);
            }

            let user = AuthorizedUser {
                id: users.len() as i32 + 1,
                username: username.to_owned(),
                email: email.to_owned(),
                password_hash: password_hash.to_owned(),
            };

            users.push(user.clone());

            Ok(user)
        }
    }

    fn controller() -> UserController<MemoryStore> {
        UserController::new(MemoryStore::default()).unwrap()
    }

    #[tokio::test]
    async fn register_creates_user_with_hashed_password() {
        let controller = controller();

        let user = controller
            .register("bob", "bob@x.com", "secret1")
            .await
            .unwrap();

        assert_eq!(user.username, "bob");
        assert_eq!(user.email, "bob@x.com");
        assert_ne!(user.password_hash, "secret1");
    }

    #[tokio::test]
    async fn duplicate_email_creates_no_second_row() {
        let controller = controller();

        controller
            .register("bob", "bob@x.com", "secret1")
            .await
            .unwrap();

        let result = controller.register("robert", "bob@x.com", "secret2").await;

        assert!(matches!(result, Err(Error::UserAlreadyExists)));
        assert_eq!(controller.store.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let controller = controller();

        controller
            .register("bob", "bob@x.com", "secret1")
            .await
            .unwrap();

        let result = controller.register("bob", "other@x.com", "secret2").await;

        assert!(matches!(result, Err(Error::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn register_then_login_issues_decodable_token() {
        let controller = controller();

        controller
            .register("bob", "bob@x.com", "secret1")
            .await
            .unwrap();

        let user = controller.login("bob@x.com", "secret1").await.unwrap();

        let token = encode_jwt(&user.username, "test-secret").unwrap();
        let data = decode_jwt(&token, "test-secret").unwrap();

        assert_eq!(data.claims.sub, "bob");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let controller = controller();

        controller
            .register("bob", "bob@x.com", "secret1")
            .await
            .unwrap();

        let wrong_password = controller.login("bob@x.com", "secret2").await;
        let unknown_email = controller.login("nobody@x.com", "secret1").await;

        assert!(matches!(wrong_password, Err(Error::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(Error::InvalidCredentials)));
    }

    #[tokio::test]
    async fn profile_of_unknown_id_is_not_found() {
        let controller = controller();

        let result = controller.get_profile(42).await;

        assert!(matches!(result, Err(Error::UserNotFound)));
    }

    #[tokio::test]
    async fn profile_of_registered_user_round_trips() {
        let controller = controller();

        let created = controller
            .register("bob", "bob@x.com", "secret1")
            .await
            .unwrap();

        let fetched = controller.get_profile(created.id).await.unwrap();

        assert_eq!(fetched.username, "bob");
        assert_eq!(fetched.email, "bob@x.com");
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let controller = controller();

        let result = controller.register("  ", "bob@x.com", "secret1").await;

        assert!(matches!(result, Err(Error::InvalidUsername)));
    }

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let controller = controller();

        let result = controller.register("bob", "not-an-email", "secret1").await;

        assert!(matches!(result, Err(Error::InvalidEmail)));
    }

    #[tokio::test]
    async fn short_password_is_rejected_before_any_write() {
        let controller = controller();

        let result = controller.register("bob", "bob@x.com", "abc").await;

        assert!(matches!(result, Err(Error::InvalidPassword(_))));
        assert!(controller.store.users.lock().unwrap().is_empty());
    }
}
