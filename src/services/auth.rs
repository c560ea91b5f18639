//! Registration, login and password hashing.

use rand::distr::{Alphanumeric, SampleString};
use sha2::{Digest, Sha256};
use validator::Validate;

use crate::domain::user::{NewUser, User};
use crate::forms::auth::{LoginForm, RegisterForm};
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

const SALT_LEN: usize = 16;

/// Salted SHA-256 digest stored as `salt$hexdigest`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt = Alphanumeric.sample_string(&mut rand::rng(), SALT_LEN);
    format!("{salt}${}", digest(&salt, password))
}

#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, hash)) => digest(salt, password) == hash,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks the credentials and returns the account they belong to.
pub fn login<R>(repo: &R, form: &LoginForm) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    if form.validate().is_err() {
        return Err(ServiceError::Form(
            "Имя пользователя и пароль обязательны.".to_string(),
        ));
    }

    let username = form.username.trim().to_lowercase();
    let user = repo
        .get_user_by_username(&username)
        .map_err(ServiceError::from)?;

    match user {
        Some(user) if verify_password(&form.password, &user.password_hash) => Ok(user),
        _ => Err(ServiceError::Unauthorized),
    }
}

/// Creates an account after checking the username is free.
pub fn register<R>(repo: &R, form: &RegisterForm) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    if form.validate().is_err() {
        return Err(ServiceError::Form(
            "Все поля обязательны для заполнения".to_string(),
        ));
    }

    let new_user = NewUser::new(form.username.clone(), hash_password(&form.password));

    if repo
        .get_user_by_username(&new_user.username)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Form(
            "Пользователь с таким именем уже существует".to_string(),
        ));
    }

    repo.create_user(&new_user).map_err(|err| {
        log::error!("Failed to create user: {err}");
        ServiceError::from(err)
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;

    fn stored_user(password: &str) -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            password_hash: hash_password(password),
            is_superuser: false,
        }
    }

    #[test]
    fn hash_round_trip() {
        let stored = hash_password("hunter2");
        assert!(stored.contains('$'));
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn two_hashes_differ_by_salt() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-hash"));
    }

    #[test]
    fn login_normalizes_username() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_username()
            .withf(|username| username == "alice")
            .times(1)
            .returning(|_| Ok(Some(stored_user("hunter2"))));

        let form = LoginForm {
            username: "  Alice ".to_string(),
            password: "hunter2".to_string(),
            next: None,
        };

        let user = login(&repo, &form).expect("should log in");
        assert_eq!(user.id, 1);
    }

    #[test]
    fn login_rejects_wrong_password() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_username()
            .returning(|_| Ok(Some(stored_user("hunter2"))));

        let form = LoginForm {
            username: "alice".to_string(),
            password: "wrong".to_string(),
            next: None,
        };

        assert!(matches!(
            login(&repo, &form),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn login_rejects_unknown_user() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_username().returning(|_| Ok(None));

        let form = LoginForm {
            username: "nobody".to_string(),
            password: "secret".to_string(),
            next: None,
        };

        assert!(matches!(
            login(&repo, &form),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn register_rejects_taken_username() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_username()
            .returning(|_| Ok(Some(stored_user("hunter2"))));
        repo.expect_create_user().times(0);

        let form = RegisterForm {
            username: "alice".to_string(),
            password: "secret".to_string(),
        };

        let result = register(&repo, &form);
        assert!(matches!(result, Err(ServiceError::Form(message))
            if message.contains("уже существует")));
    }

    #[test]
    fn register_rejects_empty_fields() {
        let repo = MockRepository::new();

        let form = RegisterForm {
            username: String::new(),
            password: "secret".to_string(),
        };

        assert!(matches!(register(&repo, &form), Err(ServiceError::Form(_))));
    }

    #[test]
    fn register_hashes_and_stores() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_username().returning(|_| Ok(None));
        repo.expect_create_user()
            .withf(|new_user| {
                new_user.username == "bob" && verify_password("secret", &new_user.password_hash)
            })
            .times(1)
            .returning(|new_user| {
                Ok(User {
                    id: 5,
                    username: new_user.username.clone(),
                    password_hash: new_user.password_hash.clone(),
                    is_superuser: false,
                })
            });

        let form = RegisterForm {
            username: " Bob ".to_string(),
            password: "secret".to_string(),
        };

        let user = register(&repo, &form).expect("should register");
        assert_eq!(user.id, 5);
    }
}
