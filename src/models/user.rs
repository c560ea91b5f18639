use diesel::prelude::*;

use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
/// Diesel model for [`crate::domain::user::User`].
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub is_superuser: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
/// Insertable form of [`User`].
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub is_superuser: bool,
}

impl From<User> for DomainUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            password_hash: user.password_hash,
            is_superuser: user.is_superuser,
        }
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            username: user.username.as_str(),
            password_hash: user.password_hash.as_str(),
            is_superuser: user.is_superuser,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_user_into_domain() {
        let db = User {
            id: 1,
            username: "alice".into(),
            password_hash: "salt$hash".into(),
            is_superuser: true,
        };
        let domain: DomainUser = db.into();
        assert_eq!(domain.id, 1);
        assert_eq!(domain.username, "alice");
        assert!(domain.is_superuser);
    }

    #[test]
    fn from_domain_newuser() {
        let domain = DomainNewUser::new(" Alice ".to_string(), "salt$hash".to_string());
        let new: NewUser = (&domain).into();
        assert_eq!(new.username, "alice");
        assert_eq!(new.password_hash, "salt$hash");
        assert!(!new.is_superuser);
    }
}
