use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
/// Form data for signing in.
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Return URL carried through the login page.
    #[serde(default)]
    pub next: Option<String>,
}

impl LoginForm {
    /// The return URL, if it points back into this site. Absolute URLs,
    /// protocol-relative ones and backslash tricks are dropped.
    #[must_use]
    pub fn safe_next(&self) -> Option<&str> {
        self.next.as_deref().filter(|next| {
            next.starts_with('/')
                && !next.starts_with("//")
                && !next.contains('\\')
                && !next.contains(':')
        })
    }
}

#[derive(Deserialize, Validate)]
/// JSON payload for creating an account.
pub struct RegisterForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_next_rejects_external_urls() {
        let mut form = LoginForm {
            username: "user".to_string(),
            password: "secret".to_string(),
            next: Some("/dashboard?page=2".to_string()),
        };
        assert_eq!(form.safe_next(), Some("/dashboard?page=2"));

        form.next = Some("https://evil.example/".to_string());
        assert_eq!(form.safe_next(), None);

        form.next = Some("//evil.example/".to_string());
        assert_eq!(form.safe_next(), None);

        form.next = Some("/\\evil.example".to_string());
        assert_eq!(form.safe_next(), None);

        form.next = None;
        assert_eq!(form.safe_next(), None);
    }
}
