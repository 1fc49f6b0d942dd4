//! Mock sign-in. There is no credential check: a user is whoever the session
//! store says it is.

use crate::domain::User;
use crate::ports::SessionPort;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Email address is required")]
    MissingEmail,
    #[error("Password is required")]
    MissingPassword,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Signs in with only an email; the display name is the local part.
pub fn sign_in<S>(session: &S, email: &str) -> Result<User, SessionError>
where
    S: SessionPort + ?Sized,
{
    let email = email.trim();
    if email.is_empty() {
        return Err(SessionError::MissingEmail);
    }
    let name = email.split('@').next().unwrap_or(email).to_string();
    let user = User {
        name,
        email: email.to_string(),
    };
    session.set(&user)?;
    Ok(user)
}

pub fn sign_up<S>(
    session: &S,
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<User, SessionError>
where
    S: SessionPort + ?Sized,
{
    let email = email.trim();
    if email.is_empty() {
        return Err(SessionError::MissingEmail);
    }
    if password.is_empty() {
        return Err(SessionError::MissingPassword);
    }
    if password != confirm {
        return Err(SessionError::PasswordMismatch);
    }
    let user = User {
        name: name.trim().to_string(),
        email: email.to_string(),
    };
    session.set(&user)?;
    Ok(user)
}

pub fn sign_out<S>(session: &S) -> Result<(), SessionError>
where
    S: SessionPort + ?Sized,
{
    session.clear()?;
    Ok(())
}

/// One point each for: at least 8 chars, a digit, a special char, an uppercase letter.
pub fn password_strength(password: &str) -> u8 {
    if password.is_empty() {
        return 0;
    }
    [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| SPECIAL_CHARS.contains(c)),
        password.chars().any(|c| c.is_ascii_uppercase()),
    ]
    .into_iter()
    .filter(|ok| *ok)
    .count() as u8
}

pub fn strength_label(score: u8) -> &'static str {
    match score {
        0 => "",
        1 => "Weak",
        2 => "Fair",
        3 => "Good",
        _ => "Strong",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemorySession(Mutex<Option<User>>);

    impl SessionPort for MemorySession {
        fn current_user(&self) -> anyhow::Result<Option<User>> {
            Ok(self.0.lock().unwrap().clone())
        }
        fn set(&self, user: &User) -> anyhow::Result<()> {
            *self.0.lock().unwrap() = Some(user.clone());
            Ok(())
        }
        fn clear(&self) -> anyhow::Result<()> {
            *self.0.lock().unwrap() = None;
            Ok(())
        }
    }

    #[test]
    fn sign_in_derives_name_from_email() {
        let s = MemorySession::default();
        let user = sign_in(&s, " grace@navy.mil ").unwrap();
        assert_eq!(user.name, "grace");
        assert_eq!(s.current_user().unwrap(), Some(user));
    }

    #[test]
    fn sign_in_requires_email() {
        let s = MemorySession::default();
        assert!(matches!(sign_in(&s, "  "), Err(SessionError::MissingEmail)));
        assert!(s.current_user().unwrap().is_none());
    }

    #[test]
    fn sign_up_rejects_mismatch_without_touching_session() {
        let s = MemorySession::default();
        let err = sign_up(&s, "Ada", "ada@x.org", "Secret1!", "Secret2!").unwrap_err();
        assert!(matches!(err, SessionError::PasswordMismatch));
        assert!(s.current_user().unwrap().is_none());

        let user = sign_up(&s, "Ada", "ada@x.org", "Secret1!", "Secret1!").unwrap();
        assert_eq!(user.name, "Ada");
        sign_out(&s).unwrap();
        assert!(s.current_user().unwrap().is_none());
    }

    #[test]
    fn strength_scores() {
        assert_eq!(password_strength(""), 0);
        assert_eq!(password_strength("abc"), 0);
        assert_eq!(password_strength("abcdefgh"), 1);
        assert_eq!(password_strength("abcdefg1"), 2);
        assert_eq!(password_strength("abcdef1!"), 3);
        assert_eq!(password_strength("Abcdef1!"), 4);
        assert_eq!(strength_label(4), "Strong");
        assert_eq!(strength_label(1), "Weak");
    }
}
