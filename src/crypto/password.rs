//! Password handling for encrypted ZIP output.

use zeroize::Zeroizing;

/// A password for AES-256 ZIP encryption.
///
/// The text is wiped from memory when the value is dropped and is never
/// printed by `Debug`.
#[derive(Clone)]
pub struct Password {
    inner: Zeroizing<String>,
}

impl Password {
    /// Creates a new password from a string.
    pub fn new<S: Into<String>>(password: S) -> Self {
        Self {
            inner: Zeroizing::new(password.into()),
        }
    }

    /// Returns the password as a string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns true if the password is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns true if the password is empty or whitespace only.
    ///
    /// Such a password cannot be used to encrypt an archive.
    pub fn is_blank(&self) -> bool {
        self.inner.trim().is_empty()
    }

    /// Returns the length of the password in characters.
    pub fn len(&self) -> usize {
        self.inner.chars().count()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl From<&str> for Password {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Password {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("hunter2");
        let debug = format!("{:?}", password);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("len"));
    }

    #[test]
    fn test_blank_passwords() {
        assert!(Password::new("").is_blank());
        assert!(Password::new(" \t\n").is_blank());
        assert!(!Password::new(" x ").is_blank());
        assert!(!Password::new(" \t").is_empty());
    }

    #[test]
    fn test_password_len_counts_chars() {
        assert_eq!(Password::new("пароль").len(), 6);
        assert_eq!(Password::from(String::from("abc")).as_str(), "abc");
    }
}
