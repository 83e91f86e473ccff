//! Password handling for CLI operations.

use packsmith::Password;
use rpassword::prompt_password;

/// Prompts for a password twice and returns it if both entries match
pub fn confirm_password() -> Option<Password> {
    let first = prompt_password("Enter password: ").ok()?;
    if first.trim().is_empty() {
        eprintln!("Password cannot be empty");
        return None;
    }

    let second = prompt_password("Confirm password: ").ok()?;
    if first == second {
        Some(Password::new(first))
    } else {
        eprintln!("Passwords do not match");
        None
    }
}

/// Uses the provided password, or prompts with confirmation when asked to
pub fn get_or_prompt_password(provided: Option<String>, prompt: bool) -> Option<Password> {
    if let Some(pwd) = provided {
        return Some(Password::new(pwd));
    }
    if prompt { confirm_password() } else { None }
}
