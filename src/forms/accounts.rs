use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::{FormErrors, REQUIRED, required_text};

pub const USERNAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 200;
pub const PASSWORD_MIN_LEN: usize = 8;

pub const USERNAME_HELP: &str =
    "Required. 150 characters or fewer. Letters, digits and @/./+/-/_ only.";
pub const EMAIL_HELP: &str = "Required. Enter a valid email address.";
pub const PASSWORD_HELP: &str = "Your password can't be too similar to your username, must contain at least 8 characters and can't be entirely numeric.";

pub const INVALID_LOGIN: &str = "Please enter a correct username and password. Note that both fields may be case-sensitive.";
pub const DUPLICATE_EMAIL: &str =
    "This email address belongs to an existing account! Enter a new email.";
pub const DUPLICATE_USERNAME: &str = "A user with that username already exists.";
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.@+-]+$").unwrap_or_else(|err| panic!("username pattern: {err}"))
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").unwrap_or_else(|err| panic!("email pattern: {err}"))
});

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

/// Signup input that passed every check not needing the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn clean(&self) -> (NewAccount, FormErrors) {
        let mut errors = FormErrors::new();

        let username = required_text(&mut errors, "username", &self.username, USERNAME_MAX_LEN);
        if !username.is_empty() && !USERNAME_RE.is_match(&username) {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        let email = required_text(&mut errors, "email", &self.email, EMAIL_MAX_LEN);
        if !email.is_empty() && !is_valid_email(&email) {
            errors.add("email", "Enter a valid email address.");
        }

        check_new_password(
            &mut errors,
            ("password1", &self.password1),
            ("password2", &self.password2),
            &username,
        );

        (
            NewAccount {
                username,
                email,
                password: self.password1.clone(),
            },
            errors,
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

impl LoginForm {
    pub fn clean(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        if self.username.trim().is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordResetForm {
    pub email: String,
}

impl PasswordResetForm {
    pub fn clean(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::new();
        let email = required_text(&mut errors, "email", &self.email, EMAIL_MAX_LEN);
        if !email.is_empty() && !is_valid_email(&email) {
            errors.add("email", "Enter a valid email address.");
        }
        errors.into_result(email)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetPasswordForm {
    pub new_password1: String,
    pub new_password2: String,
}

impl SetPasswordForm {
    pub fn clean(&self, username: &str) -> Result<String, FormErrors> {
        let mut errors = FormErrors::new();
        check_new_password(
            &mut errors,
            ("new_password1", &self.new_password1),
            ("new_password2", &self.new_password2),
            username,
        );
        errors.into_result(self.new_password1.clone())
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Policy errors for a candidate password; empty when acceptable.
pub fn password_problems(password: &str, username: &str) -> Vec<&'static str> {
    let mut problems = Vec::new();
    if password.chars().count() < PASSWORD_MIN_LEN {
        problems.push("This password is too short. It must contain at least 8 characters.");
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.");
    }
    if !username.is_empty() && password.eq_ignore_ascii_case(username) {
        problems.push("The password is too similar to the username.");
    }
    problems
}

fn check_new_password(
    errors: &mut FormErrors,
    (first_field, first): (&'static str, &str),
    (second_field, second): (&'static str, &str),
    username: &str,
) {
    if first.is_empty() {
        errors.add(first_field, REQUIRED);
    }
    if second.is_empty() {
        errors.add(second_field, REQUIRED);
        return;
    }
    if first.is_empty() {
        return;
    }
    if first != second {
        errors.add(second_field, PASSWORD_MISMATCH);
        return;
    }
    for problem in password_problems(second, username) {
        errors.add(second_field, problem);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        LoginForm, PASSWORD_MISMATCH, SetPasswordForm, SignupForm, is_valid_email,
        password_problems,
    };

    fn signup(username: &str, email: &str, password: &str) -> SignupForm {
        SignupForm {
            username: username.to_string(),
            email: email.to_string(),
            password1: password.to_string(),
            password2: password.to_string(),
        }
    }

    #[test]
    fn valid_signup_has_no_errors() {
        let (account, errors) = signup(" alice ", "alice@example.com", "s3cret-pass").clean();

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(account.username, "alice");
        assert_eq!(account.email, "alice@example.com");
    }

    #[test]
    fn username_rules() {
        let (_, errors) = signup("bad name!", "a@example.com", "s3cret-pass").clean();
        assert!(errors.has("username"));

        let (_, errors) = signup(&"a".repeat(151), "a@example.com", "s3cret-pass").clean();
        assert!(errors.has("username"));

        let (_, errors) = signup("a.b+c-d_e@f", "a@example.com", "s3cret-pass").clean();
        assert!(!errors.has("username"));
    }

    #[test]
    fn email_rules() {
        assert!(is_valid_email("cook@kitchen.example"));
        assert!(!is_valid_email("cook@kitchen"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email("two@@example.com"));

        let long = format!("{}@example.com", "a".repeat(190));
        let (_, errors) = signup("alice", &long, "s3cret-pass").clean();
        assert!(errors.has("email"));
    }

    #[test]
    fn password_policy() {
        assert!(password_problems("s3cret-pass", "alice").is_empty());
        assert_eq!(password_problems("short1", "alice").len(), 1);
        assert_eq!(
            password_problems("12345678", "alice"),
            vec!["This password is entirely numeric."]
        );
        assert_eq!(
            password_problems("alicealice", "AliceAlice"),
            vec!["The password is too similar to the username."]
        );
    }

    #[test]
    fn mismatched_passwords_are_reported_on_the_confirmation() {
        let form = SignupForm {
            password2: "different-pass".to_string(),
            ..signup("alice", "alice@example.com", "s3cret-pass")
        };

        let (_, errors) = form.clean();

        assert_eq!(errors.field("password2"), [PASSWORD_MISMATCH.to_string()]);
        assert!(!errors.has("password1"));
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = LoginForm::default().clean();

        assert!(errors.has("username"));
        assert!(errors.has("password"));
    }

    #[test]
    fn set_password_applies_the_policy() {
        let form = SetPasswordForm {
            new_password1: "1234".to_string(),
            new_password2: "1234".to_string(),
        };

        let errors = form.clean("alice").expect_err("weak password should fail");

        assert_eq!(errors.field("new_password2").len(), 2);
    }
}
