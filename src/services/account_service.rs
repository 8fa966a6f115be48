use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::{password, reset_token},
    db::{
        dao::{DaoBase, DaoLayerError, UserDao},
        entities::user,
    },
    error::AppError,
    forms::{
        FormErrors, LoginForm, SetPasswordForm, SignupForm,
        accounts::{DUPLICATE_EMAIL, DUPLICATE_USERNAME, INVALID_LOGIN},
    },
    mail::{Mailer, OutgoingMail},
};

/// Outcome of a form submission that reached the database.
pub type Validated<T> = Result<T, FormErrors>;

pub const RESET_SUBJECT: &str = "Password reset on Recipe Box";

pub struct AccountService<'a> {
    users: UserDao,
    mailer: &'a dyn Mailer,
    secret: &'a str,
    public_url: String,
}

impl<'a> AccountService<'a> {
    pub fn new(users: UserDao, mailer: &'a dyn Mailer, secret: &'a str, public_url: String) -> Self {
        Self {
            users,
            mailer,
            secret,
            public_url,
        }
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<Validated<user::Model>, AppError> {
        let (account, mut errors) = form.clean();

        if !errors.has("username") && self.users.find_by_username(&account.username).await?.is_some() {
            errors.add("username", DUPLICATE_USERNAME);
        }
        if !errors.has("email") && self.users.email_exists(&account.email).await? {
            errors.add_non_field(DUPLICATE_EMAIL);
        }
        if !errors.is_empty() {
            return Ok(Err(errors));
        }

        let hash = password::hash_password(&account.password)?;
        let created = self
            .users
            .create_user(&account.username, &account.email, &hash)
            .await?;
        tracing::info!(user = %created.username, "account created");
        Ok(Ok(created))
    }

    /// Checks credentials and stamps `last_login_at`.
    pub async fn authenticate(&self, form: &LoginForm) -> Result<Validated<user::Model>, AppError> {
        let errors = form.clean();
        if !errors.is_empty() {
            return Ok(Err(errors));
        }

        let candidate = self.users.find_by_username(form.username.trim()).await?;
        let verified = match candidate {
            Some(found) => password::verify_password(&form.password, &found.password_hash)?
                .then_some(found),
            None => None,
        };
        let Some(found) = verified.filter(|found| found.is_active) else {
            tracing::debug!(username = %form.username.trim(), "login rejected");
            let mut errors = FormErrors::new();
            errors.add_non_field(INVALID_LOGIN);
            return Ok(Err(errors));
        };

        self.users
            .set_last_login(&found.id, &Utc::now().fixed_offset())
            .await?;
        tracing::info!(user = %found.username, "logged in");
        Ok(Ok(found))
    }

    /// Mails a reset link to every active account using `email`. Returns how
    /// many were sent; callers must not reveal it.
    pub async fn request_password_reset(&self, email: &str) -> Result<usize, AppError> {
        let accounts = self.users.find_active_by_email(email).await?;
        for account in &accounts {
            let token = reset_token::issue(self.secret, account)?;
            let link = format!("{}/accounts/reset/{}/{}/", self.public_url, account.id, token);
            self.mailer
                .send(OutgoingMail {
                    to: account.email.clone(),
                    subject: RESET_SUBJECT.to_string(),
                    body: format!(
                        "Someone asked for a password reset for the account \"{}\".\n\nFollow this link to choose a new password:\n{link}\n",
                        account.username
                    ),
                })
                .await
                .map_err(|err| AppError::internal(format!("failed to send reset mail: {err}")))?;
            tracing::info!(user = %account.username, "password reset mail sent");
        }
        Ok(accounts.len())
    }

    /// The account a reset link belongs to, if the link is still good.
    pub async fn reset_target(&self, uid: &str, token: &str) -> Result<Option<user::Model>, AppError> {
        let Ok(id) = Uuid::parse_str(uid) else {
            return Ok(None);
        };
        let account = match self.users.find_by_id(id).await {
            Ok(account) => account,
            Err(DaoLayerError::NotFound { .. }) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(reset_token::is_valid(self.secret, &account, token).then_some(account))
    }

    pub async fn set_password(
        &self,
        account: &user::Model,
        form: &SetPasswordForm,
    ) -> Result<Validated<()>, AppError> {
        let new_password = match form.clean(&account.username) {
            Ok(new_password) => new_password,
            Err(errors) => return Ok(Err(errors)),
        };
        let hash = password::hash_password(&new_password)?;
        self.users.set_password_hash(&account.id, &hash).await?;
        tracing::info!(user = %account.username, "password changed");
        Ok(Ok(()))
    }
}
