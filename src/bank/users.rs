use rusqlite::{OptionalExtension, Row, params};
use sha2::{Digest, Sha256};

use super::accounts::{self, AccountKind};
use super::{Bank, BankError, now_rfc3339};

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 32;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl User {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            email: row.get("email")?,
            created_at: row.get("created_at")?,
        })
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn validate_username(username: &str) -> Result<(), BankError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(BankError::InvalidInput(format!(
            "username must be {MIN_USERNAME_LEN}-{MAX_USERNAME_LEN} characters"
        )));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(BankError::InvalidInput(
            "username may only contain letters, digits and '_'".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), BankError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(BankError::InvalidInput(format!("'{email}' is not an email address"))),
    }
}

impl Bank {
    /// Create a user and their default checking account.
    pub fn register(&mut self, username: &str, email: &str, password: &str) -> Result<User, BankError> {
        let username = username.trim();
        let email = email.trim();
        validate_username(username)?;
        validate_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(BankError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let tx = self.conn.transaction()?;
        let taken: Option<String> = tx
            .query_row(
                "SELECT username FROM users WHERE username = ?1 OR email = ?2",
                params![username, email],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(existing) = taken {
            let what = if existing == username { "username" } else { "email" };
            return Err(BankError::Conflict(format!("{what} is already registered")));
        }

        let salt = uuid::Uuid::new_v4().simple().to_string();
        let created_at = now_rfc3339();
        tx.execute(
            "INSERT INTO users (username, email, password_hash, salt, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![username, email, hash_password(&salt, password), salt, created_at],
        )?;
        let user = User {
            id: tx.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            created_at,
        };
        accounts::insert_account(&tx, user.id, AccountKind::Checking)?;
        tx.commit()?;

        log::info!("Registered bank user {}", user.username);
        Ok(user)
    }

    /// Unknown users and wrong passwords produce the same error.
    pub fn login(&self, username: &str, password: &str) -> Result<User, BankError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, username, email, created_at, password_hash, salt
                 FROM users WHERE username = ?1",
                params![username.trim()],
                |row| {
                    let user = User::from_row(row)?;
                    let hash: String = row.get("password_hash")?;
                    let salt: String = row.get("salt")?;
                    Ok((user, hash, salt))
                },
            )
            .optional()?;

        match row {
            Some((user, hash, salt)) if hash_password(&salt, password) == hash => Ok(user),
            _ => {
                log::warn!("Failed bank login for {}", username.trim());
                Err(BankError::InvalidCredentials)
            }
        }
    }

    pub fn user_by_username(&self, username: &str) -> Result<User, BankError> {
        self.conn
            .query_row(
                "SELECT id, username, email, created_at FROM users WHERE username = ?1",
                params![username.trim()],
                User::from_row,
            )
            .optional()?
            .ok_or_else(|| BankError::NotFound(format!("user '{}'", username.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> Bank {
        Bank::open_in_memory().unwrap()
    }

    #[test]
    fn test_register_creates_default_checking_account() {
        let mut bank = bank();
        let user = bank.register("  alice ", "alice@example.com", "password123").unwrap();
        assert_eq!(user.username, "alice");

        let accounts = bank.accounts(&user).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].kind, AccountKind::Checking);
        assert_eq!(accounts[0].balance_cents, 0);
        assert_eq!(accounts[0].number.len(), 10);
    }

    #[test]
    fn test_register_validation() {
        let mut bank = bank();
        for (name, email, password) in [
            ("al", "al@example.com", "password123"),
            ("bad name", "x@example.com", "password123"),
            ("bob", "not-an-email", "password123"),
            ("bob", "@example.com", "password123"),
            ("bob", "bob@example.com", "short"),
        ] {
            assert!(
                matches!(bank.register(name, email, password), Err(BankError::InvalidInput(_))),
                "{name}/{email}/{password} should be rejected"
            );
        }
    }

    #[test]
    fn test_register_duplicates_conflict() {
        let mut bank = bank();
        bank.register("alice", "alice@example.com", "password123").unwrap();
        assert!(matches!(
            bank.register("alice", "other@example.com", "password123"),
            Err(BankError::Conflict(msg)) if msg.contains("username")
        ));
        assert!(matches!(
            bank.register("alice2", "alice@example.com", "password123"),
            Err(BankError::Conflict(msg)) if msg.contains("email")
        ));
    }

    #[test]
    fn test_login() {
        let mut bank = bank();
        let user = bank.register("alice", "alice@example.com", "password123").unwrap();

        assert_eq!(bank.login("alice", "password123").unwrap(), user);
        assert!(matches!(
            bank.login("alice", "wrong-password"),
            Err(BankError::InvalidCredentials)
        ));
        assert!(matches!(
            bank.login("nobody", "password123"),
            Err(BankError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_password_hash_is_salted() {
        assert_ne!(hash_password("a", "secret"), hash_password("b", "secret"));
        assert_eq!(hash_password("a", "secret").len(), 64);
    }
}
