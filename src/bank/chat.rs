use rusqlite::{Connection, Row, params};

use super::{Bank, BankError, User, now_rfc3339};

const MAX_MESSAGE_LEN: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: i64,
    /// `user` or `support`
    pub sender: String,
    pub message: String,
    pub created_at: String,
}

impl ChatMessage {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            sender: row.get("sender")?,
            message: row.get("message")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn display(&self) -> String {
        format!("[{}] {}: {}", self.created_at, self.sender, self.message)
    }
}

/// Support is a script; the first matching keyword wins.
fn support_reply(message: &str) -> &'static str {
    const REPLIES: &[(&str, &str)] = &[
        ("card", "If your card is lost, block it right away with `zelda bank card block <id>`."),
        ("loan", "Loan balances and repayments are listed under `zelda bank loan list`."),
        ("balance", "Your balances are listed under `zelda bank accounts`."),
        ("password", "For your security we never ask for your password in chat."),
    ];
    let lower = message.to_lowercase();
    REPLIES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, reply)| *reply)
        .unwrap_or("Thanks for reaching out! A support agent will get back to you shortly.")
}

fn insert(conn: &Connection, user_id: i64, sender: &str, message: &str) -> Result<ChatMessage, BankError> {
    let created_at = now_rfc3339();
    conn.execute(
        "INSERT INTO chats (user_id, sender, message, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![user_id, sender, message, created_at],
    )?;
    Ok(ChatMessage {
        id: conn.last_insert_rowid(),
        sender: sender.to_string(),
        message: message.to_string(),
        created_at,
    })
}

impl Bank {
    /// Store the user's message and the canned support reply; returns the reply.
    pub fn send_chat(&mut self, user: &User, message: &str) -> Result<ChatMessage, BankError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(BankError::InvalidInput("message must not be empty".to_string()));
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(BankError::InvalidInput(format!(
                "message is longer than {MAX_MESSAGE_LEN} characters"
            )));
        }
        let tx = self.conn.transaction()?;
        insert(&tx, user.id, "user", message)?;
        let reply = insert(&tx, user.id, "support", support_reply(message))?;
        tx.commit()?;
        Ok(reply)
    }

    /// Oldest first.
    pub fn chat_log(&self, user: &User) -> Result<Vec<ChatMessage>, BankError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, sender, message, created_at FROM chats WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![user.id], ChatMessage::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
