use chrono::Utc;
use redb::{ReadableTable, WriteTransaction};

use super::db::{next_id, Database, DatabaseError};
use super::models::Token;
use super::tables::*;

/// Outcome of replacing a user's active token
#[derive(Debug, Clone)]
pub struct Rotation {
    /// The newly issued, active token
    pub issued: Token,
    /// Ids of the tokens that were active before and are now invalidated
    pub revoked_ids: Vec<u64>,
}

impl Database {
    // ========================================================================
    // Token operations
    // ========================================================================

    /// Get a token by its bearer string
    pub fn get_token(&self, token: &str) -> Result<Option<Token>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(TOKENS)?;

        match table.get(token)? {
            Some(data) => {
                let token: Token = rmp_serde::from_slice(data.value())?;
                Ok(Some(token))
            }
            None => Ok(None),
        }
    }

    /// Get the user's tokens that are neither revoked nor expired.
    ///
    /// Tokens are only issued through [`Database::replace_active_tokens`], so
    /// the active index holds the user's single candidate.
    pub fn get_active_tokens_by_user(&self, user_id: u64) -> Result<Vec<Token>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let index_table = read_txn.open_table(ACTIVE_TOKENS)?;
        let tokens_table = read_txn.open_table(TOKENS)?;

        let current = match index_table.get(user_id)? {
            Some(s) => s.value().to_string(),
            None => return Ok(Vec::new()),
        };

        let mut tokens = Vec::new();
        if let Some(data) = tokens_table.get(current.as_str())? {
            let token: Token = rmp_serde::from_slice(data.value())?;
            if token.is_active() {
                tokens.push(token);
            }
        }

        Ok(tokens)
    }

    /// Overwrite existing token records (flag changes). Unknown tokens are rejected.
    pub fn put_tokens(&self, tokens: &[Token]) -> Result<(), DatabaseError> {
        let write_txn = self.begin_write()?;
        for token in tokens {
            if load_token_in(&write_txn, &token.token)?.is_none() {
                return Err(DatabaseError::TokenNotFound);
            }
            write_token_in(&write_txn, token)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Invalidate the user's active token and issue `token` as the only
    /// active one, in a single write transaction.
    pub fn replace_active_tokens(
        &self,
        user_id: u64,
        token: &str,
    ) -> Result<Rotation, DatabaseError> {
        let write_txn = self.begin_write()?;

        let mut revoked_ids = Vec::new();
        if let Some(current) = active_token_in(&write_txn, user_id)? {
            if let Some(mut record) = load_token_in(&write_txn, &current)? {
                if record.is_active() {
                    record.invalidate();
                    write_token_in(&write_txn, &record)?;
                    revoked_ids.push(record.id);
                }
            }
        }

        let issued = create_token_in(&write_txn, user_id, token)?;
        write_txn.commit()?;

        Ok(Rotation {
            issued,
            revoked_ids,
        })
    }

    /// Mark a token revoked and expired. Returns the updated record, or
    /// `None` if no token with that string exists. Already-invalid tokens
    /// are returned unchanged.
    pub fn invalidate_token(&self, token: &str) -> Result<Option<Token>, DatabaseError> {
        let write_txn = self.begin_write()?;

        let updated = match load_token_in(&write_txn, token)? {
            Some(mut record) => {
                if record.is_active() || record.revoked != record.expired {
                    record.invalidate();
                    write_token_in(&write_txn, &record)?;
                }
                Some(record)
            }
            None => None,
        };

        write_txn.commit()?;
        Ok(updated)
    }
}

// ============================================================================
// Transaction-scoped helpers
// ============================================================================

fn load_token_in(txn: &WriteTransaction, token: &str) -> Result<Option<Token>, DatabaseError> {
    let table = txn.open_table(TOKENS)?;
    let result = match table.get(token)? {
        Some(data) => Some(rmp_serde::from_slice(data.value())?),
        None => None,
    };
    Ok(result)
}

fn active_token_in(txn: &WriteTransaction, user_id: u64) -> Result<Option<String>, DatabaseError> {
    let table = txn.open_table(ACTIVE_TOKENS)?;
    let result = table.get(user_id)?.map(|s| s.value().to_string());
    Ok(result)
}

/// Write the record itself; the active index is only touched on creation.
fn write_token_in(txn: &WriteTransaction, token: &Token) -> Result<(), DatabaseError> {
    let mut table = txn.open_table(TOKENS)?;
    let data = rmp_serde::to_vec_named(token)?;
    table.insert(token.token.as_str(), data.as_slice())?;
    Ok(())
}

fn create_token_in(
    txn: &WriteTransaction,
    user_id: u64,
    token: &str,
) -> Result<Token, DatabaseError> {
    debug_assert!(!token.is_empty(), "token string must not be empty");

    let user_exists = {
        let users = txn.open_table(USERS)?;
        let found = users.get(user_id)?.is_some();
        found
    };
    if !user_exists {
        return Err(DatabaseError::UnknownUser(user_id));
    }

    if load_token_in(txn, token)?.is_some() {
        return Err(DatabaseError::DuplicateToken);
    }

    let record = Token {
        created_at: Utc::now(),
        expired: false,
        id: next_id(txn, TOKEN_SEQUENCE)?,
        revoked: false,
        token: token.to_string(),
        user_id,
    };
    write_token_in(txn, &record)?;

    {
        let mut active = txn.open_table(ACTIVE_TOKENS)?;
        active.insert(user_id, record.token.as_str())?;
    }

    Ok(record)
}
