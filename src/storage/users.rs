use chrono::Utc;
use redb::ReadableTable;

use super::db::{next_id, Database, DatabaseError};
use super::models::{NewUser, User};
use super::tables::*;

impl Database {
    // ========================================================================
    // User operations
    // ========================================================================

    /// Insert a new user, allocating its id.
    ///
    /// The email uniqueness check runs inside the same write transaction as
    /// the insert, so two racing registrations for one email cannot both land.
    pub fn insert_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        debug_assert!(!new_user.email.is_empty(), "user email must not be empty");
        debug_assert!(
            !new_user.password_hash.is_empty(),
            "user password hash must not be empty"
        );

        let write_txn = self.begin_write()?;

        let taken = {
            let emails = write_txn.open_table(USER_EMAILS)?;
            let existing = emails.get(new_user.email.as_str())?;
            existing.is_some()
        };
        if taken {
            // Dropping the transaction aborts it
            return Err(DatabaseError::DuplicateEmail(new_user.email));
        }

        let user = User {
            created_at: Utc::now(),
            email: new_user.email,
            id: next_id(&write_txn, USER_SEQUENCE)?,
            name: new_user.name,
            password_hash: new_user.password_hash,
            role: new_user.role,
        };

        {
            let mut users = write_txn.open_table(USERS)?;
            let data = rmp_serde::to_vec_named(&user)?;
            users.insert(user.id, data.as_slice())?;

            let mut emails = write_txn.open_table(USER_EMAILS)?;
            emails.insert(user.email.as_str(), user.id)?;
        }
        write_txn.commit()?;

        Ok(user)
    }

    /// Get a user by id
    pub fn get_user(&self, id: u64) -> Result<Option<User>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(USERS)?;

        match table.get(id)? {
            Some(data) => {
                let user: User = rmp_serde::from_slice(data.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Get a user by exact (case-sensitive) email
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let emails = read_txn.open_table(USER_EMAILS)?;
        let users = read_txn.open_table(USERS)?;

        let id = match emails.get(email)? {
            Some(id) => id.value(),
            None => return Ok(None),
        };

        match users.get(id)? {
            Some(data) => Ok(Some(rmp_serde::from_slice(data.value())?)),
            None => Ok(None),
        }
    }

    pub fn email_exists(&self, email: &str) -> Result<bool, DatabaseError> {
        let read_txn = self.begin_read()?;
        let emails = read_txn.open_table(USER_EMAILS)?;
        let found = emails.get(email)?.is_some();
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::Role;
    use crate::testutil::{make_new_user, setup_db};

    #[test]
    fn test_insert_and_get_user() {
        let (db, _temp) = setup_db();

        let user = db.insert_user(make_new_user("ana@shop.com")).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.role, Role::User);

        let by_email = db.get_user_by_email("ana@shop.com").unwrap().unwrap();
        assert_eq!(by_email.id, user.id);

        let by_id = db.get_user(user.id).unwrap().unwrap();
        assert_eq!(by_id.email, "ana@shop.com");
    }

    #[test]
    fn test_ids_are_sequential() {
        let (db, _temp) = setup_db();

        let first = db.insert_user(make_new_user("a@shop.com")).unwrap();
        let second = db.insert_user(make_new_user("b@shop.com")).unwrap();
        assert_eq!(second.id, first.id + 1);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (db, _temp) = setup_db();

        db.insert_user(make_new_user("ana@shop.com")).unwrap();
        let err = db.insert_user(make_new_user("ana@shop.com")).unwrap_err();
        assert!(matches!(err, DatabaseError::DuplicateEmail(ref e) if e == "ana@shop.com"));

        // The failed insert must not have consumed an id
        let next = db.insert_user(make_new_user("bob@shop.com")).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn test_email_lookup_is_case_sensitive() {
        let (db, _temp) = setup_db();

        db.insert_user(make_new_user("Ana@shop.com")).unwrap();
        assert!(db.email_exists("Ana@shop.com").unwrap());
        assert!(!db.email_exists("ana@shop.com").unwrap());
        assert!(db.get_user_by_email("ana@shop.com").unwrap().is_none());
    }
}
