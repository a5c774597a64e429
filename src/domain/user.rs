use serde::{Deserialize, Serialize};

use crate::domain::review::Review;
use crate::domain::{DomainError, DomainResult};

/// An authenticated catalog user.
///
/// The password arrives already hashed through the opaque one-way transform;
/// the domain never sees plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    username: String,
    password_hash: String,
    reviews: Vec<Review>,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            reviews: Vec::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn reviews(&self) -> impl Iterator<Item = &Review> {
        self.reviews.iter()
    }

    pub fn number_of_reviews(&self) -> usize {
        self.reviews.len()
    }

    pub(crate) fn add_review(&mut self, review: Review) {
        self.reviews.push(review);
    }
}

/// Equality is by username, the user's natural key.
impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
    }
}

/// Username cannot be empty
pub fn validate_user(user: &User) -> DomainResult<()> {
    if user.username().trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Username cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_construction() {
        let user = User::new("dbowie", "1234567890");
        assert_eq!(user.username(), "dbowie");
        assert_eq!(user.password_hash(), "1234567890");
        assert_eq!(user.number_of_reviews(), 0);
    }

    #[test]
    fn test_equality_is_by_username() {
        let a = User::new("dbowie", "x");
        let b = User::new("dbowie", "y");
        assert_eq!(a, b);
    }

    #[test]
    fn test_blank_username_fails() {
        assert!(validate_user(&User::new("  ", "pw")).is_err());
    }
}
