//! User account generation.

use rand::Rng;
use uuid::Uuid;

use crate::generators::identity::{
    self, UniqueSet, UniquenessExhausted, bump_email, bump_login, email_candidate,
    login_candidate, phone_candidate,
};

/// Generated user account ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
}

/// Generates user accounts with unique logins, emails, and phone numbers.
///
/// The generator carries the uniqueness registries, so every account drawn
/// from one instance is collision-free within the run.
pub struct UserGenerator {
    logins: UniqueSet,
    emails: UniqueSet,
    phones: UniqueSet,
}

impl UserGenerator {
    pub fn new() -> Self {
        Self {
            logins: UniqueSet::new(),
            emails: UniqueSet::new(),
            phones: UniqueSet::new(),
        }
    }

    /// Generates a single user.
    pub fn generate(&mut self, rng: &mut impl Rng) -> Result<GeneratedUser, UniquenessExhausted> {
        let name = identity::any_person_name(rng);

        let login = self
            .logins
            .claim(rng, |r| login_candidate(&name, r), bump_login)?;
        let email = self
            .emails
            .claim(rng, |r| email_candidate(&name, r), bump_email)?;
        let phone_number = self.phones.claim_redraw(rng, phone_candidate)?;

        Ok(GeneratedUser {
            id: Uuid::new_v4(),
            first_name: name.first,
            last_name: name.last,
            login,
            email,
            password: identity::password(rng),
            phone_number,
        })
    }

    /// Generates multiple users.
    pub fn generate_batch(
        &mut self,
        count: usize,
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedUser>, UniquenessExhausted> {
        (0..count).map(|_| self.generate(rng)).collect()
    }
}

impl Default for UserGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_user() {
        let mut user_gen = UserGenerator::new();
        let mut rng = rand::thread_rng();
        let user = user_gen.generate(&mut rng).unwrap();

        assert!(!user.first_name.is_empty());
        assert!(user.email.contains('@'));
        assert_eq!(user.phone_number.len(), 9);
        assert!(!user.password.is_empty());
    }

    #[test]
    fn test_batch_has_no_duplicates() {
        let mut user_gen = UserGenerator::new();
        let mut rng = rand::thread_rng();
        let users = user_gen.generate_batch(500, &mut rng).unwrap();

        assert_eq!(users.len(), 500);

        let logins: HashSet<_> = users.iter().map(|u| u.login.as_str()).collect();
        assert_eq!(logins.len(), users.len());

        let emails: HashSet<_> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails.len(), users.len());

        let phones: HashSet<_> = users.iter().map(|u| u.phone_number.as_str()).collect();
        assert_eq!(phones.len(), users.len());

        let ids: HashSet<_> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids.len(), users.len());
    }
}
