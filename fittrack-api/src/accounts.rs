use chrono::NaiveDate;
use fittrack_db::user::UserRepository;
use fittrack_model::{
    profile::ProfilePayload,
    user::{CreateUserRequest, User, Username},
    validator::ValidationErrors,
};
use log::{debug, error, info, warn};
use serde_json::Value;

/// Upper bound on username draws for a single sign up.
pub const MAX_USERNAME_ATTEMPTS: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("user {0} not found")]
    NotFound(Username),
    #[error("no unused username found after {0} attempts")]
    UsernameExhausted(usize),
    #[error(transparent)]
    Database(#[from] fittrack_db::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[mockall::automock]
pub trait UsernameGenerator: Send + Sync {
    fn generate(&self) -> Username;
}

pub struct RandomUsernames;

impl UsernameGenerator for RandomUsernames {
    fn generate(&self) -> Username {
        Username::random()
    }
}

pub struct AccountService {
    repository: Box<dyn UserRepository>,
    usernames: Box<dyn UsernameGenerator>,
}

impl AccountService {
    pub fn new(repository: Box<dyn UserRepository>, usernames: Box<dyn UsernameGenerator>) -> Self {
        Self {
            repository,
            usernames,
        }
    }

    /// Validates the request body, picks an unused username and stores the
    /// user with its fitness profile. Nothing is written if validation fails.
    pub async fn create_account(&self, body: &Value, today: NaiveDate) -> Result<User> {
        let new_user = CreateUserRequest::from_json(body, today)?;

        for attempt in 1..=MAX_USERNAME_ATTEMPTS {
            let username = self.usernames.generate();
            if self.repository.username_exists(&username).await? {
                debug!(
                    "Username {} already taken, drawing again ({}/{})",
                    username, attempt, MAX_USERNAME_ATTEMPTS
                );
                continue;
            }

            match self
                .repository
                .create_user(&username, &new_user.name, &new_user.fitness_profile, today)
                .await
            {
                Ok(user) => {
                    info!("Created user {}", user.username);
                    return Ok(user);
                }
                Err(fittrack_db::Error::DuplicateUsername(_)) => {
                    warn!(
                        "Username {} was taken concurrently, drawing again ({}/{})",
                        username, attempt, MAX_USERNAME_ATTEMPTS
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        error!(
            "Failed to find an unused username in {} attempts",
            MAX_USERNAME_ATTEMPTS
        );
        Err(Error::UsernameExhausted(MAX_USERNAME_ATTEMPTS))
    }

    pub async fn get_user(&self, username: &Username) -> Result<User> {
        self.repository
            .fetch_user(username)
            .await?
            .ok_or_else(|| Error::NotFound(username.clone()))
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.repository.fetch_users().await?)
    }

    /// Replaces the fitness profile of a user, recomputing its derived fields.
    pub async fn update_profile(
        &self,
        username: &Username,
        body: &Value,
        today: NaiveDate,
    ) -> Result<User> {
        let fields = ProfilePayload::from_json(body, today)?;
        let user = self
            .repository
            .update_profile(username, &fields, today)
            .await?
            .ok_or_else(|| Error::NotFound(username.clone()))?;
        info!("Updated fitness profile of user {}", username);
        Ok(user)
    }

    pub async fn delete_user(&self, username: &Username) -> Result<()> {
        if self.repository.delete_user(username).await? {
            info!("Deleted user {}", username);
            Ok(())
        } else {
            Err(Error::NotFound(username.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use fittrack_db::user::MockUserRepository;
    use fittrack_model::{
        profile::{FitnessProfile, ProfileFields},
        validation::{field_messages, nested_errors},
    };
    use serde_json::json;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 1, 1)
    }

    fn payload() -> Value {
        json!({
            "gender": "F",
            "date_of_birth": "2000-01-01",
            "contact_number": "9876543210",
            "height": 180,
            "weight": 75,
        })
    }

    fn request() -> Value {
        json!({"name": "Jane", "fitness_profile": payload()})
    }

    fn generator(usernames: &[&str]) -> MockUsernameGenerator {
        let mut usernames: Vec<Username> = usernames.iter().rev().map(|u| (*u).into()).collect();
        let mut generator = MockUsernameGenerator::new();
        generator
            .expect_generate()
            .returning(move || usernames.pop().expect("generator exhausted"));
        generator
    }

    fn stored_user(id: i64, username: &Username, name: &str, fields: &ProfileFields, today: NaiveDate) -> User {
        User {
            id,
            username: username.clone(),
            name: name.to_owned(),
            fitness_profile: FitnessProfile::new(fields.clone(), today),
        }
    }

    fn echo_create_user(repository: &mut MockUserRepository) {
        repository
            .expect_create_user()
            .returning(|username, name, fields, today| Ok(stored_user(1, username, name, fields, today)));
    }

    #[actix_web::test]
    async fn create_account_passes_validated_fields_and_date() {
        let mut repository = MockUserRepository::new();
        repository.expect_username_exists().returning(|_| Ok(false));
        repository
            .expect_create_user()
            .withf(|_, name, fields, today| {
                name.to_string() == "Jane" && fields.height == 180 && fields.weight == 75 && *today == date(2024, 1, 1)
            })
            .times(1)
            .returning(|username, name, fields, today| Ok(stored_user(1, username, name, fields, today)));

        let service = AccountService::new(Box::new(repository), Box::new(generator(&["aaaaaaaaaaaaaaaa"])));
        let user = service.create_account(&request(), today()).await.unwrap();

        assert_eq!(user.username.as_str(), "aaaaaaaaaaaaaaaa");
        assert_eq!(user.name, "Jane");
        assert_eq!(user.fitness_profile.age(), 24);
        assert!((user.fitness_profile.bmi() - 23.15).abs() < 1e-9);
    }

    #[actix_web::test]
    async fn create_account_skips_taken_usernames() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_username_exists()
            .returning(|username| Ok(username.as_str() != "free"));
        repository
            .expect_create_user()
            .withf(|username, _, _, _| username.as_str() == "free")
            .times(1)
            .returning(|username, name, fields, today| Ok(stored_user(7, username, name, fields, today)));

        let service = AccountService::new(
            Box::new(repository),
            Box::new(generator(&["taken", "also-taken", "free"])),
        );
        let user = service.create_account(&request(), today()).await.unwrap();

        assert_eq!(user.username.as_str(), "free");
        assert_eq!(user.id, 7);
    }

    #[actix_web::test]
    async fn create_account_retries_after_concurrent_insert() {
        let mut repository = MockUserRepository::new();
        repository.expect_username_exists().returning(|_| Ok(false));
        repository
            .expect_create_user()
            .withf(|username, name, _, _| username.as_str() == "raced" && name.to_string() == "Jane")
            .times(1)
            .returning(|username, _, _, _| {
                Err(fittrack_db::Error::DuplicateUsername(username.to_string()))
            });
        echo_create_user(&mut repository);

        let service = AccountService::new(
            Box::new(repository),
            Box::new(generator(&["raced", "winner"])),
        );
        let user = service.create_account(&request(), today()).await.unwrap();

        assert_eq!(user.username.as_str(), "winner");
    }

    #[actix_web::test]
    async fn create_account_gives_up_after_max_attempts() {
        let draws = Arc::new(AtomicUsize::new(0));
        let draws_clone = draws.clone();

        let mut generator = MockUsernameGenerator::new();
        generator.expect_generate().returning(move || {
            draws_clone.fetch_add(1, Ordering::Relaxed);
            "taken".into()
        });
        let mut repository = MockUserRepository::new();
        repository.expect_username_exists().returning(|_| Ok(true));

        let service = AccountService::new(Box::new(repository), Box::new(generator));
        let result = service.create_account(&request(), today()).await;

        assert!(matches!(result, Err(Error::UsernameExhausted(MAX_USERNAME_ATTEMPTS))));
        assert_eq!(draws.load(Ordering::Relaxed), MAX_USERNAME_ATTEMPTS);
    }

    #[actix_web::test]
    async fn invalid_request_writes_nothing() {
        // No expectations: any repository or generator call fails the test.
        let service = AccountService::new(
            Box::new(MockUserRepository::new()),
            Box::new(MockUsernameGenerator::new()),
        );
        let mut request = request();
        request["fitness_profile"]["date_of_birth"] = json!("2024-01-01");

        let Err(Error::Validation(errors)) = service.create_account(&request, today()).await else {
            panic!("expected a validation error");
        };
        assert_eq!(
            field_messages(nested_errors(&errors, "fitness_profile").unwrap(), "date_of_birth"),
            vec!["Date of birth must be in the past."]
        );
    }

    #[actix_web::test]
    async fn database_errors_are_propagated() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_username_exists()
            .returning(|_| Err(fittrack_db::Error::Database(sqlx_error())));

        let service = AccountService::new(Box::new(repository), Box::new(generator(&["a"])));
        let result = service.create_account(&request(), today()).await;

        assert!(matches!(result, Err(Error::Database(_))));
    }

    fn sqlx_error() -> fittrack_db::sqlx::Error {
        fittrack_db::sqlx::Error::PoolClosed
    }

    #[actix_web::test]
    async fn get_missing_user() {
        let mut repository = MockUserRepository::new();
        repository.expect_fetch_user().returning(|_| Ok(None));

        let service = AccountService::new(Box::new(repository), Box::new(RandomUsernames));
        let result = service.get_user(&"nobody".into()).await;

        assert!(matches!(result, Err(Error::NotFound(username)) if username.as_str() == "nobody"));
    }

    #[actix_web::test]
    async fn update_profile_passes_fields_and_date() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_update_profile()
            .withf(|_, fields, today| fields.height == 200 && fields.weight == 50 && *today == date(2024, 1, 1))
            .returning(|username, fields, today| Ok(Some(stored_user(1, username, "", fields, today))));

        let service = AccountService::new(Box::new(repository), Box::new(RandomUsernames));
        let mut body = payload();
        body["height"] = json!(200);
        body["weight"] = json!(50);
        let user = service
            .update_profile(&"someone".into(), &body, today())
            .await
            .unwrap();

        assert_eq!(user.fitness_profile.age(), 24);
        assert!((user.fitness_profile.bmi() - 12.5).abs() < 1e-9);
    }

    #[actix_web::test]
    async fn update_profile_rejects_invalid_payload() {
        let service = AccountService::new(
            Box::new(MockUserRepository::new()),
            Box::new(RandomUsernames),
        );
        let mut body = payload();
        body["weight"] = json!(0);
        let result = service.update_profile(&"someone".into(), &body, today()).await;

        let Err(Error::Validation(errors)) = result else {
            panic!("expected a validation error");
        };
        assert_eq!(
            field_messages(&errors, "weight"),
            vec!["Weight must be a positive value."]
        );
    }

    #[actix_web::test]
    async fn delete_user() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_delete_user()
            .returning(|username| Ok(username.as_str() == "present"));

        let service = AccountService::new(Box::new(repository), Box::new(RandomUsernames));

        assert!(service.delete_user(&"present".into()).await.is_ok());
        assert!(matches!(
            service.delete_user(&"absent".into()).await,
            Err(Error::NotFound(_))
        ));
    }
}
