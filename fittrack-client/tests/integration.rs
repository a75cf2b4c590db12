use chrono::NaiveDate;
use fittrack_client::{loader::load_users, Error, MockClient};
use fittrack_model::{
    profile::{FitnessProfile, ProfilePayload},
    user::{CreateUserRequest, User},
};
use serde_json::json;

fn request(name: &str, contact_number: &str) -> CreateUserRequest {
    CreateUserRequest {
        name: name.to_owned(),
        fitness_profile: ProfilePayload {
            gender: None,
            date_of_birth: NaiveDate::from_ymd_opt(1995, 3, 14),
            contact_number: Some(contact_number.to_owned()),
            height: Some(172),
            weight: Some(68),
            joining_date: None,
            goal: Some("BR".to_owned()),
        },
    }
}

#[tokio::test]
async fn load_users_skips_rejected_requests() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let mut client = MockClient::new();
    client
        .expect_create_user()
        .times(3)
        .returning(move |request| match request.validate_at(today) {
            Ok(new_user) => Ok(User {
                id: 1,
                username: "qwertyuiop123456".into(),
                name: new_user.name.clone(),
                fitness_profile: FitnessProfile::new(new_user.fitness_profile, today),
            }),
            Err(_) => Err(Error::ValidationError(json!({}))),
        });

    let requests = [
        request("first", "9876543210"),
        request("broken", "12345"),
        request("third", "0123456789"),
    ];
    let created = load_users(&client, &requests).await;

    assert_eq!(
        created.iter().map(|u| u.name.as_str()).collect::<Vec<_>>(),
        vec!["first", "third"]
    );
    assert!((created[0].fitness_profile.bmi() - 22.99).abs() < 1e-9);
}
