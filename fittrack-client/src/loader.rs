use fittrack_model::user::{CreateUserRequest, User};
use log::{error, info};

use crate::Client;

/// Posts every request in turn, skipping over the ones the server rejects.
pub async fn load_users(client: &dyn Client, requests: &[CreateUserRequest]) -> Vec<User> {
    let mut created = Vec::with_capacity(requests.len());
    for request in requests {
        match client.create_user(request).await {
            Ok(user) => {
                info!("Created user {} ({})", user.username, user.name);
                created.push(user);
            }
            Err(e) => error!("Failed to create user {:?}, skipping: {}", request.name, e),
        }
    }
    info!("Created {} of {} users", created.len(), requests.len());
    created
}
