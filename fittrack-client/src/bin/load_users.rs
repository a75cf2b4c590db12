use std::{env, error::Error, fs::File, io::BufReader};

use dotenv::dotenv;
use fittrack_client::loader::load_users;
use fittrack_model::user::CreateUserRequest;
use log::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    log4rs::init_file("log4rs.yml", Default::default())?;
    dotenv().ok();

    let path = env::args().nth(1).unwrap_or_else(|| "users.json".to_owned());
    let url = env::var("FITTRACK_URL").unwrap_or_else(|_| "http://localhost:8080/".to_owned());

    let file = File::open(&path)?;
    let requests: Vec<CreateUserRequest> = serde_json::from_reader(BufReader::new(file))?;
    info!("Loaded {} users from {}", requests.len(), path);

    let client = fittrack_client::create(url);
    load_users(&client, &requests).await;

    Ok(())
}
