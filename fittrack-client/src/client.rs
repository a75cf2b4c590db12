pub mod loader;

use async_trait::async_trait;
use fittrack_model::user::{CreateUserRequest, User, Username};
use reqwest::{Response, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("server unreachable")]
    CommunicationError,
    #[error("internal server error")]
    InternalServerError,
    #[error("invalid request")]
    RequestError,
    #[error("rejected request: {0}")]
    ValidationError(serde_json::Value),
    #[error("not found")]
    NotFound,
    #[error("incorrect server response")]
    ResponseError,
}

type Result<T> = std::result::Result<T, Error>;

#[mockall::automock]
#[async_trait]
pub trait Client: Send + Sync {
    async fn create_user(&self, request: &CreateUserRequest) -> Result<User>;
    async fn get_user(&self, username: &Username) -> Result<User>;
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn delete_user(&self, username: &Username) -> Result<()>;
}

pub struct ClientImpl {
    url: String,
    client: reqwest::Client,
}

impl ClientImpl {
    fn new(url: String) -> Self {
        Self {
            url: url.trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    fn users_url(&self) -> String {
        format!("{}/users/", self.url)
    }

    fn user_url(&self, username: &Username) -> String {
        format!("{}/users/{}/", self.url, username)
    }
}

pub fn create(url: String) -> impl Client {
    ClientImpl::new(url)
}

async fn check_status(resp: reqwest::Result<Response>) -> Result<Response> {
    let resp = resp.map_err(|_| Error::CommunicationError)?;
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        Err(Error::NotFound)
    } else if status == StatusCode::BAD_REQUEST {
        match resp.json().await {
            Ok(errors) => Err(Error::ValidationError(errors)),
            Err(_) => Err(Error::RequestError),
        }
    } else if status.is_client_error() {
        Err(Error::RequestError)
    } else if status.is_server_error() {
        Err(Error::InternalServerError)
    } else {
        Ok(resp)
    }
}

#[async_trait]
impl Client for ClientImpl {
    async fn create_user(&self, request: &CreateUserRequest) -> Result<User> {
        check_status(self.client.post(self.users_url()).json(request).send().await)
            .await?
            .json()
            .await
            .map_err(|_| Error::ResponseError)
    }

    async fn get_user(&self, username: &Username) -> Result<User> {
        check_status(self.client.get(self.user_url(username)).send().await)
            .await?
            .json()
            .await
            .map_err(|_| Error::ResponseError)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        check_status(self.client.get(self.users_url()).send().await)
            .await?
            .json()
            .await
            .map_err(|_| Error::ResponseError)
    }

    async fn delete_user(&self, username: &Username) -> Result<()> {
        check_status(self.client.delete(self.user_url(username)).send().await).await?;
        Ok(())
    }
}
