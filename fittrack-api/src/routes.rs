use actix_web::{delete, get, http::header, post, put, web, HttpResponse, Responder};
use fittrack_model::{profile::today, user::Username};
use serde_json::{json, Value};

use crate::{
    accounts::{AccountService, Result},
    error::json_error_handler,
};

#[get("/health")]
async fn health() -> impl Responder {
    web::Json(json!({ "status": "ok" }))
}

#[post("/users/")]
async fn create_user(
    accounts: web::Data<AccountService>,
    body: web::Json<Value>,
) -> Result<HttpResponse> {
    let user = accounts.create_account(&body, today()).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, user.absolute_url()))
        .json(user))
}

#[get("/users/")]
async fn list_users(accounts: web::Data<AccountService>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(accounts.list_users().await?))
}

#[get("/users/{username}/")]
async fn get_user(
    accounts: web::Data<AccountService>,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let username = Username::from(username.into_inner());
    Ok(HttpResponse::Ok().json(accounts.get_user(&username).await?))
}

#[put("/users/{username}/fitness_profile/")]
async fn update_profile(
    accounts: web::Data<AccountService>,
    username: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse> {
    let username = Username::from(username.into_inner());
    let user = accounts.update_profile(&username, &body, today()).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[delete("/users/{username}/")]
async fn delete_user(
    accounts: web::Data<AccountService>,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    accounts
        .delete_user(&Username::from(username.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Registers every endpoint. Expects a `web::Data<AccountService>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(health)
        .service(create_user)
        .service(list_users)
        .service(get_user)
        .service(update_profile)
        .service(delete_user);
}
