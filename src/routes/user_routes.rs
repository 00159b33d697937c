//! User route configuration.
//!
//! - `POST /user` - create a user
//! - `POST /user/sign_in` - authenticate a user
//! - `GET/PUT/DELETE /user/{userId}` - fetch, update, delete a user
//! - `GET /users` - list all users

use axum::routing::{get, post};
use axum::Router;

use crate::auth::handlers::{
    create_user, delete_user, edit_user, get_all_users, get_user, sign_in,
};
use crate::server::state::AppState;

pub fn configure_user_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/user", post(create_user))
        .route("/user/sign_in", post(sign_in))
        .route(
            "/user/{user_id}",
            get(get_user).put(edit_user).delete(delete_user),
        )
        .route("/users", get(get_all_users))
}
