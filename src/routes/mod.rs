pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::auth::{AuthGate, RequireRole};
use crate::models::Role;

/// Registers every route. `/tasks/all` is declared ahead of `/tasks/{id}` so
/// it is not captured as a task id.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(auth::register)
        .service(auth::login)
        .service(
            web::scope("/tasks")
                .wrap(AuthGate)
                .service(
                    web::resource("/all")
                        .wrap(RequireRole::new(Role::Admin))
                        .route(web::get().to(tasks::list_all_tasks)),
                )
                .service(
                    web::resource("")
                        .route(web::post().to(tasks::create_task))
                        .route(web::get().to(tasks::list_tasks)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(tasks::get_task))
                        .route(web::put().to(tasks::update_task))
                        .route(web::delete().to(tasks::delete_task)),
                ),
        );
}
