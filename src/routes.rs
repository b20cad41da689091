use crate::{
    api::{application, attendance, branch, holiday, resolve},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

// Helper to build per-scope limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst size are both non-zero");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let compute_limiter = Arc::new(build_limiter(config.rate_compute_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Pure computations, no database
    cfg.service(
        web::scope(&format!("{}/resolve", config.api_prefix))
            .wrap(compute_limiter)
            .route("/timeline", web::post().to(resolve::resolve_timeline))
            .route("/geofence", web::post().to(resolve::resolve_geofence))
            .route("/flag", web::post().to(resolve::resolve_flag)),
    );

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/attendance")
                    .route("/check-in", web::post().to(attendance::check_in))
                    .route("/check-out", web::put().to(attendance::check_out))
                    .route("/timeline", web::get().to(attendance::timeline))
                    .route("/summary", web::get().to(attendance::summary)),
            )
            .service(
                web::scope("/holiday").service(
                    web::resource("")
                        .route(web::get().to(holiday::list_holidays))
                        .route(web::post().to(holiday::create_holiday)),
                ),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(application::leave_list))
                            .route(web::post().to(application::create_leave)),
                    )
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(application::get_leave)))
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(application::approve_leave)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(application::reject_leave)),
                    ),
            )
            .service(
                web::scope("/visit")
                    .service(
                        web::resource("")
                            .route(web::get().to(application::visit_list))
                            .route(web::post().to(application::create_visit)),
                    )
                    .service(web::resource("/{id}").route(web::get().to(application::get_visit)))
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(application::approve_visit)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(application::reject_visit)),
                    ),
            )
            .service(
                web::resource("/branch/{id}/zones").route(web::get().to(branch::branch_zones)),
            ),
    );
}
