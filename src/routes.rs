use crate::{api::attendance, config::Config};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build a per-route limiter config
    fn limiter_config(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let action_conf = limiter_config(config.rate_action_per_min);
    let read_conf = limiter_config(config.rate_read_per_min);

    cfg.service(
        web::scope(&config.api_prefix).service(
            web::scope("/attendance")
                .service(
                    web::resource("/check-in")
                        .wrap(Governor::new(&action_conf))
                        .route(web::post().to(attendance::check_in)),
                )
                .service(
                    web::resource("/check-out")
                        .wrap(Governor::new(&action_conf))
                        .route(web::post().to(attendance::check_out)),
                )
                .service(
                    web::resource("/absent")
                        .wrap(Governor::new(&action_conf))
                        .route(web::post().to(attendance::mark_absent)),
                )
                .service(
                    web::resource("/status")
                        .wrap(Governor::new(&read_conf))
                        .route(web::get().to(attendance::status)),
                )
                .service(
                    web::resource("/history")
                        .wrap(Governor::new(&read_conf))
                        .route(web::get().to(attendance::history)),
                ),
        ),
    );
}
