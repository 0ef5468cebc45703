use crate::{
    api::{
        attendance_records, calculation_periods, employees, excel_templates, freee_expenses,
        kincone_transportation, payroll,
    },
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("non-zero period and burst size");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));
    let import_limiter = Arc::new(build_limiter(config.rate_import_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .service(
                web::scope("/calculation-periods")
                    .service(
                        web::resource("")
                            .route(web::get().to(calculation_periods::list_periods))
                            .route(web::post().to(calculation_periods::create_period)),
                    )
                    .service(
                        web::resource("/current")
                            .route(web::get().to(calculation_periods::current_period)),
                    )
                    .service(
                        web::resource("/check/{year}/{month}")
                            .route(web::get().to(calculation_periods::check_period)),
                    )
                    .service(
                        web::resource("/start/{year}/{month}")
                            .route(web::post().to(calculation_periods::start_calculation)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(calculation_periods::get_period))
                            .route(web::put().to(calculation_periods::update_period))
                            .route(web::delete().to(calculation_periods::delete_period)),
                    ),
            )
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::get().to(employees::list_employees))
                            .route(web::post().to(employees::create_employee)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employees::get_employee))
                            .route(web::put().to(employees::update_employee))
                            .route(web::delete().to(employees::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance-records")
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance_records::list_records))
                            .route(web::post().to(attendance_records::create_record))
                            .route(web::delete().to(attendance_records::delete_all_records)),
                    )
                    .service(
                        web::resource("/import-csv")
                            .wrap(import_limiter.clone())
                            .route(web::post().to(attendance_records::import_csv)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(attendance_records::get_record))
                            .route(web::put().to(attendance_records::update_record))
                            .route(web::delete().to(attendance_records::delete_record)),
                    ),
            )
            .service(
                web::scope("/freee-expenses")
                    .service(
                        web::resource("")
                            .route(web::get().to(freee_expenses::list_expenses))
                            .route(web::post().to(freee_expenses::create_expense))
                            .route(web::delete().to(freee_expenses::delete_all_expenses)),
                    )
                    .service(
                        web::resource("/import-csv")
                            .wrap(import_limiter.clone())
                            .route(web::post().to(freee_expenses::import_csv)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(freee_expenses::get_expense))
                            .route(web::put().to(freee_expenses::update_expense))
                            .route(web::delete().to(freee_expenses::delete_expense)),
                    ),
            )
            .service(
                web::scope("/kincone-transportation")
                    .service(
                        web::resource("")
                            .route(web::get().to(kincone_transportation::list_transportation))
                            .route(web::post().to(kincone_transportation::create_transportation))
                            .route(web::delete().to(kincone_transportation::delete_all_transportation)),
                    )
                    .service(
                        web::resource("/import-csv")
                            .wrap(import_limiter.clone())
                            .route(web::post().to(kincone_transportation::import_csv)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(kincone_transportation::get_transportation))
                            .route(web::put().to(kincone_transportation::update_transportation))
                            .route(web::delete().to(kincone_transportation::delete_transportation)),
                    ),
            )
            .service(
                web::scope("/excel-templates")
                    .service(
                        web::resource("")
                            .route(web::get().to(excel_templates::list_templates))
                            .route(web::post().to(excel_templates::upload_template)),
                    )
                    .service(
                        web::resource("/{id}/download")
                            .route(web::get().to(excel_templates::download_template)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::delete().to(excel_templates::delete_template)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    .service(
                        web::resource("/generate")
                            .wrap(import_limiter)
                            .route(web::post().to(payroll::generate)),
                    )
                    .service(
                        web::resource("/work-data-summary/{calculation_period_id}")
                            .route(web::get().to(payroll::work_data_summary)),
                    )
                    .service(
                        web::resource("/download/{file_name}")
                            .route(web::get().to(payroll::download)),
                    ),
            ),
    );
}
