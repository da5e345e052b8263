use actix_files::NamedFile;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::config::Config;
use crate::error::ApiError;

const PAGES: [(&str, &str); 13] = [
    ("/", "index.html"),
    ("/donate", "donate.html"),
    ("/donate-money", "donate-money.html"),
    ("/contact", "contact.html"),
    ("/login", "login.html"),
    ("/request", "request.html"),
    ("/about", "about.html"),
    ("/profile", "profile.html"),
    ("/settings", "settings.html"),
    ("/my-donations", "my-donations.html"),
    ("/my-requests", "my-requests.html"),
    ("/admin-login", "admin-login.html"),
    ("/admin-dashboard", "admin-dashboard.html"),
];

async fn serve_page(
    req: HttpRequest,
    config: web::Data<Config>,
    file: &'static str,
) -> Result<HttpResponse, ApiError> {
    let path = config.static_dir.join(file);
    match NamedFile::open_async(&path).await {
        Ok(page) => Ok(page.into_response(&req)),
        Err(e) => {
            log::warn!("Page {:?} unavailable: {}", path, e);
            Err(ApiError::not_found("Page not found"))
        }
    }
}

pub fn init(cfg: &mut web::ServiceConfig) {
    for (route, file) in PAGES {
        cfg.route(
            route,
            web::get().to(move |req: HttpRequest, config: web::Data<Config>| serve_page(req, config, file)),
        );
    }
}
