//! Test fixtures and utilities

pub const API_URL_ENV: &str = "TMB_ROUTES_API_URL";
pub const ID_TOKEN_ENV: &str = "TMB_ROUTES_ID_TOKEN";

/// A destination near Plaça de Catalunya, used to exercise query overrides
pub const ALT_WORK_LATITUDE: f64 = 41.387;
pub const ALT_WORK_LONGITUDE: f64 = 2.170;

fn load_env() {
    let _ = dotenvy::dotenv();
}

/// Check if API URL is configured
pub fn api_url_configured() -> bool {
    load_env();
    std::env::var(API_URL_ENV).is_ok()
}

/// Identity token for the protected route, if one is configured
pub fn id_token() -> Option<String> {
    load_env();
    std::env::var(ID_TOKEN_ENV).ok().filter(|t| !t.is_empty())
}

/// Skip test if API URL is not configured
#[macro_export]
macro_rules! skip_if_no_api {
    () => {
        if !$crate::fixtures::api_url_configured() {
            eprintln!("Skipping test: TMB_ROUTES_API_URL not set");
            return;
        }
    };
}
