// HTTP surface of the query service

use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer, Responder};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::fallback::{FallbackHolidayService, HolidayLookup};

// Country options offered by the search form
pub const COUNTRIES: [(&str, &str); 57] = [
    ("AF", "Afghanistan"), ("AL", "Albania"), ("DZ", "Algeria"), ("AR", "Argentina"),
    ("AU", "Australia"), ("AT", "Austria"), ("BD", "Bangladesh"), ("BE", "Belgium"),
    ("BR", "Brazil"), ("CA", "Canada"), ("CL", "Chile"), ("CN", "China"),
    ("CO", "Colombia"), ("HR", "Croatia"), ("CZ", "Czech Republic"), ("DK", "Denmark"),
    ("EG", "Egypt"), ("FI", "Finland"), ("FR", "France"), ("DE", "Germany"),
    ("GR", "Greece"), ("HK", "Hong Kong"), ("HU", "Hungary"), ("IN", "India"),
    ("ID", "Indonesia"), ("IE", "Ireland"), ("IL", "Israel"), ("IT", "Italy"),
    ("JP", "Japan"), ("KE", "Kenya"), ("KR", "South Korea"), ("MY", "Malaysia"),
    ("MX", "Mexico"), ("NL", "Netherlands"), ("NZ", "New Zealand"), ("NG", "Nigeria"),
    ("NO", "Norway"), ("PK", "Pakistan"), ("PH", "Philippines"), ("PL", "Poland"),
    ("PT", "Portugal"), ("RO", "Romania"), ("RU", "Russia"), ("SA", "Saudi Arabia"),
    ("SG", "Singapore"), ("ZA", "South Africa"), ("ES", "Spain"), ("SE", "Sweden"),
    ("CH", "Switzerland"), ("TW", "Taiwan"), ("TH", "Thailand"), ("TR", "Turkey"),
    ("UA", "Ukraine"), ("AE", "United Arab Emirates"), ("GB", "United Kingdom"),
    ("US", "United States"), ("VN", "Vietnam"),
];

pub const FIRST_YEAR: i32 = 2020;
pub const LAST_YEAR: i32 = 2030;

fn default_country() -> String {
    "US".to_string()
}

fn default_year() -> String {
    "2024".to_string()
}

#[derive(Debug, Deserialize)]
pub struct HolidayQuery {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_year")]
    pub year: String,
}

#[derive(Debug, Serialize)]
pub struct CountryOption {
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SearchOptions {
    pub countries: Vec<CountryOption>,
    pub years: Vec<i32>,
}

impl SearchOptions {
    pub fn build() -> Self {
        Self {
            countries: COUNTRIES
                .iter()
                .map(|&(code, name)| CountryOption { code, name })
                .collect(),
            years: (FIRST_YEAR..=LAST_YEAR).collect(),
        }
    }
}

pub async fn get_holidays(
    service: web::Data<FallbackHolidayService>,
    query: web::Query<HolidayQuery>,
) -> impl Responder {
    let HolidayQuery { country, year } = query.into_inner();
    let lookup = service.lookup(&country, &year).await;

    let status = match lookup {
        HolidayLookup::Success { .. } => StatusCode::OK,
        HolidayLookup::Failure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    HttpResponse::build(status).json(lookup)
}

pub async fn search_options() -> impl Responder {
    HttpResponse::Ok().json(SearchOptions::build())
}

// Route table, shared by the real server and the handler tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/holidays/", web::get().to(get_holidays))
        .route("/api/holidays", web::get().to(get_holidays))
        .route("/api/options", web::get().to(search_options));
}

pub async fn start_server(addr: &str, service: FallbackHolidayService) -> std::io::Result<()> {
    let data = web::Data::new(service);
    info!(%addr, "holiday service listening");

    HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
        .bind(addr)?
        .run()
        .await
}
