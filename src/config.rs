use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "jobboard", about = "Job board view service")]
pub struct Config {
    /// Base URL of the backend REST API
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:5000/api")]
    pub backend_url: String,

    /// Listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// Page size requested from the backend when fetching the job list.
    /// The backend pages at 20 jobs when none is sent; 0 sends none.
    #[arg(long, env = "FETCH_LIMIT", default_value = "500")]
    pub fetch_limit: u32,

    /// Backend request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value = "10")]
    pub request_timeout: u64,

    /// Seconds a view may sit unused before it is dropped
    #[arg(
        long,
        env = "VIEW_TTL",
        default_value = "1800",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub view_ttl: u64,
}

impl Config {
    /// `None` leaves the page size to the backend.
    pub fn per_page(&self) -> Option<u32> {
        (self.fetch_limit > 0).then_some(self.fetch_limit)
    }
}
