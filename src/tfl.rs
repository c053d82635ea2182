extern crate reqwest;
extern crate serde_json;

use crate::result;
use crate::structs;

pub const DEFAULT_API_URL: &str = "https://api.tfl.gov.uk";

#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Deserialize)]
struct TflErrorResponse {
    message: String,
}

pub struct ArrivalsClient {
    client: reqwest::blocking::Client,
    api_url: String,
    attempts: usize,
}

impl ArrivalsClient {
    pub fn new(api_url: &str, attempts: usize, timeout: std::time::Duration) -> result::BusDashResult<ArrivalsClient> {
        if let Err(err) = reqwest::Url::parse(api_url) {
            return Err(result::BusDashError::ConfigError(
                format!("bad API URL '{}': {}", api_url, err)));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("busdash/", env!("CARGO_PKG_VERSION")))
            .build()?;

        return Ok(ArrivalsClient{
            client: client,
            api_url: api_url.trim_end_matches('/').to_string(),
            attempts: attempts,
        });
    }

    pub fn fetch(&self, stop_id: &str) -> result::BusDashResult<Vec<structs::ArrivalRecord>> {
        let url = arrivals_url(&self.api_url, stop_id);
        return fetch_arrivals_ext(&url, self.attempts, |url| self.real_fetch(url));
    }

    fn real_fetch(&self, url: &str) -> result::BusDashResult<HttpResponse> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        return Ok(HttpResponse{
            status: status,
            body: body,
        });
    }
}

pub fn arrivals_url(api_url: &str, stop_id: &str) -> String {
    return format!("{}/StopPoint/{}/arrivals", api_url, stop_id);
}

/// Runs `f` up to `attempts` times, stopping at the first success or at the
/// first error that isn't a transport failure.
pub fn with_retry<T, F>(attempts: usize, mut f: F) -> result::BusDashResult<T>
where F: FnMut() -> result::BusDashResult<T> {
    let attempts = std::cmp::max(1, attempts);
    let mut attempt = 1;
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transport() || attempt >= attempts {
                    return Err(err);
                }
                warn!("Attempt {}/{} failed, retrying: {}", attempt, attempts, err);
                attempt += 1;
            }
        }
    }
}

fn fetch_arrivals_ext<F>(url: &str, attempts: usize, mut fetch_fn: F) -> result::BusDashResult<Vec<structs::ArrivalRecord>>
where F: FnMut(&str) -> result::BusDashResult<HttpResponse> {
    let response = with_retry(attempts, || {
        debug!("Fetching {}", url);
        return fetch_fn(url);
    })?;

    return parse_response(&response);
}

fn parse_response(response: &HttpResponse) -> result::BusDashResult<Vec<structs::ArrivalRecord>> {
    if response.status < 200 || response.status >= 300 {
        return match serde_json::from_str::<TflErrorResponse>(&response.body) {
            Ok(error_response) => Err(result::make_error(&error_response.message)),
            Err(_) => Err(result::make_error(&format!("HTTP status {}", response.status))),
        };
    }

    let records: Vec<structs::ArrivalRecord> = serde_json::from_str(&response.body)?;
    debug!("Decoded {} arrivals", records.len());
    return Ok(records);
}
