use std::fmt;

#[derive(Debug)]
pub enum TripError {
    Timeout,
    ConnectionFailed(String),
    DnsResolution(String),
    ProxyError(String),
    TlsError(String),
    AuthFailed(String),
    RateLimited,
    HttpStatus(u16),
    ApiError(String),
    JsonParse(String),
    MissingCredentials(String),
    InvalidAirport(String),
    InvalidDate(String),
    Validation(String),
    Store(String),
    NotFound(String),
}

impl fmt::Display for TripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(
                f,
                "request timed out — the provider may be slow or unreachable. \
                 Try increasing --timeout or check your connection"
            ),
            Self::ConnectionFailed(detail) => write!(
                f,
                "connection failed — check your internet connection ({detail})"
            ),
            Self::DnsResolution(host) => write!(
                f,
                "DNS resolution failed for {host} — check your internet connection"
            ),
            Self::ProxyError(detail) => write!(
                f,
                "proxy error — check your --proxy URL is correct ({detail})"
            ),
            Self::TlsError(detail) => write!(
                f,
                "TLS/SSL error — connection to the provider failed ({detail})"
            ),
            Self::AuthFailed(detail) => write!(
                f,
                "authentication with the flight provider failed ({detail}). \
                 Check TRIPR_API_KEY and TRIPR_API_SECRET"
            ),
            Self::RateLimited => write!(
                f,
                "rate limited by the provider (HTTP 429) — wait a moment before searching again"
            ),
            Self::HttpStatus(status) => {
                write!(f, "unexpected HTTP status {status} from the provider")
            }
            Self::ApiError(detail) => write!(f, "provider error: {detail}"),
            Self::JsonParse(detail) => write!(
                f,
                "failed to parse the provider response — {detail}. \
                 This may indicate a provider format change"
            ),
            Self::MissingCredentials(var) => {
                write!(f, "missing credentials — set {var} in the environment")
            }
            Self::InvalidAirport(code) => write!(
                f,
                "invalid airport code \"{code}\" — must be exactly 3 letters (e.g. JFK, LHR, NRT)"
            ),
            Self::InvalidDate(date) => write!(
                f,
                "invalid date \"{date}\" — must be YYYY-MM-DD format (e.g. 2026-09-01)"
            ),
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::Store(detail) => write!(f, "trip store error: {detail}"),
            Self::NotFound(id) => write!(f, "no stored trip with id \"{id}\""),
        }
    }
}

impl std::error::Error for TripError {}

pub fn from_http_error(err: wreq::Error) -> TripError {
    let msg = err.to_string();
    let lower = msg.to_lowercase();

    if err.is_timeout() {
        return TripError::Timeout;
    }

    if err.is_connect() {
        if lower.contains("dns") || lower.contains("resolve") || lower.contains("getaddrinfo") {
            return TripError::DnsResolution(msg);
        }
        return TripError::ConnectionFailed(msg);
    }

    if lower.contains("proxy") || lower.contains("socks") {
        return TripError::ProxyError(msg);
    }

    if lower.contains("tls") || lower.contains("ssl") || lower.contains("certificate") {
        return TripError::TlsError(msg);
    }

    TripError::ConnectionFailed(msg)
}
