use async_trait::async_trait;
use chrono::DateTime;
use reqwest::header::{HeaderMap, COOKIE, SET_COOKIE};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::external::market_data::{MarketDataError, MarketDataProvider};
use crate::models::{Fundamentals, PriceBar};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const SUMMARY_MODULES: &str = "price,summaryDetail,financialData,assetProfile";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const LOGO_URL: &str = "https://logo.clearbit.com";

/// Cookie and crumb pair required by the quote-summary endpoint.
#[derive(Debug, Clone)]
struct YahooSession {
    cookie: String,
    crumb: String,
}

/// Yahoo Finance chart and quote-summary endpoints. No API key required;
/// quote-summary calls carry a session cookie and crumb that are fetched
/// once and reused until Yahoo rejects them.
pub struct YahooProvider {
    client: reqwest::Client,
    session: RwLock<Option<YahooSession>>,
}

impl YahooProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            session: RwLock::new(None),
        }
    }

    async fn session(&self) -> Result<YahooSession, MarketDataError> {
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(session.clone());
        }

        let session = self.open_session().await?;
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    async fn open_session(&self) -> Result<YahooSession, MarketDataError> {
        // fc.yahoo.com answers 404 but still sets the cookie
        let resp = self
            .client
            .get(COOKIE_URL)
            .send()
            .await
            .map_err(|e| MarketDataError::Network(format!("failed to get cookie: {}", e)))?;

        let cookie = session_cookie(resp.headers())
            .ok_or_else(|| MarketDataError::BadResponse("missing Yahoo session cookie".into()))?;

        let resp = self
            .client
            .get(CRUMB_URL)
            .header(COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::Network(format!("failed to get crumb: {}", e)))?;

        match resp.status() {
            reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(MarketDataError::RateLimited),
            s if !s.is_success() => {
                return Err(MarketDataError::BadResponse(format!("crumb HTTP {}", s)))
            }
            _ => {}
        }

        let crumb = resp
            .text()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;
        let crumb = parse_crumb(&crumb)
            .ok_or_else(|| MarketDataError::BadResponse("invalid Yahoo crumb".into()))?;

        debug!("Opened Yahoo session");
        Ok(YahooSession { cookie, crumb })
    }

    async fn request_summary(
        &self,
        ticker: &str,
        session: &YahooSession,
    ) -> Result<QuoteSummaryResult, MarketDataError> {
        let resp = self
            .client
            .get(format!("{}/{}", QUOTE_SUMMARY_URL, ticker))
            .query(&[("modules", SUMMARY_MODULES), ("crumb", session.crumb.as_str())])
            .header(COOKIE, &session.cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        match resp.status() {
            reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(MarketDataError::RateLimited),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                return Err(MarketDataError::Unauthorized)
            }
            reqwest::StatusCode::NOT_FOUND => {
                return Err(MarketDataError::NotFound(ticker.to_string()))
            }
            s if !s.is_success() => {
                return Err(MarketDataError::BadResponse(format!("HTTP {}", s)))
            }
            _ => {}
        }

        let body: QuoteSummaryResponse = resp
            .json()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        body.quote_summary
            .result
            .and_then(|mut r| r.pop())
            .ok_or_else(|| MarketDataError::BadResponse("missing quote summary".into()))
    }
}

/// The `name=value` part of the first Set-Cookie header, preferring Yahoo's
/// `A3` consent cookie when several are set.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies: Vec<String> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .filter_map(|s| s.split(';').next())
        .map(|s| s.trim().to_string())
        .filter(|s| s.contains('='))
        .collect();

    cookies
        .iter()
        .find(|c| c.starts_with("A3="))
        .or_else(|| cookies.first())
        .cloned()
}

// Yahoo answers a bad cookie with an HTML or JSON error page instead of a crumb.
fn parse_crumb(body: &str) -> Option<String> {
    let crumb = body.trim();
    if crumb.is_empty() || crumb.contains(char::is_whitespace) || crumb.starts_with(['<', '{']) {
        return None;
    }
    Some(crumb.to_string())
}

/// Clearbit logo for the host part of a company website.
fn logo_url(website: &str) -> Option<String> {
    let host = website
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap_or("")
        .trim();

    if host.is_empty() {
        return None;
    }
    Some(format!("{}/{}", LOGO_URL, host))
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

// Yahoo uses "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y"
fn chart_range(days: u32) -> &'static str {
    if days <= 5 {
        "5d"
    } else if days <= 30 {
        "1mo"
    } else if days <= 90 {
        "3mo"
    } else if days <= 180 {
        "6mo"
    } else if days <= 365 {
        "1y"
    } else if days <= 730 {
        "2y"
    } else {
        "5y"
    }
}

// ---------------------------------------------------------------------------
// Chart response
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn parse_chart(ticker: &str, body: ChartResponse) -> Result<Vec<PriceBar>, MarketDataError> {
    if let Some(error) = body.chart.error {
        if error.description.contains("No data found") {
            return Err(MarketDataError::NotFound(ticker.to_string()));
        }
        return Err(MarketDataError::BadResponse(error.description));
    }

    let result = body
        .chart
        .result
        .and_then(|mut r| r.pop())
        .ok_or_else(|| MarketDataError::NotFound(ticker.to_string()))?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| MarketDataError::BadResponse("missing quote".into()))?;

    let at = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();

    let mut bars: Vec<PriceBar> = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            // holidays and half-sessions come back as nulls
            let close = at(&quote.close, i)?;
            let timestamp = DateTime::from_timestamp(*ts, 0)?;
            Some(PriceBar {
                timestamp,
                open: at(&quote.open, i).unwrap_or(close),
                high: at(&quote.high, i).unwrap_or(close),
                low: at(&quote.low, i).unwrap_or(close),
                close,
            })
        })
        .collect();

    bars.sort_by_key(|b| b.timestamp);

    if bars.is_empty() {
        return Err(MarketDataError::NotFound(ticker.to_string()));
    }

    Ok(bars)
}

// ---------------------------------------------------------------------------
// Quote summary response
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    #[serde(default)]
    price: PriceModule,
    #[serde(default)]
    summary_detail: SummaryDetail,
    #[serde(default)]
    financial_data: FinancialData,
    #[serde(default)]
    asset_profile: AssetProfile,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

fn raw(v: Option<RawValue>) -> Option<f64> {
    v.and_then(|v| v.raw)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    beta: Option<RawValue>,
    market_cap: Option<RawValue>,
    fifty_two_week_high: Option<RawValue>,
    fifty_two_week_low: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    total_debt: Option<RawValue>,
    total_cash: Option<RawValue>,
    free_cashflow: Option<RawValue>,
    profit_margins: Option<RawValue>,
    operating_margins: Option<RawValue>,
    return_on_equity: Option<RawValue>,
    revenue_growth: Option<RawValue>,
    earnings_growth: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfile {
    sector: Option<String>,
    website: Option<String>,
}

fn to_fundamentals(summary: QuoteSummaryResult) -> Fundamentals {
    let QuoteSummaryResult {
        price,
        summary_detail: detail,
        financial_data: fin,
        asset_profile,
    } = summary;

    Fundamentals {
        name: price.long_name.or(price.short_name),
        logo_url: asset_profile.website.as_deref().and_then(logo_url),
        sector: asset_profile.sector,
        market_cap: raw(detail.market_cap).or(raw(price.market_cap)),
        beta: raw(detail.beta),
        fifty_two_week_high: raw(detail.fifty_two_week_high),
        fifty_two_week_low: raw(detail.fifty_two_week_low),
        total_debt: raw(fin.total_debt),
        total_cash: raw(fin.total_cash),
        free_cash_flow: raw(fin.free_cashflow),
        profit_margin: raw(fin.profit_margins),
        operating_margin: raw(fin.operating_margins),
        roe: raw(fin.return_on_equity),
        revenue_growth: raw(fin.revenue_growth),
        earnings_growth: raw(fin.earnings_growth),
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch_history(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        let resp = self
            .client
            .get(format!("{}/{}", CHART_URL, ticker))
            .query(&[("interval", "1d"), ("range", chart_range(days))])
            .send()
            .await
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        match resp.status() {
            reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(MarketDataError::RateLimited),
            reqwest::StatusCode::NOT_FOUND => return Err(MarketDataError::NotFound(ticker.to_string())),
            s if !s.is_success() => return Err(MarketDataError::BadResponse(format!("HTTP {}", s))),
            _ => {}
        }

        let body: ChartResponse = resp
            .json()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        parse_chart(ticker, body)
    }

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, MarketDataError> {
        let session = self.session().await?;
        let summary = match self.request_summary(ticker, &session).await {
            Err(MarketDataError::Unauthorized) => {
                warn!("Yahoo session rejected for {}, renewing crumb", ticker);
                self.clear_session().await;
                let session = self.session().await?;
                self.request_summary(ticker, &session).await?
            }
            other => other?,
        };

        Ok(to_fundamentals(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SecurityMetrics, UNKNOWN_SECTOR};
    use reqwest::header::HeaderValue;

    #[test]
    fn test_chart_range_mapping() {
        assert_eq!(chart_range(5), "5d");
        assert_eq!(chart_range(90), "3mo");
        assert_eq!(chart_range(365), "1y");
        assert_eq!(chart_range(1000), "5y");
    }

    #[test]
    fn test_parse_chart_skips_null_closes() {
        let body: ChartResponse = serde_json::from_value(serde_json::json!({
            "chart": {
                "result": [{
                    "timestamp": [1704206400, 1704292800, 1704379200],
                    "indicators": { "quote": [{
                        "open":  [184.2, null, 182.1],
                        "high":  [186.0, null, 183.0],
                        "low":   [183.0, null, 180.9],
                        "close": [185.6, null, 181.9]
                    }]}
                }],
                "error": null
            }
        }))
        .unwrap();

        let bars = parse_chart("AAPL", body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 185.6);
        assert_eq!(bars[1].low, 180.9);
        assert!(bars[0].timestamp < bars[1].timestamp);
    }

    #[test]
    fn test_parse_chart_no_data_is_not_found() {
        let body: ChartResponse = serde_json::from_value(serde_json::json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        }))
        .unwrap();

        assert!(matches!(parse_chart("ZZZZ", body), Err(MarketDataError::NotFound(_))));
    }

    #[test]
    fn test_summary_maps_to_fundamentals() {
        let summary: QuoteSummaryResult = serde_json::from_value(serde_json::json!({
            "price": { "longName": "Apple Inc.", "marketCap": { "raw": 3.0e12 } },
            "summaryDetail": {
                "beta": { "raw": 1.24 },
                "fiftyTwoWeekHigh": { "raw": 199.6 },
                "fiftyTwoWeekLow": {}
            },
            "financialData": {
                "totalDebt": { "raw": 1.1e11 },
                "profitMargins": { "raw": 0.26 },
                "returnOnEquity": { "raw": 1.47 }
            },
            "assetProfile": { "sector": "Technology", "website": "https://www.apple.com/" }
        }))
        .unwrap();

        let mut metrics = SecurityMetrics::from_history("AAPL", Vec::new());
        assert_eq!(metrics.sector, UNKNOWN_SECTOR);
        to_fundamentals(summary).apply_to(&mut metrics);

        assert!(metrics.has_fundamentals);
        assert_eq!(metrics.name.as_deref(), Some("Apple Inc."));
        assert_eq!(metrics.logo_url.as_deref(), Some("https://logo.clearbit.com/www.apple.com"));
        assert_eq!(metrics.sector, "Technology");
        assert_eq!(metrics.market_cap, 3.0e12);
        assert_eq!(metrics.beta, 1.24);
        assert_eq!(metrics.fifty_two_week_high, 199.6);
        assert_eq!(metrics.fifty_two_week_low, 0.0);
        assert_eq!(metrics.total_cash, 0.0);
        assert_eq!(metrics.profit_margin, 0.26);
        assert_eq!(metrics.earnings_growth, 0.0);
    }

    #[test]
    fn test_logo_url_needs_a_host() {
        assert_eq!(
            logo_url("http://abc.xyz/investor"),
            Some("https://logo.clearbit.com/abc.xyz".to_string())
        );
        assert_eq!(logo_url(""), None);
        assert_eq!(logo_url("https://"), None);
    }

    #[test]
    fn test_session_cookie_prefers_a3() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("B=abc; Path=/; Domain=.yahoo.com"));
        headers.append(SET_COOKIE, HeaderValue::from_static("A3=d=AQAB&S=xyz; Expires=Thu, 01 Jan 2026 00:00:00 GMT; Secure"));
        assert_eq!(session_cookie(&headers).as_deref(), Some("A3=d=AQAB&S=xyz"));

        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("B=abc; Path=/"));
        assert_eq!(session_cookie(&headers).as_deref(), Some("B=abc"));

        assert_eq!(session_cookie(&HeaderMap::new()), None);
    }

    #[test]
    fn test_parse_crumb_rejects_error_pages() {
        assert_eq!(parse_crumb("Xk2s.9aB/q1\n").as_deref(), Some("Xk2s.9aB/q1"));
        assert_eq!(parse_crumb(" abcDEF123 \n").as_deref(), Some("abcDEF123"));
        assert_eq!(parse_crumb(""), None);
        assert_eq!(parse_crumb("<html>Unauthorized</html>"), None);
        assert_eq!(parse_crumb("{\"finance\":{\"error\":{}}}"), None);
        assert_eq!(parse_crumb("Too Many Requests"), None);
    }
}
