use crate::config::{HTTP_TIMEOUT, MAX_MARKET_COUNT};
use crate::domain::error::DomainError;
use crate::domain::ports::market_feed::{EventListing, MarketFeed};
use async_trait::async_trait;
use tracing::debug;

/// Kalshi event listing feed. Pages through the public events endpoint
/// (no auth required for market data) and normalizes nested markets into
/// the flat listing shape the reconciler consumes.
pub struct KalshiFeed {
    base_url: String,
    client: reqwest::Client,
    /// Events with this many markets or more are dropped at the boundary.
    max_market_count: u32,
}

impl KalshiFeed {
    pub fn new() -> Self {
        Self::with_base_url("https://api.elections.kalshi.com/trade-api/v2".into())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::builder()
                .user_agent("Foresight/0.1")
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
            max_market_count: MAX_MARKET_COUNT,
        }
    }
}

impl Default for KalshiFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, serde::Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<KalshiEvent>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct KalshiEvent {
    event_ticker: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    sub_title: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    markets: Vec<KalshiMarket>,
}

#[derive(Debug, serde::Deserialize)]
struct KalshiMarket {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    yes_sub_title: Option<String>,
    #[serde(default)]
    rules_primary: Option<String>,
    #[serde(default)]
    rules_secondary: Option<String>,
}

#[async_trait]
impl MarketFeed for KalshiFeed {
    fn name(&self) -> &str {
        "kalshi"
    }

    async fn list_open_events(&self) -> Result<Vec<EventListing>, DomainError> {
        let mut events = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut params = vec![
                ("status".to_string(), "open".to_string()),
                ("with_nested_markets".to_string(), "true".to_string()),
            ];
            if let Some(c) = &cursor {
                params.push(("cursor".to_string(), c.clone()));
            }

            let resp = self
                .client
                .get(format!("{}/events", self.base_url))
                .query(&params)
                .send()
                .await
                .map_err(|e| DomainError::UpstreamUnavailable(format!("Kalshi request: {e}")))?;

            if !resp.status().is_success() {
                return Err(DomainError::UpstreamUnavailable(format!(
                    "Kalshi API returned {}",
                    resp.status()
                )));
            }

            let data: EventsResponse = resp
                .json()
                .await
                .map_err(|e| DomainError::Parse(format!("Kalshi response: {e}")))?;

            debug!(batch = data.events.len(), "fetched event batch");
            events.extend(data.events);

            match data.cursor {
                Some(c) if !c.is_empty() => cursor = Some(c),
                _ => break,
            }
        }

        Ok(events
            .into_iter()
            .filter(|e| {
                !e.markets.is_empty() && (e.markets.len() as u32) < self.max_market_count
            })
            .map(normalize)
            .collect())
    }
}

/// Flatten one nested Kalshi event into the listing shape. Single-market
/// events take that market's subtitle and rules directly; multi-market
/// events get one rules block per market, labeled by market title.
fn normalize(event: KalshiEvent) -> EventListing {
    let market_count = event.markets.len() as u32;

    let subtitle = if !event.sub_title.is_empty() {
        event.sub_title
    } else {
        event
            .markets
            .first()
            .and_then(|m| m.yes_sub_title.clone())
            .unwrap_or_default()
    };

    let resolution_rules = if event.markets.len() == 1 {
        let m = &event.markets[0];
        let mut rules = m.rules_primary.clone().unwrap_or_default();
        if let Some(secondary) = m.rules_secondary.as_deref().filter(|s| !s.is_empty()) {
            if !rules.is_empty() {
                rules.push('\n');
            }
            rules.push_str(secondary);
        }
        rules
    } else {
        event
            .markets
            .iter()
            .filter_map(|m| {
                let rules = m.rules_primary.as_deref()?.trim();
                if rules.is_empty() {
                    return None;
                }
                match m.title.as_deref().or(m.yes_sub_title.as_deref()) {
                    Some(label) => Some(format!("{label}: {rules}")),
                    None => Some(rules.to_string()),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    EventListing {
        id: event.event_ticker,
        title: event.title,
        subtitle,
        resolution_rules,
        domain: event.category,
        market_count,
    }
}
