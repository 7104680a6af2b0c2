use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::Date;
use tracing::warn;

use crate::config::NasaConfig;
use crate::error::ApiError;
use crate::events::dto::DATE_FORMAT;

/// Astronomy Picture of the Day, as picked out of the NASA response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Apod {
    pub title: Option<String>,
    pub explanation: Option<String>,
    pub url: Option<String>,
    pub date: Option<String>,
    #[serde(default = "default_media_type")]
    pub media_type: String,
}

fn default_media_type() -> String {
    "image".into()
}

/// One near-Earth object close approach, flattened from the feed.
#[derive(Debug, Clone, Serialize)]
pub struct NearEarthObject {
    pub name: String,
    pub date: String,
    pub diameter_km: Option<f64>,
    pub is_hazardous: bool,
    pub velocity_kph: Option<String>,
}

// The feed nests objects under a per-date map; only the fields we surface
// are modeled, everything else is ignored.
#[derive(Debug, Deserialize)]
struct NeoFeedResponse {
    #[serde(default)]
    near_earth_objects: BTreeMap<String, Vec<RawNeo>>,
}

#[derive(Debug, Deserialize)]
struct RawNeo {
    name: Option<String>,
    estimated_diameter: Option<EstimatedDiameter>,
    #[serde(default)]
    is_potentially_hazardous_asteroid: bool,
    #[serde(default)]
    close_approach_data: Vec<CloseApproach>,
}

#[derive(Debug, Deserialize)]
struct EstimatedDiameter {
    kilometers: Option<DiameterRange>,
}

#[derive(Debug, Deserialize)]
struct DiameterRange {
    estimated_diameter_max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CloseApproach {
    relative_velocity: Option<RelativeVelocity>,
}

#[derive(Debug, Deserialize)]
struct RelativeVelocity {
    // NASA serializes velocities as decimal strings
    kilometers_per_hour: Option<String>,
}

fn flatten_neo_feed(feed: NeoFeedResponse) -> Vec<NearEarthObject> {
    let mut out = Vec::new();
    for (date, objects) in feed.near_earth_objects {
        for obj in objects {
            let diameter_km = obj
                .estimated_diameter
                .as_ref()
                .and_then(|d| d.kilometers.as_ref())
                .and_then(|k| k.estimated_diameter_max);
            let velocity_kph = obj
                .close_approach_data
                .first()
                .and_then(|c| c.relative_velocity.as_ref())
                .and_then(|v| v.kilometers_per_hour.clone());
            out.push(NearEarthObject {
                name: obj.name.unwrap_or_else(|| "Unknown object".into()),
                date: date.clone(),
                diameter_km,
                is_hazardous: obj.is_potentially_hazardous_asteroid,
                velocity_kph,
            });
        }
    }
    out
}

/// External space-data source. The data model and authorization rules work
/// without it; callers decide whether a failure degrades or surfaces.
#[async_trait]
pub trait SpaceDataClient: Send + Sync {
    async fn apod(&self, date: Option<Date>) -> Result<Apod, ApiError>;
    async fn neo_feed(&self, start: Date, end: Date) -> Result<Vec<NearEarthObject>, ApiError>;
}

pub struct HttpSpaceDataClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl HttpSpaceDataClient {
    pub fn new(cfg: &NasaConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build NASA http client")?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!(error = %e, path, "NASA request failed");
                ApiError::ExternalServiceUnavailable
            })?;
        response.json::<T>().await.map_err(|e| {
            warn!(error = %e, path, "NASA response decode failed");
            ApiError::ExternalServiceUnavailable
        })
    }
}

#[async_trait]
impl SpaceDataClient for HttpSpaceDataClient {
    async fn apod(&self, date: Option<Date>) -> Result<Apod, ApiError> {
        let mut params = vec![("api_key", self.api_key.clone())];
        if let Some(d) = date {
            params.push(("date", d.format(DATE_FORMAT).context("format apod date")?));
        }
        self.get_json("/planetary/apod", &params).await
    }

    async fn neo_feed(&self, start: Date, end: Date) -> Result<Vec<NearEarthObject>, ApiError> {
        let params = vec![
            ("api_key", self.api_key.clone()),
            ("start_date", start.format(DATE_FORMAT).context("format start date")?),
            ("end_date", end.format(DATE_FORMAT).context("format end date")?),
        ];
        let feed: NeoFeedResponse = self.get_json("/neo/rest/v1/feed", &params).await?;
        Ok(flatten_neo_feed(feed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apod_deserializes_nasa_payload() {
        let json = r#"{
            "title": "The Eagle Nebula",
            "explanation": "A stellar nursery.",
            "url": "https://apod.nasa.gov/apod/image/eagle.jpg",
            "date": "2025-08-07",
            "media_type": "image",
            "service_version": "v1"
        }"#;
        let apod: Apod = serde_json::from_str(json).unwrap();
        assert_eq!(apod.title.as_deref(), Some("The Eagle Nebula"));
        assert_eq!(apod.date.as_deref(), Some("2025-08-07"));
        assert_eq!(apod.media_type, "image");
    }

    #[test]
    fn apod_defaults_missing_media_type_to_image() {
        let apod: Apod = serde_json::from_str(r#"{"title": "t"}"#).unwrap();
        assert_eq!(apod.media_type, "image");
        assert!(apod.url.is_none());
    }

    #[test]
    fn neo_feed_flattens_the_per_date_map() {
        let json = r#"{
            "near_earth_objects": {
                "2025-08-07": [
                    {
                        "name": "(2025 AB)",
                        "estimated_diameter": {
                            "kilometers": { "estimated_diameter_max": 0.31 }
                        },
                        "is_potentially_hazardous_asteroid": true,
                        "close_approach_data": [
                            { "relative_velocity": { "kilometers_per_hour": "45123.7" } }
                        ]
                    }
                ],
                "2025-08-08": [
                    { "name": "(2025 CD)" }
                ]
            }
        }"#;
        let feed: NeoFeedResponse = serde_json::from_str(json).unwrap();
        let neos = flatten_neo_feed(feed);
        assert_eq!(neos.len(), 2);

        let first = &neos[0];
        assert_eq!(first.name, "(2025 AB)");
        assert_eq!(first.date, "2025-08-07");
        assert_eq!(first.diameter_km, Some(0.31));
        assert!(first.is_hazardous);
        assert_eq!(first.velocity_kph.as_deref(), Some("45123.7"));

        let second = &neos[1];
        assert_eq!(second.date, "2025-08-08");
        assert!(second.diameter_km.is_none());
        assert!(!second.is_hazardous);
        assert!(second.velocity_kph.is_none());
    }

    #[test]
    fn neo_feed_tolerates_an_empty_response() {
        let feed: NeoFeedResponse = serde_json::from_str("{}").unwrap();
        assert!(flatten_neo_feed(feed).is_empty());
    }

    #[test]
    fn unknown_object_name_gets_a_placeholder() {
        let json = r#"{"near_earth_objects": {"2025-08-07": [{}]}}"#;
        let feed: NeoFeedResponse = serde_json::from_str(json).unwrap();
        let neos = flatten_neo_feed(feed);
        assert_eq!(neos[0].name, "Unknown object");
    }
}
