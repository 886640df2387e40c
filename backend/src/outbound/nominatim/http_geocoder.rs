//! Reqwest-backed Nominatim geocoder.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use super::dto::{ReverseDto, SearchHitDto};
use crate::domain::ports::{Geocoder, GeocoderError};
use crate::domain::{Coordinate, GeocodedPlace};
use crate::outbound::http_support::{
    FailureKind, HttpIdentity, build_client, classify_status, classify_transport, status_message,
};

/// Geocoder calling `/search` and `/reverse` below one base URL.
pub struct NominatimHttpGeocoder {
    client: Client,
    base_url: Url,
    identity: HttpIdentity,
}

impl NominatimHttpGeocoder {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        identity: HttpIdentity,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            identity,
        })
    }

    fn endpoint(&self, segment: &str) -> Result<Url, GeocoderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GeocoderError::invalid_request("geocoder base URL cannot carry a path"))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<T, GeocoderError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .header(reqwest::header::USER_AGENT, self.identity.user_agent.as_str())
            .header("Contact", self.identity.contact.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let message = status_message(status, body.as_ref());
            return Err(map_failure(classify_status(status), message));
        }
        serde_json::from_slice(body.as_ref()).map_err(|error| {
            GeocoderError::decode(format!("invalid Nominatim JSON payload: {error}"))
        })
    }
}

#[async_trait]
impl Geocoder for NominatimHttpGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedPlace>, GeocoderError> {
        let url = self.endpoint("search")?;
        let hits: Vec<SearchHitDto> = self
            .get_json(url, &[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .await?;
        hits.into_iter()
            .next()
            .map(SearchHitDto::into_place)
            .transpose()
            .map_err(GeocoderError::decode)
    }

    async fn reverse(&self, position: &Coordinate) -> Result<Option<String>, GeocoderError> {
        let url = self.endpoint("reverse")?;
        let lat = position.latitude().to_string();
        let lon = position.longitude().to_string();
        let reply: ReverseDto = self
            .get_json(
                url,
                &[("lat", lat.as_str()), ("lon", lon.as_str()), ("format", "jsonv2")],
            )
            .await?;
        Ok(reply.into_display_name())
    }
}

fn map_failure(kind: FailureKind, message: String) -> GeocoderError {
    match kind {
        FailureKind::RateLimited => GeocoderError::rate_limited(message),
        FailureKind::Timeout => GeocoderError::timeout(message),
        FailureKind::InvalidRequest => GeocoderError::invalid_request(message),
        FailureKind::Transport => GeocoderError::transport(message),
    }
}

fn map_transport_error(error: reqwest::Error) -> GeocoderError {
    map_failure(classify_transport(&error), error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::http_support::stub;
    use actix_web::{HttpResponse, web};
    use std::collections::HashMap;

    type Params = web::Query<HashMap<String, String>>;

    async fn search(params: Params) -> HttpResponse {
        if params.get("format").map(String::as_str) != Some("jsonv2") {
            return HttpResponse::BadRequest().finish();
        }
        match params.get("q").map(String::as_str) {
            Some("Rizal Park") => HttpResponse::Ok().body(
                r#"[{"place_id":1,"lat":"14.5831","lon":"120.9794","display_name":"Rizal Park, Ermita, Manila"}]"#,
            ),
            Some("broken") => HttpResponse::Ok().body(
                r#"[{"lat":"north","lon":"120.9794","display_name":"Nowhere"}]"#,
            ),
            _ => HttpResponse::Ok().body("[]"),
        }
    }

    async fn reverse(params: Params) -> HttpResponse {
        if params.get("lat").map(String::as_str) == Some("0") {
            return HttpResponse::Ok().body(r#"{"error":"Unable to geocode"}"#);
        }
        HttpResponse::Ok().body(r#"{"display_name":"Ermita, Manila, Metro Manila"}"#)
    }

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/search", web::get().to(search))
            .route("/reverse", web::get().to(reverse));
    }

    fn geocoder(base_url: &str) -> NominatimHttpGeocoder {
        NominatimHttpGeocoder::new(
            Url::parse(base_url).expect("base url"),
            Duration::from_secs(5),
            HttpIdentity::default(),
        )
        .expect("client")
    }

    #[test]
    fn endpoint_appends_segment_to_base_path() {
        let geocoder = geocoder("https://geo.example.org/nominatim/");
        let url = geocoder.endpoint("search").expect("url");
        assert_eq!(url.as_str(), "https://geo.example.org/nominatim/search");
    }

    #[actix_web::test]
    async fn geocodes_best_match() {
        let server = stub::spawn(routes);
        let place = geocoder(&server.base_url)
            .geocode("Rizal Park")
            .await
            .expect("lookup succeeds")
            .expect("place found");
        server.stop().await;

        assert_eq!(place.display_name, "Rizal Park, Ermita, Manila");
        assert_eq!(place.coordinate.latitude(), 14.5831);
    }

    #[actix_web::test]
    async fn empty_search_is_none() {
        let server = stub::spawn(routes);
        let place = geocoder(&server.base_url)
            .geocode("Atlantis")
            .await
            .expect("lookup succeeds");
        server.stop().await;
        assert!(place.is_none());
    }

    #[actix_web::test]
    async fn unparsable_coordinates_are_decode_errors() {
        let server = stub::spawn(routes);
        let error = geocoder(&server.base_url)
            .geocode("broken")
            .await
            .expect_err("decode fails");
        server.stop().await;
        assert!(matches!(error, GeocoderError::Decode { .. }));
    }

    #[actix_web::test]
    async fn reverse_returns_display_name_or_none() {
        let server = stub::spawn(routes);
        let geocoder = geocoder(&server.base_url);
        let here = Coordinate::new(14.5831, 120.9794).expect("coordinate");
        let nowhere = Coordinate::new(0.0, 0.0).expect("coordinate");

        let named = geocoder.reverse(&here).await.expect("reverse succeeds");
        let unknown = geocoder.reverse(&nowhere).await.expect("reverse succeeds");
        server.stop().await;

        assert_eq!(named.as_deref(), Some("Ermita, Manila, Metro Manila"));
        assert!(unknown.is_none());
    }
}
