//! Nominatim outbound adapter implementing the `Geocoder` port.

mod dto;
mod http_geocoder;

pub use http_geocoder::NominatimHttpGeocoder;
