//! Trip listing for a single bus, and the card shape each trip renders as.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{ApiClient, ApiResponse};
use crate::models::Trip;
use crate::state::LoadState;
use crate::utils::or_na;

pub type TripsState = LoadState<Vec<TripCard>>;
pub type TripDetailState = LoadState<Trip>;

/// A trip flattened for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripCard {
    pub trip_id: Option<String>,
    pub route_name: String,
    pub from: String,
    pub to: String,
    pub departure_time: Option<String>,
    pub fare: Option<String>,
    pub available_seats: Option<i64>,
}

impl From<&Trip> for TripCard {
    fn from(trip: &Trip) -> Self {
        Self {
            trip_id: trip.id.clone(),
            route_name: or_na(trip.route_name()),
            from: or_na(trip.start_point()),
            to: or_na(trip.end_point()),
            departure_time: trip.departure_time.clone(),
            fare: trip.fare.clone(),
            available_seats: trip.available_seats,
        }
    }
}

impl TripsState {
    pub fn from_response(response: &ApiResponse) -> Self {
        if let Some(error) = response.error() {
            return LoadState::Failed(error.to_string());
        }
        let trips: Vec<Trip> = response.items();
        LoadState::Ready(trips.iter().map(TripCard::from).collect())
    }
}

impl TripDetailState {
    pub fn from_response(response: &ApiResponse) -> Self {
        if let Some(error) = response.error() {
            return LoadState::Failed(error.to_string());
        }
        match response.parse::<Trip>() {
            Some(trip) => LoadState::Ready(trip),
            None => LoadState::Failed("Unexpected trip details response".to_string()),
        }
    }
}

/// Fetch the trips of one bus.
pub async fn load_trips(api: &ApiClient, bus_id: &str) -> TripsState {
    let response = api.get_trips(Some(bus_id)).await;
    let state = TripsState::from_response(&response);
    if let LoadState::Ready(ref cards) = state {
        debug!(bus_id = bus_id, trips = cards.len(), "Trips loaded");
    }
    state
}

pub async fn load_trip_detail(api: &ApiClient, trip_id: &str) -> TripDetailState {
    let response = api.get_trip_details(trip_id).await;
    TripDetailState::from_response(&response)
}
