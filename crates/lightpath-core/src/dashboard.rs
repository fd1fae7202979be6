//! Dashboard aggregate fetch.
//!
//! Four independent calls (buses, trips, bookings, weather) run concurrently
//! and are combined only after all of them settle. A failed bus call voids the
//! whole aggregate; failures of the other three only zero their counts.

use tracing::{debug, warn};

use crate::api::{ApiClient, ApiResponse};
use crate::models::{Bus, WeatherSample};
use crate::state::LoadState;

pub type DashboardState = LoadState<DashboardData>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Count of every trip returned. No date filter is applied.
    pub trips_today: usize,
    pub bookings: usize,
    /// Total bus capacity minus the number of bookings. Can go negative.
    pub available_seats: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub buses: Vec<Bus>,
    pub stats: DashboardStats,
    pub weather: Vec<WeatherSample>,
}

impl DashboardStats {
    pub fn compute(buses: &[Bus], trip_count: usize, booking_count: usize) -> Self {
        let capacity: i64 = buses.iter().map(Bus::seat_capacity).sum();
        Self {
            trips_today: trip_count,
            bookings: booking_count,
            available_seats: capacity - booking_count as i64,
        }
    }
}

/// Combine the four responses into what the dashboard shows.
pub fn aggregate(
    buses: &ApiResponse,
    trips: &ApiResponse,
    bookings: &ApiResponse,
    weather: &ApiResponse,
) -> DashboardState {
    if let Some(error) = buses.error() {
        warn!(error = error, "Dashboard bus list failed, discarding aggregate");
        return LoadState::Failed(error.to_string());
    }

    let bus_list: Vec<Bus> = buses.items();
    let stats = DashboardStats::compute(&bus_list, trips.count(), bookings.count());
    let weather = weather.items();
    debug!(
        buses = bus_list.len(),
        trips = stats.trips_today,
        bookings = stats.bookings,
        "Dashboard aggregated"
    );

    LoadState::Ready(DashboardData {
        buses: bus_list,
        stats,
        weather,
    })
}

/// Fetch and aggregate everything the dashboard needs.
pub async fn load_dashboard(api: &ApiClient) -> DashboardState {
    let (buses, trips, bookings, weather) = futures::join!(
        api.get_buses(),
        api.get_trips(None),
        api.get_bookings(),
        api.get_weather(),
    );
    aggregate(&buses, &trips, &bookings, &weather)
}
