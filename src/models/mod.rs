pub mod coordinates;
pub mod itinerary;
pub mod poi;

pub use coordinates::Coordinates;
pub use itinerary::{
    format_minutes, Activity, DayPlan, Hotel, Itinerary, ItinerarySource, Pace, PlanFingerprint,
    PlanRequest, TransportMode,
};
pub use poi::Poi;
