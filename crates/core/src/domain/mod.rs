pub mod itinerary;
pub mod record;
pub mod trip;
pub mod weather;
