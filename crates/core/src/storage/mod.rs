pub mod memory;

pub use memory::ItineraryStore;
