//! Series distance between observed and simulated hydrographs
//!
//! Given two segmentations with the same number of segments, the series
//! distance places connectors between corresponding segments and reports
//! the horizontal (timing) and vertical (magnitude) length of every
//! connector, split into rising and falling limbs.
//!
//! - [`series_distance`]: connector errors of one matched event
//! - [`no_event_error`]: plain 1-D errors at samples outside of events
//! - [`ErrorModel`]: standard or relative magnitude error

pub mod distance;
pub mod no_event;
pub mod types;

pub use distance::series_distance;
pub use no_event::{no_event_error, NoEventError};
pub use types::{relative_error, Connectors, DistanceResult, ErrorModel, LimbErrors};
