//! External collaborators at the edges of the pipeline: local CSV input,
//! the ScienceBase-hosted reference table, the optional NatureServe rank
//! service, and the local analytical store of protection status areas.

pub mod natureserve;
pub mod protection_db;
pub mod range_habitat;
pub mod sciencebase;
