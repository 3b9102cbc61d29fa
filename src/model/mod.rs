pub use terrarium_core::{CreatureFactory, GenomeLogic, SimError};
pub mod config {
    pub use terrarium_core::config::*;
}
pub mod error {
    pub use terrarium_core::error::*;
}
pub mod genetics {
    pub use terrarium_core::genetics::*;
}
pub mod history {
    pub use terrarium_core::history::*;
}
pub mod lifecycle {
    pub use terrarium_core::lifecycle::*;
}
pub mod metrics {
    pub use terrarium_core::metrics::*;
}
pub mod population {
    pub use terrarium_core::population::*;
}
pub mod resources {
    pub use terrarium_core::resources::*;
}
pub mod spatial_hash {
    pub use terrarium_core::spatial_hash::*;
}
pub mod systems {
    pub use terrarium_core::systems::*;
}
pub mod weather {
    pub use terrarium_core::weather::*;
}
pub mod state {
    pub use terrarium_data::*;
}
pub mod world;
