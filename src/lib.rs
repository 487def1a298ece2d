/*!
Control signals and scoring for articulation therapy games.

- [extractor] turns per-frame face landmarks into a mouth opening (throttle)
  and a lip position (steering)
- [scorer] rates a recognized utterance against its prompt
- [signal] delivers gesture states to game controllers
- [data_mappers] converts gesture states into speeds and directions
*/

pub mod cli;
pub mod config;
pub mod data_mappers;
pub mod data_parser;
pub mod evaluation;
pub mod extractor;
mod logger;
pub mod model;
pub mod scorer;
pub mod signal;

pub use config::Config;
pub use extractor::{GestureError, GestureExtractor};
pub use logger::Logger;
pub use model::{GestureState, Landmark, LandmarkSet, LipPosition};
pub use scorer::Scorer;

use serde_json::{json, Value};

/// A mapping of various liboro metadata.
pub fn metadata() -> Value {
    let is_debug = cfg!(debug_assertions);

    json!({
        "DEBUG": is_debug,
        "RELEASE": !is_debug,
        "VERSION": env!("CARGO_PKG_VERSION"),
        "VERSION_MAJOR": env!("CARGO_PKG_VERSION_MAJOR"),
        "VERSION_MINOR": env!("CARGO_PKG_VERSION_MINOR"),
        "VERSION_PATCH": env!("CARGO_PKG_VERSION_PATCH"),
        "LIBORO_AUTHORS": env!("CARGO_PKG_AUTHORS"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_flags_are_exclusive() {
        let data = metadata();

        assert_ne!(data["DEBUG"], data["RELEASE"]);
        assert_eq!(data["VERSION"], env!("CARGO_PKG_VERSION"));
    }
}
