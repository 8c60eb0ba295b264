//! Playback commands addressed by target node and clip name.
//!
//! Hosts that queue control requests (UI, scripting bridges, tests) build these and
//! hand them to [`crate::Engine::apply`]. Starting through a command never attaches
//! an end callback.

use serde::{Deserialize, Serialize};

use scenery_api_core::NodeId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlaybackCommand {
    Start {
        target: NodeId,
        clip: String,
    },
    Stop {
        target: NodeId,
        clip: String,
        #[serde(default = "default_invoke_callback")]
        invoke_callback: bool,
    },
    Pause {
        target: NodeId,
        clip: String,
    },
    Resume {
        target: NodeId,
        clip: String,
    },
    StopPlayOnLoad,
}

fn default_invoke_callback() -> bool {
    true
}
