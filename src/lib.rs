
pub mod crc;
pub mod ldpc;
pub mod message;
pub mod symbol;
pub mod pulse;
pub mod sync;
pub mod decoder;
pub mod subtract;
pub mod tracing_init;
pub mod ap;
pub mod protocol;
pub mod clock;
pub mod audio;
pub mod dedup;
pub mod orchestrator;
pub mod waterfall;

pub use message::{encode, decode};
pub use decoder::{decode_ft8, decode_ft8_multipass, DecodedMessage, DecoderConfig};
pub use protocol::Protocol;
pub use orchestrator::{DecodedRecord, OrchestratorConfig, SlotOrchestrator};
pub use waterfall::Waterfall;
